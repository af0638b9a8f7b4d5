//! Reserved-keyword tables, one per dialect.
//!
//! Identifiers matching a reserved word are always quoted on output. The
//! tables are process-wide immutable values built lazily on first use.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::Mode;

pub fn is_reserved(mode: Mode, word: &str) -> bool {
    let table = match mode {
        Mode::Mysql => &*MYSQL_RESERVED,
        Mode::Postgres => &*POSTGRES_RESERVED,
        Mode::Mssql => &*MSSQL_RESERVED,
    };
    table.contains(word.to_ascii_lowercase().as_str())
}

static MYSQL_RESERVED: LazyLock<BTreeSet<&'static str>> =
    LazyLock::new(|| MYSQL_KEYWORDS.iter().copied().collect());
static POSTGRES_RESERVED: LazyLock<BTreeSet<&'static str>> =
    LazyLock::new(|| POSTGRES_KEYWORDS.iter().copied().collect());
static MSSQL_RESERVED: LazyLock<BTreeSet<&'static str>> =
    LazyLock::new(|| MSSQL_KEYWORDS.iter().copied().collect());

// Reserved words per the MySQL 8.0 manual, trimmed to those that can collide
// with ordinary schema identifiers.
const MYSQL_KEYWORDS: &[&str] = &[
    "accessible", "add", "all", "alter", "analyze", "and", "as", "asc", "before", "between",
    "bigint", "binary", "blob", "both", "by", "call", "cascade", "case", "change", "char",
    "character", "check", "collate", "column", "condition", "constraint", "continue", "convert",
    "create", "cross", "cube", "current_date", "current_time", "current_timestamp", "current_user",
    "cursor", "database", "databases", "decimal", "declare", "default", "delete", "desc",
    "describe", "distinct", "div", "double", "drop", "each", "else", "enclosed", "escaped",
    "exists", "exit", "explain", "false", "fetch", "float", "for", "force", "foreign", "from",
    "fulltext", "function", "generated", "group", "grouping", "having", "if", "ignore", "in",
    "index", "infile", "inner", "insert", "int", "integer", "interval", "into", "is", "join",
    "key", "keys", "kill", "leading", "left", "like", "limit", "lines", "load", "localtime",
    "localtimestamp", "lock", "long", "match", "mediumint", "mod", "natural", "not", "null",
    "numeric", "of", "on", "optimize", "option", "or", "order", "out", "outer", "partition",
    "precision", "primary", "procedure", "range", "rank", "read", "real", "references", "regexp",
    "rename", "repeat", "replace", "restrict", "return", "revoke", "right", "row", "rows",
    "schema", "schemas", "select", "set", "show", "smallint", "spatial", "sql", "ssl", "starting",
    "stored", "table", "terminated", "then", "tinyint", "to", "trailing", "trigger", "true",
    "union", "unique", "unlock", "unsigned", "update", "usage", "use", "using", "values",
    "varbinary", "varchar", "varying", "virtual", "when", "where", "while", "window", "with",
    "write", "xor", "zerofill",
];

// PostgreSQL reserved words (pg_get_keywords() category R), plus the
// type-function names that still need quoting in column positions.
const POSTGRES_KEYWORDS: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric", "authorization",
    "between", "bigint", "binary", "bit", "boolean", "both", "case", "cast", "char", "character",
    "check", "coalesce", "collate", "collation", "column", "concurrently", "constraint", "create",
    "cross", "current_catalog", "current_date", "current_role", "current_schema", "current_time",
    "current_timestamp", "current_user", "dec", "decimal", "default", "deferrable", "desc",
    "distinct", "do", "else", "end", "except", "exists", "extract", "false", "fetch", "float",
    "for", "foreign", "freeze", "from", "full", "grant", "greatest", "group", "grouping", "having",
    "ilike", "in", "initially", "inner", "inout", "int", "integer", "intersect", "interval",
    "into", "is", "isnull", "join", "lateral", "leading", "least", "left", "like", "limit",
    "localtime", "localtimestamp", "natural", "nchar", "none", "not", "notnull", "null", "nullif",
    "numeric", "offset", "on", "only", "or", "order", "out", "outer", "overlaps", "overlay",
    "placing", "position", "precision", "primary", "real", "references", "returning", "right",
    "row", "select", "session_user", "setof", "similar", "smallint", "some", "substring",
    "symmetric", "table", "tablesample", "then", "time", "timestamp", "to", "trailing", "treat",
    "trim", "true", "union", "unique", "user", "using", "values", "varchar", "variadic", "verbose",
    "when", "where", "window", "with", "xmlattributes", "xmlconcat", "xmlelement", "xmlexists",
    "xmlforest", "xmlparse", "xmlpi", "xmlroot", "xmlserialize",
];

// T-SQL reserved keywords per the SQL Server documentation.
const MSSQL_KEYWORDS: &[&str] = &[
    "add", "all", "alter", "and", "any", "as", "asc", "authorization", "backup", "begin",
    "between", "break", "browse", "bulk", "by", "cascade", "case", "check", "checkpoint", "close",
    "clustered", "coalesce", "collate", "column", "commit", "compute", "constraint", "contains",
    "containstable", "continue", "convert", "create", "cross", "current", "current_date",
    "current_time", "current_timestamp", "current_user", "cursor", "database", "dbcc",
    "deallocate", "declare", "default", "delete", "deny", "desc", "disk", "distinct",
    "distributed", "double", "drop", "dump", "else", "end", "errlvl", "escape", "except", "exec",
    "execute", "exists", "exit", "external", "fetch", "file", "fillfactor", "for", "foreign",
    "freetext", "freetexttable", "from", "full", "function", "goto", "grant", "group", "having",
    "holdlock", "identity", "identity_insert", "identitycol", "if", "in", "index", "inner",
    "insert", "intersect", "into", "is", "join", "key", "kill", "left", "like", "lineno", "load",
    "merge", "national", "nocheck", "nonclustered", "not", "null", "nullif", "of", "off",
    "offsets", "on", "open", "opendatasource", "openquery", "openrowset", "openxml", "option",
    "or", "order", "outer", "over", "percent", "pivot", "plan", "precision", "primary", "print",
    "proc", "procedure", "public", "raiserror", "read", "readtext", "reconfigure", "references",
    "replication", "restore", "restrict", "return", "revert", "revoke", "right", "rollback",
    "rowcount", "rowguidcol", "rule", "save", "schema", "select", "semantickeyphrasetable",
    "semanticsimilaritydetailstable", "semanticsimilaritytable", "session_user", "set", "setuser",
    "shutdown", "some", "statistics", "system_user", "table", "tablesample", "textsize", "then",
    "to", "top", "tran", "transaction", "trigger", "truncate", "try_convert", "tsequal", "union",
    "unique", "unpivot", "update", "updatetext", "use", "user", "values", "varying", "view",
    "waitfor", "when", "where", "while", "with", "writetext",
];
