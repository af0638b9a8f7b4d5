use std::fmt;

use crate::keywords;
use crate::Ident;

/// Generator mode: selects the dialect rules carried through the whole
/// pipeline. Dialect-specific behavior is either a field in [`DialectRules`]
/// or an exhaustive `match` on this enum at the point of difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Mode {
    Mysql,
    Postgres,
    Mssql,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Mysql, Mode::Postgres, Mode::Mssql];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Postgres => "postgres",
            Self::Mssql => "mssql",
        }
    }

    pub const fn rules(self) -> &'static DialectRules {
        match self {
            Self::Mysql => &MYSQL_RULES,
            Self::Postgres => &POSTGRES_RULES,
            Self::Mssql => &MSSQL_RULES,
        }
    }

    /// Quote an identifier for output. Identifiers that were quoted in the
    /// source, hit the reserved-keyword table, or contain characters outside
    /// the plain identifier alphabet are always delimited.
    pub fn quote_ident(self, ident: &Ident) -> String {
        let rules = self.rules();
        if ident.quoted || keywords::is_reserved(self, &ident.value) || !is_plain_ident(&ident.value)
        {
            let escaped = ident
                .value
                .replace(rules.quote_close, &rules.quote_close_escaped);
            format!("{}{escaped}{}", rules.quote_open, rules.quote_close)
        } else {
            ident.value.clone()
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-mode rule table. Kept small on purpose: anything that needs more than
/// a flag lives in a `match mode` at its point of use.
#[derive(Debug)]
pub struct DialectRules {
    /// Implicit schema for unqualified names during comparison.
    pub default_schema: Option<&'static str>,
    pub quote_open: char,
    pub quote_close: char,
    /// Escape sequence for a literal closing delimiter inside an identifier.
    pub quote_close_escaped: &'static str,
    /// Whether `ADD COLUMN ... FIRST | AFTER c` is expressible.
    pub supports_column_position: bool,
    /// Whether `CREATE OR REPLACE VIEW` is expressible.
    pub supports_or_replace_view: bool,
    /// Whether dropping a primary key requires its constraint name.
    pub drop_primary_key_needs_name: bool,
    /// Batch separator emitted between statement groups, if any.
    pub batch_separator: Option<&'static str>,
    /// Whether DDL can run inside a transaction in this dialect.
    pub ddl_transactional: bool,
    /// Environment variable overriding `--password`.
    pub password_env: &'static str,
}

static MYSQL_RULES: DialectRules = DialectRules {
    default_schema: None,
    quote_open: '`',
    quote_close: '`',
    quote_close_escaped: "``",
    supports_column_position: true,
    supports_or_replace_view: true,
    drop_primary_key_needs_name: false,
    batch_separator: None,
    ddl_transactional: false,
    password_env: "MYSQL_PWD",
};

static POSTGRES_RULES: DialectRules = DialectRules {
    default_schema: Some("public"),
    quote_open: '"',
    quote_close: '"',
    quote_close_escaped: "\"\"",
    supports_column_position: false,
    supports_or_replace_view: true,
    drop_primary_key_needs_name: true,
    batch_separator: None,
    ddl_transactional: true,
    password_env: "PGPASSWORD",
};

static MSSQL_RULES: DialectRules = DialectRules {
    default_schema: Some("dbo"),
    quote_open: '[',
    quote_close: ']',
    quote_close_escaped: "]]",
    supports_column_position: false,
    supports_or_replace_view: false,
    drop_primary_key_needs_name: true,
    batch_separator: Some("GO"),
    ddl_transactional: true,
    password_env: "MSSQL_PWD",
};

fn is_plain_ident(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
