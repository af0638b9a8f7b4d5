use std::collections::BTreeMap;
use std::fmt;

use super::{DataType, Expr, Ident, QualifiedName};

/// A top-level schema object produced by the assembler.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaObject {
    Table(Table),
    View(View),
    Trigger(Trigger),
    Type(TypeDef),
    Sequence(Sequence),
    Extension(Extension),
    Policy(Policy),
    Comment(CommentDef),
}

impl SchemaObject {
    /// Human-readable tag for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Table(table) => format!("table {}", table.name),
            Self::View(view) => format!("view {}", view.name),
            Self::Trigger(trigger) => format!("trigger {}", trigger.name),
            Self::Type(type_def) => format!("type {}", type_def.name),
            Self::Sequence(sequence) => format!("sequence {}", sequence.name),
            Self::Extension(extension) => format!("extension {}", extension.name),
            Self::Policy(policy) => format!("policy {} on {}", policy.name, policy.table),
            Self::Comment(comment) => format!("comment on {}", comment.target),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: QualifiedName,
    /// Order is structural: the differ derives `AddColumn` positions from it.
    pub columns: Vec<Column>,
    pub primary_key: Option<PrimaryKey>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
    pub checks: Vec<CheckConstraint>,
    pub options: TableOptions,
    pub renamed_from: Option<Ident>,
}

impl Table {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            columns: Vec::new(),
            primary_key: None,
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            checks: Vec::new(),
            options: TableOptions::default(),
            renamed_from: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: Ident,
    pub data_type: DataType,
    pub nullable: bool,
    pub default: Option<Expr>,
    /// MSSQL names default constraints; keeping the parsed name lets the
    /// renderer drop the right constraint on a column change.
    pub default_constraint: Option<Ident>,
    /// MySQL `AUTO_INCREMENT`.
    pub auto_increment: bool,
    /// MSSQL `IDENTITY(seed, increment)`, PG `GENERATED ... AS IDENTITY`.
    pub identity: Option<Identity>,
    pub generated: Option<Generated>,
    pub collation: Option<String>,
    pub comment: Option<String>,
    /// MySQL `ON UPDATE CURRENT_TIMESTAMP`.
    pub on_update: Option<Expr>,
    /// MSSQL `NOT FOR REPLICATION` on the identity property.
    pub not_for_replication: bool,
    pub renamed_from: Option<Ident>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: Ident::new(name),
            data_type,
            nullable: true,
            default: None,
            default_constraint: None,
            auto_increment: false,
            identity: None,
            generated: None,
            collation: None,
            comment: None,
            on_update: None,
            not_for_replication: false,
            renamed_from: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub seed: i64,
    pub increment: i64,
    /// PG distinguishes `GENERATED ALWAYS` from `GENERATED BY DEFAULT`.
    pub always: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub expr: Expr,
    pub stored: bool,
}

/// One column of a primary key or index, with sort direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPart {
    pub column: Ident,
    pub descending: bool,
}

impl KeyPart {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: Ident::new(column),
            descending: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    pub name: Option<Ident>,
    pub columns: Vec<KeyPart>,
    /// MSSQL `CLUSTERED` / `NONCLUSTERED`; `None` elsewhere.
    pub clustered: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub name: Ident,
    pub columns: Vec<KeyPart>,
    pub unique: bool,
    /// `btree`, `hash`, `clustered`, `nonclustered`; lowercased.
    pub index_type: Option<String>,
    /// MSSQL `INCLUDE (...)` columns.
    pub include: Vec<Ident>,
    /// PG partial index predicate.
    pub predicate: Option<Expr>,
    /// Raw `WITH` options, keyed for deterministic comparison.
    pub options: BTreeMap<String, String>,
    /// True when the index came from a table-level `UNIQUE` constraint, in
    /// which case PG drops it with `DROP CONSTRAINT` instead of `DROP INDEX`.
    pub from_constraint: bool,
}

impl Index {
    pub fn on_columns(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: Ident::new(name),
            columns: columns.iter().map(|c| KeyPart::asc(*c)).collect(),
            unique: false,
            index_type: None,
            include: Vec::new(),
            predicate: None,
            options: BTreeMap::new(),
            from_constraint: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefAction {
    Restrict,
    Cascade,
    SetNull,
    NoAction,
    SetDefault,
}

impl fmt::Display for RefAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::NoAction => "NO ACTION",
            Self::SetDefault => "SET DEFAULT",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub name: Option<Ident>,
    pub columns: Vec<Ident>,
    pub referenced_table: QualifiedName,
    pub referenced_columns: Vec<Ident>,
    pub on_delete: Option<RefAction>,
    pub on_update: Option<RefAction>,
    pub not_for_replication: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckConstraint {
    pub name: Option<Ident>,
    pub expr: Expr,
    /// PG `NO INHERIT`.
    pub no_inherit: bool,
    /// MSSQL `NOT FOR REPLICATION`.
    pub not_for_replication: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableOptions {
    /// MySQL storage engine.
    pub engine: Option<String>,
    pub charset: Option<String>,
    pub collation: Option<String>,
    /// Anything else, normalized `KEY=value`.
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub name: QualifiedName,
    pub columns: Vec<Ident>,
    /// Body text with whitespace collapsed by normalization; compared
    /// textually, not structurally.
    pub query: String,
    pub renamed_from: Option<Ident>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerTiming {
    Before,
    After,
    InsteadOf,
}

impl fmt::Display for TriggerTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Before => "BEFORE",
            Self::After => "AFTER",
            Self::InsteadOf => "INSTEAD OF",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    Insert,
    Update,
    Delete,
    Truncate,
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Truncate => "TRUNCATE",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub name: QualifiedName,
    pub table: QualifiedName,
    pub timing: TriggerTiming,
    pub events: Vec<TriggerEvent>,
    pub for_each_row: bool,
    /// `EXECUTE FUNCTION f()` target or raw body; compared textually.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Enum(Vec<String>),
    Composite(Vec<(Ident, DataType)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub name: QualifiedName,
    pub kind: TypeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub name: QualifiedName,
    pub data_type: Option<String>,
    pub increment: Option<i64>,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    pub start: Option<i64>,
    pub cache: Option<i64>,
    pub cycle: bool,
    pub owned_by: Option<(QualifiedName, Ident)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub name: Ident,
    pub schema: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    pub name: Ident,
    pub table: QualifiedName,
    /// `None` means the PG default (permissive).
    pub permissive: Option<bool>,
    /// `ALL` / `SELECT` / `INSERT` / `UPDATE` / `DELETE`, uppercased.
    pub command: Option<String>,
    pub roles: Vec<String>,
    pub using: Option<Expr>,
    pub with_check: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentTarget {
    Table(QualifiedName),
    Column(QualifiedName, Ident),
}

impl fmt::Display for CommentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(table) => write!(f, "TABLE {table}"),
            Self::Column(table, column) => write!(f, "COLUMN {table}.{column}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDef {
    pub target: CommentTarget,
    /// `None` renders `COMMENT ON ... IS NULL`.
    pub text: Option<String>,
}

/// Placement of a new column relative to its neighbors in desired order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnPosition {
    First,
    After(Ident),
}
