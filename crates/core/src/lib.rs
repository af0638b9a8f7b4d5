//! Declarative schema migration engine.
//!
//! Given the current schema of a database (from a live dump or a file) and
//! a desired schema as DDL, the engine computes an ordered, dependency-safe
//! plan of change operations and renders it as dialect-correct DDL for
//! MySQL, PostgreSQL, or SQL Server.

mod annotation;
mod assembler;
mod cancel;
mod config;
mod database;
mod diff;
mod engine;
mod error;
mod executor;
mod ir;
mod keywords;
mod mode;
mod normalize;
mod ordering;
mod parser;
mod plan;
mod render;

pub use annotation::{RenameAnnotation, extract_annotations};
pub use assembler::assemble;
pub use cancel::CancelToken;
pub use config::ConnectionConfig;
pub use database::{Database, FileDatabase};
pub use diff::{ChangeOp, DiffOptions, DiffOutcome, Differ, SkippedOp, is_destructive};
pub use engine::{Action, Engine, RunOptions, RunOutcome};
pub use error::{
    ConnectionError, Error, ExecutionError, ParseError, Result, SchemaError, SourceSpan,
    UnsupportedOperation,
};
pub use executor::Executor;
pub use ir::{
    CheckConstraint, Column, ColumnPosition, CommentDef, CommentTarget, DataType, Expr, Extension,
    ForeignKey, Generated, Ident, IdentKey, Identity, Index, KeyPart, Length, Literal, NameKey,
    Policy, PrimaryKey, QualifiedName, RefAction, SchemaObject, Sequence, Table, TableOptions,
    Trigger, TriggerEvent, TriggerTiming, TypeDef, TypeKind, View,
};
pub use keywords::is_reserved;
pub use mode::{DialectRules, Mode};
pub use normalize::normalize;
pub use ordering::sort_ops;
pub use parser::{AlterAction, DdlStatement, SqlFragment, parse, split_sql_statements};
pub use plan::Plan;
pub use render::{Statement, export_schema, render_ops, statements_to_text, to_sql};
