//! DDL rendering: change operations to dialect-correct statements, plus the
//! export renderer that prints a whole schema.

mod common;
mod mssql;
mod mysql;
mod postgres;

use crate::diff::ChangeOp;
use crate::error::Result;
use crate::ir::SchemaObject;
use crate::Mode;

/// One renderable unit of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Sql {
        sql: String,
        /// Whether this statement may run inside a transaction in its
        /// dialect. MySQL DDL auto-commits; PostgreSQL `ALTER TYPE ... ADD
        /// VALUE` must run outside one.
        transactional: bool,
    },
    /// MSSQL `GO` batch separator.
    BatchBoundary,
}

impl Statement {
    pub(crate) fn sql(mode: Mode, sql: impl Into<String>) -> Self {
        Self::Sql {
            sql: sql.into(),
            transactional: mode.rules().ddl_transactional,
        }
    }

    pub(crate) fn non_transactional(sql: impl Into<String>) -> Self {
        Self::Sql {
            sql: sql.into(),
            transactional: false,
        }
    }
}

/// Renders the ordered plan into dialect statements.
pub fn render_ops(mode: Mode, ops: &[ChangeOp]) -> Result<Vec<Statement>> {
    let mut statements = Vec::new();
    for op in ops {
        match mode {
            Mode::Mysql => mysql::render_op(op, &mut statements)?,
            Mode::Postgres => postgres::render_op(op, &mut statements)?,
            Mode::Mssql => mssql::render_op(op, &mut statements)?,
        }
    }
    Ok(statements)
}

/// Renders one schema object as creation DDL (export mode).
pub fn to_sql(mode: Mode, object: &SchemaObject) -> Result<String> {
    match mode {
        Mode::Mysql => mysql::to_sql(object),
        Mode::Postgres => postgres::to_sql(object),
        Mode::Mssql => mssql::to_sql(object),
    }
}

/// Renders a full schema as a dump, one statement per line group.
pub fn export_schema(mode: Mode, objects: &[SchemaObject]) -> Result<String> {
    let mut out = String::new();
    for object in objects {
        out.push_str(&to_sql(mode, object)?);
        out.push('\n');
    }
    Ok(out)
}

/// Flattens statements to displayable SQL, expanding batch boundaries to
/// the dialect separator.
pub fn statements_to_text(mode: Mode, statements: &[Statement]) -> String {
    let mut out = String::new();
    for statement in statements {
        match statement {
            Statement::Sql { sql, .. } => {
                out.push_str(sql);
                out.push('\n');
            }
            Statement::BatchBoundary => {
                if let Some(separator) = mode.rules().batch_separator {
                    out.push_str(separator);
                    out.push('\n');
                }
            }
        }
    }
    out
}
