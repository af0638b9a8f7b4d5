//! SQL Server statement rendering.
//!
//! Defaults are named constraints here, so a default change is a constraint
//! drop plus add around the `ALTER COLUMN`. Views and triggers must be the
//! only statement in their batch, hence the `GO` boundaries.

use super::common::{
    check, column_spec, create_index, create_table, data_type, expr, foreign_key, ident,
    key_parts, primary_key, qualified, unsupported,
};
use super::Statement;
use crate::diff::ChangeOp;
use crate::error::Result;
use crate::ir::{Column, Ident, QualifiedName, SchemaObject, TriggerEvent};
use crate::Mode;

const MODE: Mode = Mode::Mssql;

pub(super) fn render_op(op: &ChangeOp, out: &mut Vec<Statement>) -> Result<()> {
    match op {
        ChangeOp::CreateTable(table) => {
            out.push(Statement::sql(MODE, create_table(MODE, table, false)?));
            for index in &table.indexes {
                if !index.from_constraint {
                    out.push(Statement::sql(MODE, create_index(MODE, &table.name, index)));
                }
            }
        }
        ChangeOp::DropTable(name) => {
            out.push(Statement::sql(MODE, format!("DROP TABLE {};", qualified(MODE, name))));
        }
        ChangeOp::RenameTable { from, to } => {
            out.push(Statement::sql(
                MODE,
                sp_rename(&sp_table_target(from), &to.name.value, None),
            ));
        }
        ChangeOp::AddColumn { table, column, .. } => {
            // T-SQL has no column positions and no COLUMN keyword on ADD.
            out.push(Statement::sql(
                MODE,
                format!(
                    "ALTER TABLE {} ADD {};",
                    qualified(MODE, table),
                    column_spec(MODE, table, column)?
                ),
            ));
        }
        ChangeOp::DropColumn { table, column } => {
            out.push(Statement::sql(
                MODE,
                format!(
                    "ALTER TABLE {} DROP COLUMN {};",
                    qualified(MODE, table),
                    ident(MODE, column)
                ),
            ));
        }
        ChangeOp::ChangeColumn { table, from, to } => change_column(table, from, to, out)?,
        ChangeOp::RenameColumn { table, from, to } => {
            let target = format!("{}.{}", sp_table_target(table), from.value);
            out.push(Statement::sql(
                MODE,
                sp_rename(&target, &to.value, Some("COLUMN")),
            ));
        }
        ChangeOp::AddIndex { table, index } => {
            if index.from_constraint {
                out.push(Statement::sql(
                    MODE,
                    format!(
                        "ALTER TABLE {} ADD CONSTRAINT {} UNIQUE ({});",
                        qualified(MODE, table),
                        ident(MODE, &index.name),
                        key_parts(MODE, &index.columns)
                    ),
                ));
            } else {
                out.push(Statement::sql(MODE, create_index(MODE, table, index)));
            }
        }
        ChangeOp::DropIndex { table, index } => {
            if index.from_constraint {
                out.push(Statement::sql(
                    MODE,
                    format!(
                        "ALTER TABLE {} DROP CONSTRAINT {};",
                        qualified(MODE, table),
                        ident(MODE, &index.name)
                    ),
                ));
            } else {
                out.push(Statement::sql(
                    MODE,
                    format!(
                        "DROP INDEX {} ON {};",
                        ident(MODE, &index.name),
                        qualified(MODE, table)
                    ),
                ));
            }
        }
        ChangeOp::AddForeignKey { table, fk } => {
            out.push(Statement::sql(
                MODE,
                format!(
                    "ALTER TABLE {} ADD {};",
                    qualified(MODE, table),
                    foreign_key(MODE, fk)
                ),
            ));
        }
        ChangeOp::DropForeignKey { table, name } | ChangeOp::DropCheck { table, name } => {
            out.push(Statement::sql(
                MODE,
                format!(
                    "ALTER TABLE {} DROP CONSTRAINT {};",
                    qualified(MODE, table),
                    ident(MODE, name)
                ),
            ));
        }
        ChangeOp::AddCheck { table, check: constraint } => {
            out.push(Statement::sql(
                MODE,
                format!(
                    "ALTER TABLE {} ADD {};",
                    qualified(MODE, table),
                    check(MODE, constraint)
                ),
            ));
        }
        ChangeOp::AddPrimaryKey { table, pk } => {
            let mut named = pk.clone();
            if named.name.is_none() {
                named.name = Some(Ident::new(format!("PK_{}", table.name.value)));
            }
            out.push(Statement::sql(
                MODE,
                format!(
                    "ALTER TABLE {} ADD {};",
                    qualified(MODE, table),
                    primary_key(MODE, &named)
                ),
            ));
        }
        ChangeOp::DropPrimaryKey { table, name } => {
            let constraint = name
                .clone()
                .unwrap_or_else(|| Ident::new(format!("PK_{}", table.name.value)));
            out.push(Statement::sql(
                MODE,
                format!(
                    "ALTER TABLE {} DROP CONSTRAINT {};",
                    qualified(MODE, table),
                    ident(MODE, &constraint)
                ),
            ));
        }
        ChangeOp::CreateView(view) => {
            out.push(Statement::BatchBoundary);
            out.push(Statement::sql(
                MODE,
                format!(
                    "CREATE VIEW {} AS {};",
                    qualified(MODE, &view.name),
                    view.query
                ),
            ));
            out.push(Statement::BatchBoundary);
        }
        ChangeOp::DropView(name) => {
            out.push(Statement::sql(MODE, format!("DROP VIEW {};", qualified(MODE, name))));
        }
        ChangeOp::CreateTrigger(trigger) => {
            let events = trigger
                .events
                .iter()
                .map(TriggerEvent::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            out.push(Statement::BatchBoundary);
            out.push(Statement::sql(
                MODE,
                format!(
                    "CREATE TRIGGER {} ON {} {} {} AS {};",
                    qualified(MODE, &trigger.name),
                    qualified(MODE, &trigger.table),
                    trigger.timing,
                    events,
                    trigger.body
                ),
            ));
            out.push(Statement::BatchBoundary);
        }
        ChangeOp::DropTrigger { name, .. } => {
            out.push(Statement::sql(
                MODE,
                format!("DROP TRIGGER {};", qualified(MODE, name)),
            ));
        }
        other => {
            return Err(unsupported(
                MODE,
                format!("{} {}", other.tag(), other.target()),
            ));
        }
    }

    Ok(())
}

fn change_column(
    table: &QualifiedName,
    from: &Column,
    to: &Column,
    out: &mut Vec<Statement>,
) -> Result<()> {
    if from.identity != to.identity {
        return Err(unsupported(
            MODE,
            format!("changing the identity property of {table}.{}", to.name.value),
        ));
    }

    let default_changed = from.default != to.default;

    // The old default constraint must be out of the way before the column
    // definition changes.
    if default_changed && from.default.is_some() {
        let name = from
            .default_constraint
            .clone()
            .unwrap_or_else(|| default_constraint_name(table, from));
        out.push(Statement::sql(
            MODE,
            format!(
                "ALTER TABLE {} DROP CONSTRAINT {};",
                qualified(MODE, table),
                ident(MODE, &name)
            ),
        ));
    }

    if from.data_type != to.data_type
        || from.nullable != to.nullable
        || from.collation != to.collation
    {
        let mut sql = format!(
            "ALTER TABLE {} ALTER COLUMN {} {}",
            qualified(MODE, table),
            ident(MODE, &to.name),
            data_type(MODE, &to.data_type)
        );
        if let Some(collation) = &to.collation {
            sql.push_str(&format!(" COLLATE {collation}"));
        }
        sql.push_str(if to.nullable { " NULL" } else { " NOT NULL" });
        sql.push(';');
        out.push(Statement::sql(MODE, sql));
    }

    if default_changed && let Some(default) = &to.default {
        // Reuse the parsed constraint name when the desired DDL carries
        // one; otherwise derive a deterministic name.
        let name = to
            .default_constraint
            .clone()
            .unwrap_or_else(|| default_constraint_name(table, to));
        out.push(Statement::sql(
            MODE,
            format!(
                "ALTER TABLE {} ADD CONSTRAINT {} DEFAULT {} FOR {};",
                qualified(MODE, table),
                ident(MODE, &name),
                expr(MODE, default),
                ident(MODE, &to.name)
            ),
        ));
    }

    if from.comment != to.comment {
        return Err(unsupported(
            MODE,
            format!("changing the comment of {table}.{}", to.name.value),
        ));
    }

    Ok(())
}

fn default_constraint_name(table: &QualifiedName, column: &Column) -> Ident {
    Ident::new(format!("DF_{}_{}", table.name.value, column.name.value))
}

fn sp_table_target(table: &QualifiedName) -> String {
    match &table.schema {
        Some(schema) => format!("{}.{}", schema.value, table.name.value),
        None => table.name.value.clone(),
    }
}

fn sp_rename(target: &str, new_name: &str, kind: Option<&str>) -> String {
    let escaped_target = target.replace('\'', "''");
    let escaped_new = new_name.replace('\'', "''");
    match kind {
        Some(kind) => format!("EXEC sp_rename '{escaped_target}', '{escaped_new}', '{kind}';"),
        None => format!("EXEC sp_rename '{escaped_target}', '{escaped_new}';"),
    }
}

pub(super) fn to_sql(object: &SchemaObject) -> Result<String> {
    let mut statements = Vec::new();
    let op = match object {
        SchemaObject::Table(table) => ChangeOp::CreateTable(table.clone()),
        SchemaObject::View(view) => ChangeOp::CreateView(view.clone()),
        SchemaObject::Trigger(trigger) => ChangeOp::CreateTrigger(trigger.clone()),
        other => return Err(unsupported(MODE, format!("exporting {}", other.describe()))),
    };
    render_op(&op, &mut statements)?;

    Ok(statements
        .into_iter()
        .filter_map(|statement| match statement {
            Statement::Sql { sql, .. } => Some(sql),
            Statement::BatchBoundary => None,
        })
        .collect::<Vec<_>>()
        .join("\n"))
}
