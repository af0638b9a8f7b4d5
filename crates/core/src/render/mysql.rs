//! MySQL statement rendering.

use super::common::{
    check, column_spec, create_index, create_table, foreign_key, ident, key_parts, primary_key,
    qualified, unsupported,
};
use super::Statement;
use crate::diff::ChangeOp;
use crate::error::Result;
use crate::ir::{ColumnPosition, SchemaObject, TriggerEvent};
use crate::Mode;

const MODE: Mode = Mode::Mysql;

pub(super) fn render_op(op: &ChangeOp, out: &mut Vec<Statement>) -> Result<()> {
    match op {
        ChangeOp::CreateTable(table) => {
            out.push(Statement::sql(MODE, create_table(MODE, table, true)?));
            // Inline KEY entries carry no USING clause; typed indexes get
            // their own statement.
            for index in &table.indexes {
                if !index.from_constraint && index.index_type.is_some() {
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
                format!(
                    "ALTER TABLE {} RENAME TO {};",
                    qualified(MODE, from),
                    qualified(MODE, to)
                ),
            ));
        }
        ChangeOp::AddColumn {
            table,
            column,
            position,
        } => {
            let mut sql = format!(
                "ALTER TABLE {} ADD COLUMN {}",
                qualified(MODE, table),
                column_spec(MODE, table, column)?
            );
            match position {
                Some(ColumnPosition::First) => sql.push_str(" FIRST"),
                Some(ColumnPosition::After(after)) => {
                    sql.push_str(" AFTER ");
                    sql.push_str(&ident(MODE, after));
                }
                None => {}
            }
            sql.push(';');
            out.push(Statement::sql(MODE, sql));
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
        ChangeOp::ChangeColumn { table, to, .. } => {
            // MODIFY COLUMN restates the whole definition; the old column
            // only matters to dialects that alter attributes one by one.
            out.push(Statement::sql(
                MODE,
                format!(
                    "ALTER TABLE {} MODIFY COLUMN {};",
                    qualified(MODE, table),
                    column_spec(MODE, table, to)?
                ),
            ));
        }
        ChangeOp::RenameColumn { table, from, to } => {
            out.push(Statement::sql(
                MODE,
                format!(
                    "ALTER TABLE {} RENAME COLUMN {} TO {};",
                    qualified(MODE, table),
                    ident(MODE, from),
                    ident(MODE, to)
                ),
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
            out.push(Statement::sql(
                MODE,
                format!(
                    "DROP INDEX {} ON {};",
                    ident(MODE, &index.name),
                    qualified(MODE, table)
                ),
            ));
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
        ChangeOp::DropForeignKey { table, name } => {
            out.push(Statement::sql(
                MODE,
                format!(
                    "ALTER TABLE {} DROP FOREIGN KEY {};",
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
        ChangeOp::DropCheck { table, name } => {
            out.push(Statement::sql(
                MODE,
                format!(
                    "ALTER TABLE {} DROP CHECK {};",
                    qualified(MODE, table),
                    ident(MODE, name)
                ),
            ));
        }
        ChangeOp::AddPrimaryKey { table, pk } => {
            out.push(Statement::sql(
                MODE,
                format!(
                    "ALTER TABLE {} ADD {};",
                    qualified(MODE, table),
                    primary_key(MODE, pk)
                ),
            ));
        }
        ChangeOp::DropPrimaryKey { table, .. } => {
            out.push(Statement::sql(
                MODE,
                format!("ALTER TABLE {} DROP PRIMARY KEY;", qualified(MODE, table)),
            ));
        }
        ChangeOp::CreateView(view) => {
            out.push(Statement::sql(
                MODE,
                format!(
                    "CREATE VIEW {} AS {};",
                    qualified(MODE, &view.name),
                    view.query
                ),
            ));
        }
        ChangeOp::ReplaceView(view) => {
            out.push(Statement::sql(
                MODE,
                format!(
                    "CREATE OR REPLACE VIEW {} AS {};",
                    qualified(MODE, &view.name),
                    view.query
                ),
            ));
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
                .join(" OR ");
            out.push(Statement::sql(
                MODE,
                format!(
                    "CREATE TRIGGER {} {} {} ON {} FOR EACH ROW {};",
                    qualified(MODE, &trigger.name),
                    trigger.timing,
                    events,
                    qualified(MODE, &trigger.table),
                    trigger.body
                ),
            ));
        }
        ChangeOp::DropTrigger { name, .. } => {
            out.push(Statement::sql(
                MODE,
                format!("DROP TRIGGER {};", qualified(MODE, name)),
            ));
        }
        ChangeOp::SetComment(comment) => match &comment.target {
            crate::ir::CommentTarget::Table(table) => {
                let text = comment.text.clone().unwrap_or_default();
                out.push(Statement::sql(
                    MODE,
                    format!(
                        "ALTER TABLE {} COMMENT = '{}';",
                        qualified(MODE, table),
                        text.replace('\'', "''")
                    ),
                ));
            }
            crate::ir::CommentTarget::Column(..) => {
                return Err(unsupported(MODE, "COMMENT ON COLUMN as a standalone change"));
            }
        },
        ChangeOp::DropComment { target } => match target {
            crate::ir::CommentTarget::Table(table) => {
                out.push(Statement::sql(
                    MODE,
                    format!("ALTER TABLE {} COMMENT = '';", qualified(MODE, table)),
                ));
            }
            crate::ir::CommentTarget::Column(..) => {
                return Err(unsupported(MODE, "COMMENT ON COLUMN as a standalone change"));
            }
        },
        other => {
            return Err(unsupported(
                MODE,
                format!("{} {}", other.tag(), other.target()),
            ));
        }
    }

    Ok(())
}

pub(super) fn to_sql(object: &SchemaObject) -> Result<String> {
    match object {
        SchemaObject::Table(table) => {
            let mut sql = create_table(MODE, table, true)?;
            // Typed or partial indexes cannot appear as inline KEY entries.
            for index in &table.indexes {
                if !index.from_constraint && (index.index_type.is_some() || index.predicate.is_some())
                {
                    sql.push('\n');
                    sql.push_str(&create_index(MODE, &table.name, index));
                }
            }
            Ok(sql)
        }
        SchemaObject::View(view) => Ok(format!(
            "CREATE VIEW {} AS {};",
            qualified(MODE, &view.name),
            view.query
        )),
        SchemaObject::Trigger(trigger) => {
            let mut statements = Vec::new();
            render_op(&ChangeOp::CreateTrigger(trigger.clone()), &mut statements)?;
            Ok(single_sql(statements))
        }
        SchemaObject::Comment(comment) => {
            let mut statements = Vec::new();
            render_op(&ChangeOp::SetComment(comment.clone()), &mut statements)?;
            Ok(single_sql(statements))
        }
        other => Err(unsupported(MODE, format!("exporting {}", other.describe()))),
    }
}

fn single_sql(statements: Vec<Statement>) -> String {
    statements
        .into_iter()
        .filter_map(|statement| match statement {
            Statement::Sql { sql, .. } => Some(sql),
            Statement::BatchBoundary => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
