//! PostgreSQL statement rendering.
//!
//! `ChangeColumn` becomes the minimal sequence of single-attribute `ALTER
//! COLUMN` statements; column comments go through `COMMENT ON`.

use super::common::{
    check, column_spec, create_index, create_table, data_type, expr, foreign_key, ident,
    key_parts, primary_key, qualified, unsupported,
};
use super::Statement;
use crate::diff::ChangeOp;
use crate::error::Result;
use crate::ir::{Column, QualifiedName, SchemaObject, TriggerEvent, TypeKind};
use crate::Mode;

const MODE: Mode = Mode::Postgres;

pub(super) fn render_op(op: &ChangeOp, out: &mut Vec<Statement>) -> Result<()> {
    match op {
        ChangeOp::CreateTable(table) => {
            out.push(Statement::sql(MODE, create_table(MODE, table, false)?));
            for index in &table.indexes {
                if !index.from_constraint {
                    out.push(Statement::sql(MODE, create_index(MODE, &table.name, index)));
                }
            }
            for column in &table.columns {
                if column.comment.is_some() {
                    out.push(column_comment(&table.name, column));
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
                    ident(MODE, &to.name)
                ),
            ));
        }
        ChangeOp::AddColumn { table, column, .. } => {
            // Column position is not expressible; the definition alone is
            // still the whole change.
            out.push(Statement::sql(
                MODE,
                format!(
                    "ALTER TABLE {} ADD COLUMN {};",
                    qualified(MODE, table),
                    column_spec(MODE, table, column)?
                ),
            ));
            if column.comment.is_some() {
                out.push(column_comment(table, column));
            }
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
                // Indexes live in the table's schema.
                let index_name = QualifiedName {
                    schema: table.schema.clone(),
                    name: index.name.clone(),
                };
                out.push(Statement::sql(
                    MODE,
                    format!("DROP INDEX {};", qualified(MODE, &index_name)),
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
            out.push(Statement::sql(
                MODE,
                format!(
                    "ALTER TABLE {} ADD {};",
                    qualified(MODE, table),
                    primary_key(MODE, pk)
                ),
            ));
        }
        ChangeOp::DropPrimaryKey { table, name } => {
            let constraint = name.clone().unwrap_or_else(|| {
                crate::Ident::new(format!("{}_pkey", table.name.value))
            });
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
            let granularity = if trigger.for_each_row {
                " FOR EACH ROW"
            } else {
                ""
            };
            out.push(Statement::sql(
                MODE,
                format!(
                    "CREATE TRIGGER {} {} {} ON {}{granularity} {};",
                    ident(MODE, &trigger.name.name),
                    trigger.timing,
                    events,
                    qualified(MODE, &trigger.table),
                    trigger.body
                ),
            ));
        }
        ChangeOp::DropTrigger { name, table } => {
            out.push(Statement::sql(
                MODE,
                format!(
                    "DROP TRIGGER {} ON {};",
                    ident(MODE, &name.name),
                    qualified(MODE, table)
                ),
            ));
        }
        ChangeOp::CreateType(type_def) => {
            let sql = match &type_def.kind {
                TypeKind::Enum(values) => {
                    let labels: Vec<String> = values
                        .iter()
                        .map(|v| format!("'{}'", v.replace('\'', "''")))
                        .collect();
                    format!(
                        "CREATE TYPE {} AS ENUM ({});",
                        qualified(MODE, &type_def.name),
                        labels.join(", ")
                    )
                }
                TypeKind::Composite(fields) => {
                    let rendered: Vec<String> = fields
                        .iter()
                        .map(|(name, field_type)| {
                            format!("{} {}", ident(MODE, name), data_type(MODE, field_type))
                        })
                        .collect();
                    format!(
                        "CREATE TYPE {} AS ({});",
                        qualified(MODE, &type_def.name),
                        rendered.join(", ")
                    )
                }
            };
            out.push(Statement::sql(MODE, sql));
        }
        ChangeOp::DropType(name) => {
            out.push(Statement::sql(MODE, format!("DROP TYPE {};", qualified(MODE, name))));
        }
        ChangeOp::AlterType { name, added_values } => {
            for value in added_values {
                // ADD VALUE cannot run inside a transaction block.
                out.push(Statement::non_transactional(format!(
                    "ALTER TYPE {} ADD VALUE '{}';",
                    qualified(MODE, name),
                    value.replace('\'', "''")
                )));
            }
        }
        ChangeOp::CreateSequence(sequence) => {
            let mut sql = format!("CREATE SEQUENCE {}", qualified(MODE, &sequence.name));
            if let Some(data_type) = &sequence.data_type {
                sql.push_str(&format!(" AS {data_type}"));
            }
            if let Some(increment) = sequence.increment {
                sql.push_str(&format!(" INCREMENT BY {increment}"));
            }
            if let Some(min_value) = sequence.min_value {
                sql.push_str(&format!(" MINVALUE {min_value}"));
            }
            if let Some(max_value) = sequence.max_value {
                sql.push_str(&format!(" MAXVALUE {max_value}"));
            }
            if let Some(start) = sequence.start {
                sql.push_str(&format!(" START WITH {start}"));
            }
            if let Some(cache) = sequence.cache {
                sql.push_str(&format!(" CACHE {cache}"));
            }
            if sequence.cycle {
                sql.push_str(" CYCLE");
            }
            sql.push(';');
            out.push(Statement::sql(MODE, sql));

            if let Some((table, column)) = &sequence.owned_by {
                out.push(Statement::sql(
                    MODE,
                    format!(
                        "ALTER SEQUENCE {} OWNED BY {}.{};",
                        qualified(MODE, &sequence.name),
                        qualified(MODE, table),
                        ident(MODE, column)
                    ),
                ));
            }
        }
        ChangeOp::DropSequence(name) => {
            out.push(Statement::sql(
                MODE,
                format!("DROP SEQUENCE {};", qualified(MODE, name)),
            ));
        }
        ChangeOp::CreateExtension(extension) => {
            let mut sql = format!("CREATE EXTENSION {}", ident(MODE, &extension.name));
            if let Some(schema) = &extension.schema {
                sql.push_str(&format!(" SCHEMA {}", ident(MODE, schema)));
            }
            sql.push(';');
            out.push(Statement::sql(MODE, sql));
        }
        ChangeOp::DropExtension(name) => {
            out.push(Statement::sql(MODE, format!("DROP EXTENSION {};", ident(MODE, name))));
        }
        ChangeOp::CreatePolicy(policy) => {
            let mut sql = format!(
                "CREATE POLICY {} ON {}",
                ident(MODE, &policy.name),
                qualified(MODE, &policy.table)
            );
            if let Some(permissive) = policy.permissive {
                sql.push_str(if permissive {
                    " AS PERMISSIVE"
                } else {
                    " AS RESTRICTIVE"
                });
            }
            if let Some(command) = &policy.command {
                sql.push_str(&format!(" FOR {command}"));
            }
            if !policy.roles.is_empty() {
                sql.push_str(&format!(" TO {}", policy.roles.join(", ")));
            }
            if let Some(using) = &policy.using {
                sql.push_str(&format!(" USING ({})", expr(MODE, using)));
            }
            if let Some(with_check) = &policy.with_check {
                sql.push_str(&format!(" WITH CHECK ({})", expr(MODE, with_check)));
            }
            sql.push(';');
            out.push(Statement::sql(MODE, sql));
        }
        ChangeOp::DropPolicy { name, table } => {
            out.push(Statement::sql(
                MODE,
                format!(
                    "DROP POLICY {} ON {};",
                    ident(MODE, name),
                    qualified(MODE, table)
                ),
            ));
        }
        ChangeOp::SetComment(comment) => out.push(comment_statement(comment)),
        ChangeOp::DropComment { target } => {
            out.push(comment_statement(&crate::ir::CommentDef {
                target: target.clone(),
                text: None,
            }));
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
    let prefix = format!(
        "ALTER TABLE {} ALTER COLUMN {}",
        qualified(MODE, table),
        ident(MODE, &to.name)
    );

    if from.data_type != to.data_type || from.collation != to.collation {
        let mut sql = format!("{prefix} TYPE {}", data_type(MODE, &to.data_type));
        if let Some(collation) = &to.collation {
            sql.push_str(&format!(" COLLATE \"{collation}\""));
        }
        sql.push(';');
        out.push(Statement::sql(MODE, sql));
    }

    if from.nullable != to.nullable {
        let action = if to.nullable {
            "DROP NOT NULL"
        } else {
            "SET NOT NULL"
        };
        out.push(Statement::sql(MODE, format!("{prefix} {action};")));
    }

    if from.default != to.default {
        match &to.default {
            Some(default) => out.push(Statement::sql(
                MODE,
                format!("{prefix} SET DEFAULT {};", expr(MODE, default)),
            )),
            None => out.push(Statement::sql(MODE, format!("{prefix} DROP DEFAULT;"))),
        }
    }

    if from.identity != to.identity {
        match (&from.identity, &to.identity) {
            (None, Some(identity)) => {
                let kind = if identity.always { "ALWAYS" } else { "BY DEFAULT" };
                out.push(Statement::sql(
                    MODE,
                    format!("{prefix} ADD GENERATED {kind} AS IDENTITY;"),
                ));
            }
            (Some(_), None) => {
                out.push(Statement::sql(MODE, format!("{prefix} DROP IDENTITY;")));
            }
            _ => {
                return Err(unsupported(
                    MODE,
                    format!("changing identity options of {table}.{}", to.name.value),
                ));
            }
        }
    }

    if from.generated != to.generated {
        return Err(unsupported(
            MODE,
            format!("changing generation expression of {table}.{}", to.name.value),
        ));
    }

    if from.comment != to.comment {
        out.push(column_comment(table, to));
    }

    Ok(())
}

fn column_comment(table: &QualifiedName, column: &Column) -> Statement {
    let text = match &column.comment {
        Some(comment) => format!("'{}'", comment.replace('\'', "''")),
        None => "NULL".to_string(),
    };
    Statement::sql(
        MODE,
        format!(
            "COMMENT ON COLUMN {}.{} IS {text};",
            qualified(MODE, table),
            ident(MODE, &column.name)
        ),
    )
}

fn comment_statement(comment: &crate::ir::CommentDef) -> Statement {
    let text = match &comment.text {
        Some(text) => format!("'{}'", text.replace('\'', "''")),
        None => "NULL".to_string(),
    };
    let target = match &comment.target {
        crate::ir::CommentTarget::Table(table) => format!("TABLE {}", qualified(MODE, table)),
        crate::ir::CommentTarget::Column(table, column) => {
            format!("COLUMN {}.{}", qualified(MODE, table), ident(MODE, column))
        }
    };
    Statement::sql(MODE, format!("COMMENT ON {target} IS {text};"))
}

pub(super) fn to_sql(object: &SchemaObject) -> Result<String> {
    let mut statements = Vec::new();
    let op = match object {
        SchemaObject::Table(table) => ChangeOp::CreateTable(table.clone()),
        SchemaObject::View(view) => ChangeOp::CreateView(view.clone()),
        SchemaObject::Trigger(trigger) => ChangeOp::CreateTrigger(trigger.clone()),
        SchemaObject::Type(type_def) => ChangeOp::CreateType(type_def.clone()),
        SchemaObject::Sequence(sequence) => ChangeOp::CreateSequence(sequence.clone()),
        SchemaObject::Extension(extension) => ChangeOp::CreateExtension(extension.clone()),
        SchemaObject::Policy(policy) => ChangeOp::CreatePolicy(policy.clone()),
        SchemaObject::Comment(comment) => ChangeOp::SetComment(comment.clone()),
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
