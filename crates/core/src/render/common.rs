//! Rendering helpers shared by the three dialect renderers.

use std::fmt::Write as _;

use crate::error::{Result, UnsupportedOperation};
use crate::ir::{
    CheckConstraint, Column, DataType, Expr, ForeignKey, Ident, Index, KeyPart, Literal,
    PrimaryKey, QualifiedName, Table,
};
use crate::Mode;

pub(super) const INDENT: &str = "    ";

pub(super) fn ident(mode: Mode, name: &Ident) -> String {
    mode.quote_ident(name)
}

pub(super) fn qualified(mode: Mode, name: &QualifiedName) -> String {
    match &name.schema {
        Some(schema) => format!("{}.{}", ident(mode, schema), ident(mode, &name.name)),
        None => ident(mode, &name.name),
    }
}

pub(super) fn expr(mode: Mode, value: &Expr) -> String {
    match value {
        Expr::Literal(literal) => literal_sql(literal),
        Expr::Column(column) => ident(mode, column),
        Expr::FunctionCall { name, args } => {
            let rendered: Vec<String> = args.iter().map(|a| expr(mode, a)).collect();
            format!("{name}({})", rendered.join(", "))
        }
        Expr::CurrentTimestamp { precision } => match precision {
            Some(p) => format!("CURRENT_TIMESTAMP({p})"),
            None => "CURRENT_TIMESTAMP".to_string(),
        },
        Expr::Raw(sql) => sql.clone(),
    }
}

fn literal_sql(literal: &Literal) -> String {
    match literal {
        Literal::Null => "NULL".to_string(),
        Literal::Bool(true) => "TRUE".to_string(),
        Literal::Bool(false) => "FALSE".to_string(),
        Literal::Number(text) => text.clone(),
        Literal::String(text) => format!("'{}'", text.replace('\'', "''")),
    }
}

pub(super) fn data_type(mode: Mode, value: &DataType) -> String {
    match (mode, value) {
        // MySQL spells booleans tinyint(1) at dump time but accepts the
        // alias; emit the canonical keyword.
        (Mode::Mysql, DataType::Bool) => "boolean".to_string(),
        (Mode::Mssql, DataType::Bool) => "bit".to_string(),
        (Mode::Mssql, DataType::Timestamp { precision, .. }) => match precision {
            Some(p) => format!("datetime2({p})"),
            None => "datetime2".to_string(),
        },
        _ => value.to_string(),
    }
}

pub(super) fn key_parts(mode: Mode, parts: &[KeyPart]) -> String {
    parts
        .iter()
        .map(|part| {
            if part.descending {
                format!("{} DESC", ident(mode, &part.column))
            } else {
                ident(mode, &part.column)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub(super) fn ident_list(mode: Mode, names: &[Ident]) -> String {
    names
        .iter()
        .map(|name| ident(mode, name))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(super) fn foreign_key(mode: Mode, fk: &ForeignKey) -> String {
    let mut sql = String::new();
    if let Some(name) = &fk.name {
        write!(sql, "CONSTRAINT {} ", ident(mode, name)).expect("write to String");
    }
    write!(
        sql,
        "FOREIGN KEY ({}) REFERENCES {} ({})",
        ident_list(mode, &fk.columns),
        qualified(mode, &fk.referenced_table),
        ident_list(mode, &fk.referenced_columns),
    )
    .expect("write to String");
    if let Some(action) = fk.on_delete {
        write!(sql, " ON DELETE {action}").expect("write to String");
    }
    if let Some(action) = fk.on_update {
        write!(sql, " ON UPDATE {action}").expect("write to String");
    }
    if fk.not_for_replication && mode == Mode::Mssql {
        sql.push_str(" NOT FOR REPLICATION");
    }
    sql
}

pub(super) fn check(mode: Mode, constraint: &CheckConstraint) -> String {
    let mut sql = String::new();
    if let Some(name) = &constraint.name {
        write!(sql, "CONSTRAINT {} ", ident(mode, name)).expect("write to String");
    }
    sql.push_str("CHECK ");
    if constraint.not_for_replication && mode == Mode::Mssql {
        sql.push_str("NOT FOR REPLICATION ");
    }
    write!(sql, "({})", expr(mode, &constraint.expr)).expect("write to String");
    if constraint.no_inherit && mode == Mode::Postgres {
        sql.push_str(" NO INHERIT");
    }
    sql
}

pub(super) fn primary_key(mode: Mode, pk: &PrimaryKey) -> String {
    let mut sql = String::new();
    if let Some(name) = &pk.name {
        write!(sql, "CONSTRAINT {} ", ident(mode, name)).expect("write to String");
    }
    sql.push_str("PRIMARY KEY");
    if mode == Mode::Mssql {
        match pk.clustered {
            Some(true) => sql.push_str(" CLUSTERED"),
            Some(false) => sql.push_str(" NONCLUSTERED"),
            None => {}
        }
    }
    write!(sql, " ({})", key_parts(mode, &pk.columns)).expect("write to String");
    sql
}

/// Full column definition as used by `CREATE TABLE`, `ADD COLUMN`, and
/// MySQL `MODIFY COLUMN`.
pub(super) fn column_spec(mode: Mode, table: &QualifiedName, column: &Column) -> Result<String> {
    let mut sql = format!(
        "{} {}",
        ident(mode, &column.name),
        data_type(mode, &column.data_type)
    );

    if let Some(collation) = &column.collation {
        write!(sql, " COLLATE {collation}").expect("write to String");
    }

    if let Some(generated) = &column.generated {
        write!(
            sql,
            " GENERATED ALWAYS AS ({})",
            expr(mode, &generated.expr)
        )
        .expect("write to String");
        sql.push_str(if generated.stored { " STORED" } else { " VIRTUAL" });
    }

    if !column.nullable {
        sql.push_str(" NOT NULL");
    } else if mode == Mode::Mssql {
        // ALTER COLUMN without an explicit nullability resets it; always
        // spell it out.
        sql.push_str(" NULL");
    }

    if let Some(default) = &column.default {
        match mode {
            Mode::Mssql => {
                let name = column
                    .default_constraint
                    .as_ref()
                    .map(|n| ident(mode, n))
                    .unwrap_or_else(|| {
                        format!("DF_{}_{}", table.name.value, column.name.value)
                    });
                write!(sql, " CONSTRAINT {name} DEFAULT {}", expr(mode, default))
                    .expect("write to String");
            }
            _ => write!(sql, " DEFAULT {}", expr(mode, default)).expect("write to String"),
        }
    }

    if column.auto_increment {
        if mode != Mode::Mysql {
            return Err(UnsupportedOperation::new(
                mode,
                format!("AUTO_INCREMENT on column `{}`", column.name.value),
            )
            .into());
        }
        sql.push_str(" AUTO_INCREMENT");
    }

    if let Some(identity) = &column.identity {
        match mode {
            Mode::Mssql => {
                write!(sql, " IDENTITY({},{})", identity.seed, identity.increment)
                    .expect("write to String");
                if column.not_for_replication {
                    sql.push_str(" NOT FOR REPLICATION");
                }
            }
            Mode::Postgres => {
                sql.push_str(if identity.always {
                    " GENERATED ALWAYS AS IDENTITY"
                } else {
                    " GENERATED BY DEFAULT AS IDENTITY"
                });
                if identity.seed != 1 || identity.increment != 1 {
                    write!(
                        sql,
                        " (START WITH {} INCREMENT BY {})",
                        identity.seed, identity.increment
                    )
                    .expect("write to String");
                }
            }
            Mode::Mysql => {
                return Err(UnsupportedOperation::new(
                    mode,
                    format!("identity column `{}`", column.name.value),
                )
                .into());
            }
        }
    }

    if let Some(on_update) = &column.on_update {
        if mode != Mode::Mysql {
            return Err(UnsupportedOperation::new(
                mode,
                format!("ON UPDATE clause on column `{}`", column.name.value),
            )
            .into());
        }
        write!(sql, " ON UPDATE {}", expr(mode, on_update)).expect("write to String");
    }

    if let Some(comment) = &column.comment
        && mode == Mode::Mysql
    {
        write!(sql, " COMMENT '{}'", comment.replace('\'', "''")).expect("write to String");
    }

    Ok(sql)
}

/// `CREATE TABLE` body shared by every dialect; `inline_indexes` controls
/// whether plain indexes render inside the definition (MySQL) or are left
/// for separate `CREATE INDEX` statements.
pub(super) fn create_table(mode: Mode, table: &Table, inline_indexes: bool) -> Result<String> {
    let mut definitions = Vec::new();

    for column in &table.columns {
        definitions.push(column_spec(mode, &table.name, column)?);
    }

    if let Some(pk) = &table.primary_key {
        definitions.push(primary_key(mode, pk));
    }

    for index in &table.indexes {
        if index.from_constraint && !index.unique {
            continue;
        }
        if index.unique && index.from_constraint {
            definitions.push(format!(
                "CONSTRAINT {} UNIQUE ({})",
                ident(mode, &index.name),
                key_parts(mode, &index.columns)
            ));
        } else if inline_indexes && index.index_type.is_none() && index.predicate.is_none() {
            let kind = if index.unique { "UNIQUE KEY" } else { "KEY" };
            definitions.push(format!(
                "{kind} {} ({})",
                ident(mode, &index.name),
                key_parts(mode, &index.columns)
            ));
        }
    }

    for fk in &table.foreign_keys {
        definitions.push(foreign_key(mode, fk));
    }

    for constraint in &table.checks {
        definitions.push(check(mode, constraint));
    }

    let mut sql = format!("CREATE TABLE {} (", qualified(mode, &table.name));
    for (i, definition) in definitions.iter().enumerate() {
        if i > 0 {
            sql.push(',');
        }
        sql.push('\n');
        sql.push_str(INDENT);
        sql.push_str(definition);
    }
    sql.push_str("\n)");

    if mode == Mode::Mysql {
        if let Some(engine) = &table.options.engine {
            write!(sql, " ENGINE={engine}").expect("write to String");
        }
        if let Some(charset) = &table.options.charset {
            write!(sql, " DEFAULT CHARSET={charset}").expect("write to String");
        }
        if let Some(collation) = &table.options.collation {
            write!(sql, " COLLATE={collation}").expect("write to String");
        }
    }

    sql.push(';');
    Ok(sql)
}

/// Standalone `CREATE INDEX` statement.
pub(super) fn create_index(mode: Mode, table: &QualifiedName, index: &Index) -> String {
    let mut sql = String::from("CREATE ");
    if index.unique {
        sql.push_str("UNIQUE ");
    }
    if mode == Mode::Mssql
        && let Some(kind) = &index.index_type
    {
        write!(sql, "{} ", kind.to_uppercase()).expect("write to String");
    }
    write!(
        sql,
        "INDEX {} ON {}",
        ident(mode, &index.name),
        qualified(mode, table)
    )
    .expect("write to String");

    if mode == Mode::Postgres
        && let Some(kind) = &index.index_type
    {
        write!(sql, " USING {}", kind.to_lowercase()).expect("write to String");
    }

    write!(sql, " ({})", key_parts(mode, &index.columns)).expect("write to String");

    if mode == Mode::Mysql
        && let Some(kind) = &index.index_type
    {
        write!(sql, " USING {}", kind.to_uppercase()).expect("write to String");
    }

    if !index.include.is_empty() {
        write!(sql, " INCLUDE ({})", ident_list(mode, &index.include)).expect("write to String");
    }

    if !index.options.is_empty() {
        let rendered: Vec<String> = index
            .options
            .iter()
            .map(|(key, value)| {
                if value.is_empty() {
                    key.clone()
                } else {
                    format!("{key} = {value}")
                }
            })
            .collect();
        write!(sql, " WITH ({})", rendered.join(", ")).expect("write to String");
    }

    if let Some(predicate) = &index.predicate {
        write!(sql, " WHERE {}", expr(mode, predicate)).expect("write to String");
    }

    sql.push(';');
    sql
}

pub(super) fn unsupported(mode: Mode, description: impl Into<String>) -> crate::Error {
    UnsupportedOperation::new(mode, description).into()
}
