//! Post-assembly canonicalization.
//!
//! The parser already produces canonical data types; this pass canonicalizes
//! everything that needs schema-level or mode-level context so that plain
//! equality on the model is the semantic equality the differ wants.

use crate::ir::{Column, Expr, SchemaObject, Table};
use crate::Mode;

pub fn normalize(mode: Mode, objects: &mut [SchemaObject]) {
    for object in objects {
        match object {
            SchemaObject::Table(table) => normalize_table(mode, table),
            SchemaObject::View(view) => view.query = collapse_sql(&view.query),
            SchemaObject::Trigger(trigger) => trigger.body = collapse_sql(&trigger.body),
            SchemaObject::Policy(policy) => {
                policy.using = policy.using.take().map(|e| normalize_expr(mode, e));
                policy.with_check = policy.with_check.take().map(|e| normalize_expr(mode, e));
            }
            SchemaObject::Type(_)
            | SchemaObject::Sequence(_)
            | SchemaObject::Extension(_)
            | SchemaObject::Comment(_) => {}
        }
    }
}

fn normalize_table(mode: Mode, table: &mut Table) {
    for column in &mut table.columns {
        normalize_column(mode, column);
    }

    for check in &mut table.checks {
        check.expr = normalize_expr(mode, check.expr.clone());
    }

    for index in &mut table.indexes {
        // The per-mode default access method is dropped so `USING BTREE` and
        // an unadorned index compare equal.
        let default_method = match mode {
            Mode::Mysql | Mode::Postgres => "btree",
            Mode::Mssql => "nonclustered",
        };
        if index.index_type.as_deref() == Some(default_method) {
            index.index_type = None;
        }
        if let Some(predicate) = index.predicate.take() {
            index.predicate = Some(normalize_expr(mode, predicate));
        }
    }

    if let Some(engine) = &table.options.engine {
        table.options.engine = Some(engine.to_ascii_lowercase());
    }
    if let Some(charset) = &table.options.charset {
        table.options.charset = Some(charset.to_ascii_lowercase());
    }
    if let Some(collation) = &table.options.collation {
        table.options.collation = Some(collation.to_ascii_lowercase());
    }
}

fn normalize_column(mode: Mode, column: &mut Column) {
    if column.auto_increment || column.identity.is_some() {
        column.nullable = false;
    }

    if let Some(default) = column.default.take() {
        column.default = Some(normalize_expr(mode, default));
    }
    if let Some(on_update) = column.on_update.take() {
        column.on_update = Some(normalize_expr(mode, on_update));
    }
    if let Some(collation) = &column.collation {
        column.collation = Some(collation.to_ascii_lowercase());
    }
}

fn normalize_expr(mode: Mode, expr: Expr) -> Expr {
    match expr {
        // `now()` is the spelled-out form of CURRENT_TIMESTAMP in MySQL and
        // PostgreSQL.
        Expr::FunctionCall { ref name, ref args }
            if args.is_empty()
                && name == "now"
                && matches!(mode, Mode::Mysql | Mode::Postgres) =>
        {
            Expr::CurrentTimestamp { precision: None }
        }
        Expr::FunctionCall { name, args } => Expr::FunctionCall {
            name,
            args: args.into_iter().map(|a| normalize_expr(mode, a)).collect(),
        },
        Expr::Raw(text) => Expr::Raw(collapse_sql(&text)),
        other => other,
    }
}

/// Collapses runs of whitespace and strips a trailing `;` so textual bodies
/// compare stably across dump formatting differences.
pub(crate) fn collapse_sql(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(';')
        .trim()
        .to_string()
}
