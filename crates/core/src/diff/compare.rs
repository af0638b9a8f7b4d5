//! Object-set diff and table refinement.

use std::collections::{BTreeMap, BTreeSet};

use super::ops::ChangeOp;
use crate::error::{Result, UnsupportedOperation};
use crate::ir::{
    CheckConstraint, Column, ColumnPosition, CommentDef, Expr, Extension, ForeignKey, IdentKey,
    Index, Literal, NameKey, Policy, SchemaObject, Sequence, Table, Trigger, TypeDef, TypeKind,
    View,
};
use crate::Mode;

pub(super) fn compare_schemas(
    mode: Mode,
    current: &[SchemaObject],
    desired: &[SchemaObject],
) -> Result<Vec<ChangeOp>> {
    let current_buckets = Buckets::build(mode, current);
    let desired_buckets = Buckets::build(mode, desired);
    let mut ops = Vec::new();

    compare_tables(mode, &current_buckets, &desired_buckets, &mut ops)?;
    compare_views(mode, &current_buckets, &desired_buckets, &mut ops);
    compare_triggers(&current_buckets, &desired_buckets, &mut ops);
    compare_types(&current_buckets, &desired_buckets, &mut ops);
    compare_sequences(&current_buckets, &desired_buckets, &mut ops);
    compare_extensions(&current_buckets, &desired_buckets, &mut ops);
    compare_policies(&current_buckets, &desired_buckets, &mut ops);
    compare_comments(&current_buckets, &desired_buckets, &mut ops);
    foreign_key_guards(&current_buckets, &desired_buckets, &mut ops);

    Ok(ops)
}

/// Kind-partitioned view over a schema, preserving source order.
struct Buckets<'a> {
    mode: Mode,
    tables: Vec<&'a Table>,
    tables_by_key: BTreeMap<NameKey, usize>,
    views: Vec<&'a View>,
    triggers: Vec<&'a Trigger>,
    types: Vec<&'a TypeDef>,
    sequences: Vec<&'a Sequence>,
    extensions: Vec<&'a Extension>,
    policies: Vec<&'a Policy>,
    comments: Vec<&'a CommentDef>,
}

impl<'a> Buckets<'a> {
    fn build(mode: Mode, objects: &'a [SchemaObject]) -> Self {
        let mut buckets = Self {
            mode,
            tables: Vec::new(),
            tables_by_key: BTreeMap::new(),
            views: Vec::new(),
            triggers: Vec::new(),
            types: Vec::new(),
            sequences: Vec::new(),
            extensions: Vec::new(),
            policies: Vec::new(),
            comments: Vec::new(),
        };

        for object in objects {
            match object {
                SchemaObject::Table(table) => {
                    buckets
                        .tables_by_key
                        .insert(buckets.key(&table.name), buckets.tables.len());
                    buckets.tables.push(table);
                }
                SchemaObject::View(view) => buckets.views.push(view),
                SchemaObject::Trigger(trigger) => buckets.triggers.push(trigger),
                SchemaObject::Type(type_def) => buckets.types.push(type_def),
                SchemaObject::Sequence(sequence) => buckets.sequences.push(sequence),
                SchemaObject::Extension(extension) => buckets.extensions.push(extension),
                SchemaObject::Policy(policy) => buckets.policies.push(policy),
                SchemaObject::Comment(comment) => buckets.comments.push(comment),
            }
        }

        buckets
    }

    fn key(&self, name: &crate::QualifiedName) -> NameKey {
        NameKey::of(name, self.mode.rules().default_schema)
    }

    fn table(&self, key: &NameKey) -> Option<&'a Table> {
        self.tables_by_key.get(key).map(|i| self.tables[*i])
    }
}

// --- tables ------------------------------------------------------------

fn compare_tables(
    mode: Mode,
    current: &Buckets<'_>,
    desired: &Buckets<'_>,
    ops: &mut Vec<ChangeOp>,
) -> Result<()> {
    let mut matched = BTreeSet::new();

    for desired_table in &desired.tables {
        let key = desired.key(&desired_table.name);
        if let Some(current_table) = current.table(&key) {
            matched.insert(key);
            refine_table(mode, current_table, desired_table, ops)?;
            continue;
        }

        // Explicit rename: `-- @renamed from=old` on the desired table.
        let rename_source = desired_table.renamed_from.as_ref().map(|from| NameKey {
            schema: desired.key(&desired_table.name).schema,
            name: IdentKey::from(from),
        });
        if let Some(from_key) = rename_source
            && !matched.contains(&from_key)
            && let Some(current_table) = current.table(&from_key)
        {
            matched.insert(from_key);
            ops.push(ChangeOp::RenameTable {
                from: current_table.name.clone(),
                to: desired_table.name.clone(),
            });
            refine_table(mode, current_table, desired_table, ops)?;
            continue;
        }

        ops.push(ChangeOp::CreateTable((*desired_table).clone()));
    }

    for current_table in &current.tables {
        if !matched.contains(&current.key(&current_table.name)) {
            ops.push(ChangeOp::DropTable(current_table.name.clone()));
        }
    }

    Ok(())
}

fn refine_table(
    mode: Mode,
    current: &Table,
    desired: &Table,
    ops: &mut Vec<ChangeOp>,
) -> Result<()> {
    compare_columns(current, desired, ops);
    compare_primary_key(current, desired, ops);
    compare_indexes(current, desired, ops);
    compare_foreign_keys(current, desired, ops);
    compare_checks(current, desired, ops);
    compare_options(mode, current, desired)?;
    Ok(())
}

fn compare_columns(current: &Table, desired: &Table, ops: &mut Vec<ChangeOp>) {
    let table = desired.name.clone();
    let current_by_name: BTreeMap<IdentKey, &Column> = current
        .columns
        .iter()
        .map(|c| (IdentKey::from(&c.name), c))
        .collect();
    let mut matched = BTreeSet::new();

    for (position, desired_column) in desired.columns.iter().enumerate() {
        let key = IdentKey::from(&desired_column.name);
        if let Some(current_column) = current_by_name.get(&key) {
            matched.insert(key);
            if !columns_equivalent(current_column, desired_column) {
                ops.push(ChangeOp::ChangeColumn {
                    table: table.clone(),
                    from: Box::new((*current_column).clone()),
                    to: Box::new(desired_column.clone()),
                });
            }
            continue;
        }

        let rename_source = desired_column.renamed_from.as_ref().map(IdentKey::from);
        if let Some(from_key) = rename_source
            && !matched.contains(&from_key)
            && let Some(current_column) = current_by_name.get(&from_key)
        {
            matched.insert(from_key);
            ops.push(ChangeOp::RenameColumn {
                table: table.clone(),
                from: current_column.name.clone(),
                to: desired_column.name.clone(),
            });

            let mut renamed = (*current_column).clone();
            renamed.name = desired_column.name.clone();
            if !columns_equivalent(&renamed, desired_column) {
                ops.push(ChangeOp::ChangeColumn {
                    table: table.clone(),
                    from: Box::new(renamed),
                    to: Box::new(desired_column.clone()),
                });
            }
            continue;
        }

        // Position is derived from desired order for every mode; renderers
        // that cannot express it drop the clause.
        let at = if position == 0 {
            ColumnPosition::First
        } else {
            ColumnPosition::After(desired.columns[position - 1].name.clone())
        };
        ops.push(ChangeOp::AddColumn {
            table: table.clone(),
            column: Box::new(desired_column.clone()),
            position: Some(at),
        });
    }

    for current_column in &current.columns {
        let key = IdentKey::from(&current_column.name);
        if !matched.contains(&key)
            && !desired
                .columns
                .iter()
                .any(|c| IdentKey::from(&c.name) == key)
        {
            ops.push(ChangeOp::DropColumn {
                table: table.clone(),
                column: current_column.name.clone(),
            });
        }
    }
}

fn compare_primary_key(current: &Table, desired: &Table, ops: &mut Vec<ChangeOp>) {
    let table = desired.name.clone();
    match (&current.primary_key, &desired.primary_key) {
        (None, None) => {}
        (Some(current_pk), Some(desired_pk)) => {
            if current_pk.columns != desired_pk.columns
                || current_pk.clustered != desired_pk.clustered
            {
                ops.push(ChangeOp::DropPrimaryKey {
                    table: table.clone(),
                    name: current_pk.name.clone(),
                });
                ops.push(ChangeOp::AddPrimaryKey {
                    table,
                    pk: desired_pk.clone(),
                });
            }
        }
        (Some(current_pk), None) => ops.push(ChangeOp::DropPrimaryKey {
            table,
            name: current_pk.name.clone(),
        }),
        (None, Some(desired_pk)) => ops.push(ChangeOp::AddPrimaryKey {
            table,
            pk: desired_pk.clone(),
        }),
    }
}

fn compare_indexes(current: &Table, desired: &Table, ops: &mut Vec<ChangeOp>) {
    let table = desired.name.clone();
    let current_by_name: BTreeMap<IdentKey, &Index> = current
        .indexes
        .iter()
        .map(|i| (IdentKey::from(&i.name), i))
        .collect();
    let desired_names: BTreeSet<IdentKey> = desired
        .indexes
        .iter()
        .map(|i| IdentKey::from(&i.name))
        .collect();

    for desired_index in &desired.indexes {
        match current_by_name.get(&IdentKey::from(&desired_index.name)) {
            Some(current_index) => {
                if !indexes_equivalent(current_index, desired_index) {
                    ops.push(ChangeOp::DropIndex {
                        table: table.clone(),
                        index: (*current_index).clone(),
                    });
                    ops.push(ChangeOp::AddIndex {
                        table: table.clone(),
                        index: desired_index.clone(),
                    });
                }
            }
            None => ops.push(ChangeOp::AddIndex {
                table: table.clone(),
                index: desired_index.clone(),
            }),
        }
    }

    for current_index in &current.indexes {
        if !desired_names.contains(&IdentKey::from(&current_index.name)) {
            ops.push(ChangeOp::DropIndex {
                table: table.clone(),
                index: current_index.clone(),
            });
        }
    }
}

/// Index renames are never inferred; equality covers everything except the
/// bookkeeping `from_constraint` flag.
fn indexes_equivalent(current: &Index, desired: &Index) -> bool {
    current.columns == desired.columns
        && current.unique == desired.unique
        && current.index_type == desired.index_type
        && current.include == desired.include
        && current.predicate == desired.predicate
        && current.options == desired.options
}

fn compare_foreign_keys(current: &Table, desired: &Table, ops: &mut Vec<ChangeOp>) {
    let table = desired.name.clone();
    let current_by_key: BTreeMap<String, &ForeignKey> = current
        .foreign_keys
        .iter()
        .map(|fk| (fk_key(fk), fk))
        .collect();
    let desired_keys: BTreeSet<String> = desired.foreign_keys.iter().map(fk_key).collect();

    for desired_fk in &desired.foreign_keys {
        match current_by_key.get(&fk_key(desired_fk)) {
            Some(current_fk) => {
                if !foreign_keys_equivalent(current_fk, desired_fk) {
                    if let Some(name) = &current_fk.name {
                        ops.push(ChangeOp::DropForeignKey {
                            table: table.clone(),
                            name: name.clone(),
                        });
                    }
                    ops.push(ChangeOp::AddForeignKey {
                        table: table.clone(),
                        fk: desired_fk.clone(),
                    });
                }
            }
            None => ops.push(ChangeOp::AddForeignKey {
                table: table.clone(),
                fk: desired_fk.clone(),
            }),
        }
    }

    for current_fk in &current.foreign_keys {
        if !desired_keys.contains(&fk_key(current_fk))
            && let Some(name) = &current_fk.name
        {
            ops.push(ChangeOp::DropForeignKey {
                table: table.clone(),
                name: name.clone(),
            });
        }
    }
}

/// Foreign keys match by constraint name; unnamed keys fall back to their
/// structural signature.
fn fk_key(fk: &ForeignKey) -> String {
    match &fk.name {
        Some(name) => format!("name:{:?}", IdentKey::from(name)),
        None => format!(
            "sig:{}>{}({})",
            fk.columns
                .iter()
                .map(|c| c.value.to_ascii_lowercase())
                .collect::<Vec<_>>()
                .join(","),
            fk.referenced_table,
            fk.referenced_columns
                .iter()
                .map(|c| c.value.to_ascii_lowercase())
                .collect::<Vec<_>>()
                .join(","),
        ),
    }
}

fn foreign_keys_equivalent(current: &ForeignKey, desired: &ForeignKey) -> bool {
    current.columns == desired.columns
        && current.referenced_table == desired.referenced_table
        && current.referenced_columns == desired.referenced_columns
        && current.on_delete == desired.on_delete
        && current.on_update == desired.on_update
        && current.not_for_replication == desired.not_for_replication
}

fn compare_checks(current: &Table, desired: &Table, ops: &mut Vec<ChangeOp>) {
    let table = desired.name.clone();
    let current_by_name: BTreeMap<IdentKey, &CheckConstraint> = current
        .checks
        .iter()
        .filter_map(|c| c.name.as_ref().map(|n| (IdentKey::from(n), c)))
        .collect();
    let desired_names: BTreeSet<IdentKey> = desired
        .checks
        .iter()
        .filter_map(|c| c.name.as_ref().map(IdentKey::from))
        .collect();

    for desired_check in &desired.checks {
        let Some(name) = &desired_check.name else {
            continue;
        };
        match current_by_name.get(&IdentKey::from(name)) {
            Some(current_check) => {
                if !checks_equivalent(current_check, desired_check) {
                    ops.push(ChangeOp::DropCheck {
                        table: table.clone(),
                        name: name.clone(),
                    });
                    ops.push(ChangeOp::AddCheck {
                        table: table.clone(),
                        check: desired_check.clone(),
                    });
                }
            }
            None => ops.push(ChangeOp::AddCheck {
                table: table.clone(),
                check: desired_check.clone(),
            }),
        }
    }

    for current_check in &current.checks {
        if let Some(name) = &current_check.name
            && !desired_names.contains(&IdentKey::from(name))
        {
            ops.push(ChangeOp::DropCheck {
                table: table.clone(),
                name: name.clone(),
            });
        }
    }
}

fn checks_equivalent(current: &CheckConstraint, desired: &CheckConstraint) -> bool {
    exprs_equivalent(&current.expr, &desired.expr)
        && current.no_inherit == desired.no_inherit
        && current.not_for_replication == desired.not_for_replication
}

/// Table options compare only where both sides specify a value; a dump
/// always records the engine and charset while desired DDL usually omits
/// them, and that difference is not a change.
fn compare_options(mode: Mode, current: &Table, desired: &Table) -> Result<()> {
    let conflicts = [
        ("engine", &current.options.engine, &desired.options.engine),
        ("charset", &current.options.charset, &desired.options.charset),
        (
            "collation",
            &current.options.collation,
            &desired.options.collation,
        ),
    ];

    for (what, current_value, desired_value) in conflicts {
        if let (Some(current_value), Some(desired_value)) = (current_value, desired_value)
            && current_value != desired_value
        {
            return Err(UnsupportedOperation::new(
                mode,
                format!(
                    "changing {what} of table {} from `{current_value}` to `{desired_value}`",
                    desired.name
                ),
            )
            .into());
        }
    }

    Ok(())
}

// --- columns -----------------------------------------------------------

fn columns_equivalent(current: &Column, desired: &Column) -> bool {
    current.data_type == desired.data_type
        && current.nullable == desired.nullable
        && defaults_equivalent(current.default.as_ref(), desired.default.as_ref())
        && current.auto_increment == desired.auto_increment
        && current.identity == desired.identity
        && current.generated == desired.generated
        && current.comment == desired.comment
        && current.collation == desired.collation
        && current.on_update == desired.on_update
        && current.not_for_replication == desired.not_for_replication
}

fn defaults_equivalent(current: Option<&Expr>, desired: Option<&Expr>) -> bool {
    match (current, desired) {
        (None, None) => true,
        (Some(current), Some(desired)) => exprs_equivalent(current, desired),
        _ => false,
    }
}

/// Structural equality plus the literal bridges dumps introduce: MySQL
/// quotes numeric defaults (`DEFAULT '0'`), and boolean defaults come back
/// as `1` / `0`.
fn exprs_equivalent(left: &Expr, right: &Expr) -> bool {
    if left == right {
        return true;
    }

    match (left, right) {
        (Expr::Literal(left), Expr::Literal(right)) => literals_equivalent(left, right),
        _ => false,
    }
}

fn literals_equivalent(left: &Literal, right: &Literal) -> bool {
    let text = |literal: &Literal| match literal {
        Literal::Number(text) | Literal::String(text) => Some(text.clone()),
        Literal::Bool(true) => Some("1".to_string()),
        Literal::Bool(false) => Some("0".to_string()),
        Literal::Null => None,
    };
    match (text(left), text(right)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

// --- remaining object kinds --------------------------------------------

fn compare_views(mode: Mode, current: &Buckets<'_>, desired: &Buckets<'_>, ops: &mut Vec<ChangeOp>) {
    let current_by_key: BTreeMap<NameKey, &View> = current
        .views
        .iter()
        .map(|v| (current.key(&v.name), *v))
        .collect();
    let desired_keys: BTreeSet<NameKey> = desired
        .views
        .iter()
        .map(|v| desired.key(&v.name))
        .collect();

    for desired_view in &desired.views {
        match current_by_key.get(&desired.key(&desired_view.name)) {
            Some(current_view) => {
                if current_view.query != desired_view.query
                    || current_view.columns != desired_view.columns
                {
                    if mode.rules().supports_or_replace_view {
                        ops.push(ChangeOp::ReplaceView((*desired_view).clone()));
                    } else {
                        ops.push(ChangeOp::DropView(current_view.name.clone()));
                        ops.push(ChangeOp::CreateView((*desired_view).clone()));
                    }
                }
            }
            None => ops.push(ChangeOp::CreateView((*desired_view).clone())),
        }
    }

    for current_view in &current.views {
        if !desired_keys.contains(&current.key(&current_view.name)) {
            ops.push(ChangeOp::DropView(current_view.name.clone()));
        }
    }
}

fn compare_triggers(current: &Buckets<'_>, desired: &Buckets<'_>, ops: &mut Vec<ChangeOp>) {
    let current_by_key: BTreeMap<NameKey, &Trigger> = current
        .triggers
        .iter()
        .map(|t| (current.key(&t.name), *t))
        .collect();
    let desired_keys: BTreeSet<NameKey> = desired
        .triggers
        .iter()
        .map(|t| desired.key(&t.name))
        .collect();

    for desired_trigger in &desired.triggers {
        match current_by_key.get(&desired.key(&desired_trigger.name)) {
            Some(current_trigger) => {
                if !triggers_equivalent(current, current_trigger, desired, desired_trigger) {
                    ops.push(ChangeOp::DropTrigger {
                        name: current_trigger.name.clone(),
                        table: current_trigger.table.clone(),
                    });
                    ops.push(ChangeOp::CreateTrigger((*desired_trigger).clone()));
                }
            }
            None => ops.push(ChangeOp::CreateTrigger((*desired_trigger).clone())),
        }
    }

    for current_trigger in &current.triggers {
        if !desired_keys.contains(&current.key(&current_trigger.name)) {
            ops.push(ChangeOp::DropTrigger {
                name: current_trigger.name.clone(),
                table: current_trigger.table.clone(),
            });
        }
    }
}

fn triggers_equivalent(
    current_buckets: &Buckets<'_>,
    current: &Trigger,
    desired_buckets: &Buckets<'_>,
    desired: &Trigger,
) -> bool {
    current_buckets.key(&current.table) == desired_buckets.key(&desired.table)
        && current.timing == desired.timing
        && current.events == desired.events
        && current.for_each_row == desired.for_each_row
        && current.body == desired.body
}

fn compare_types(current: &Buckets<'_>, desired: &Buckets<'_>, ops: &mut Vec<ChangeOp>) {
    let current_by_key: BTreeMap<NameKey, &TypeDef> = current
        .types
        .iter()
        .map(|t| (current.key(&t.name), *t))
        .collect();
    let desired_keys: BTreeSet<NameKey> = desired
        .types
        .iter()
        .map(|t| desired.key(&t.name))
        .collect();

    for desired_type in &desired.types {
        match current_by_key.get(&desired.key(&desired_type.name)) {
            Some(current_type) => match (&current_type.kind, &desired_type.kind) {
                (TypeKind::Enum(current_values), TypeKind::Enum(desired_values))
                    if desired_values.starts_with(current_values)
                        && desired_values.len() > current_values.len() =>
                {
                    ops.push(ChangeOp::AlterType {
                        name: desired_type.name.clone(),
                        added_values: desired_values[current_values.len()..].to_vec(),
                    });
                }
                (current_kind, desired_kind) if current_kind == desired_kind => {}
                _ => {
                    ops.push(ChangeOp::DropType(current_type.name.clone()));
                    ops.push(ChangeOp::CreateType((*desired_type).clone()));
                }
            },
            None => ops.push(ChangeOp::CreateType((*desired_type).clone())),
        }
    }

    for current_type in &current.types {
        if !desired_keys.contains(&current.key(&current_type.name)) {
            ops.push(ChangeOp::DropType(current_type.name.clone()));
        }
    }
}

fn compare_sequences(current: &Buckets<'_>, desired: &Buckets<'_>, ops: &mut Vec<ChangeOp>) {
    let current_by_key: BTreeMap<NameKey, &Sequence> = current
        .sequences
        .iter()
        .map(|s| (current.key(&s.name), *s))
        .collect();
    let desired_keys: BTreeSet<NameKey> = desired
        .sequences
        .iter()
        .map(|s| desired.key(&s.name))
        .collect();

    for desired_sequence in &desired.sequences {
        match current_by_key.get(&desired.key(&desired_sequence.name)) {
            Some(current_sequence) => {
                if *current_sequence != *desired_sequence {
                    ops.push(ChangeOp::DropSequence(current_sequence.name.clone()));
                    ops.push(ChangeOp::CreateSequence((*desired_sequence).clone()));
                }
            }
            None => ops.push(ChangeOp::CreateSequence((*desired_sequence).clone())),
        }
    }

    for current_sequence in &current.sequences {
        if !desired_keys.contains(&current.key(&current_sequence.name)) {
            ops.push(ChangeOp::DropSequence(current_sequence.name.clone()));
        }
    }
}

fn compare_extensions(current: &Buckets<'_>, desired: &Buckets<'_>, ops: &mut Vec<ChangeOp>) {
    let current_by_key: BTreeMap<IdentKey, &Extension> = current
        .extensions
        .iter()
        .map(|e| (IdentKey::from(&e.name), *e))
        .collect();
    let desired_keys: BTreeSet<IdentKey> = desired
        .extensions
        .iter()
        .map(|e| IdentKey::from(&e.name))
        .collect();

    for desired_extension in &desired.extensions {
        if !current_by_key.contains_key(&IdentKey::from(&desired_extension.name)) {
            ops.push(ChangeOp::CreateExtension((*desired_extension).clone()));
        }
    }

    for current_extension in &current.extensions {
        if !desired_keys.contains(&IdentKey::from(&current_extension.name)) {
            ops.push(ChangeOp::DropExtension(current_extension.name.clone()));
        }
    }
}

fn compare_policies(current: &Buckets<'_>, desired: &Buckets<'_>, ops: &mut Vec<ChangeOp>) {
    let current_by_key: BTreeMap<(NameKey, IdentKey), &Policy> = current
        .policies
        .iter()
        .map(|p| ((current.key(&p.table), IdentKey::from(&p.name)), *p))
        .collect();
    let desired_keys: BTreeSet<(NameKey, IdentKey)> = desired
        .policies
        .iter()
        .map(|p| (desired.key(&p.table), IdentKey::from(&p.name)))
        .collect();

    for desired_policy in &desired.policies {
        let key = (
            desired.key(&desired_policy.table),
            IdentKey::from(&desired_policy.name),
        );
        match current_by_key.get(&key) {
            Some(current_policy) => {
                if !policies_equivalent(current_policy, desired_policy) {
                    ops.push(ChangeOp::DropPolicy {
                        name: current_policy.name.clone(),
                        table: current_policy.table.clone(),
                    });
                    ops.push(ChangeOp::CreatePolicy((*desired_policy).clone()));
                }
            }
            None => ops.push(ChangeOp::CreatePolicy((*desired_policy).clone())),
        }
    }

    for current_policy in &current.policies {
        let key = (
            current.key(&current_policy.table),
            IdentKey::from(&current_policy.name),
        );
        if !desired_keys.contains(&key) {
            ops.push(ChangeOp::DropPolicy {
                name: current_policy.name.clone(),
                table: current_policy.table.clone(),
            });
        }
    }
}

fn policies_equivalent(current: &Policy, desired: &Policy) -> bool {
    current.permissive.unwrap_or(true) == desired.permissive.unwrap_or(true)
        && current.command.as_deref().unwrap_or("ALL") == desired.command.as_deref().unwrap_or("ALL")
        && current.roles == desired.roles
        && current.using == desired.using
        && current.with_check == desired.with_check
}

fn compare_comments(current: &Buckets<'_>, desired: &Buckets<'_>, ops: &mut Vec<ChangeOp>) {
    let target_key = |buckets: &Buckets<'_>, comment: &CommentDef| match &comment.target {
        crate::ir::CommentTarget::Table(table) => ("table", buckets.key(table)),
        crate::ir::CommentTarget::Column(table, _) => ("column", buckets.key(table)),
    };

    let current_by_key: BTreeMap<(&str, NameKey), &CommentDef> = current
        .comments
        .iter()
        .map(|c| (target_key(current, c), *c))
        .collect();
    let desired_keys: BTreeSet<(&str, NameKey)> = desired
        .comments
        .iter()
        .map(|c| target_key(desired, c))
        .collect();

    for desired_comment in &desired.comments {
        match current_by_key.get(&target_key(desired, desired_comment)) {
            Some(current_comment) => {
                if current_comment.text != desired_comment.text {
                    ops.push(ChangeOp::SetComment((*desired_comment).clone()));
                }
            }
            None => ops.push(ChangeOp::SetComment((*desired_comment).clone())),
        }
    }

    for current_comment in &current.comments {
        if !desired_keys.contains(&target_key(current, current_comment)) {
            ops.push(ChangeOp::DropComment {
                target: current_comment.target.clone(),
            });
        }
    }
}

// --- foreign-key guards ------------------------------------------------

/// A type change on a column that participates in a foreign key must be
/// bracketed by dropping and re-adding that key; the ordering pass then
/// places the drop before every column change and the re-add at the end of
/// the plan.
fn foreign_key_guards(current: &Buckets<'_>, desired: &Buckets<'_>, ops: &mut Vec<ChangeOp>) {
    let mut changed: BTreeSet<(NameKey, IdentKey)> = BTreeSet::new();
    for op in ops.iter() {
        if let ChangeOp::ChangeColumn { table, from, to } = op
            && from.data_type != to.data_type
        {
            changed.insert((desired.key(table), IdentKey::from(&to.name)));
        }
    }
    if changed.is_empty() {
        return;
    }

    let mut dropped: BTreeSet<(NameKey, IdentKey)> = ops
        .iter()
        .filter_map(|op| match op {
            ChangeOp::DropForeignKey { table, name } => {
                Some((current.key(table), IdentKey::from(name)))
            }
            _ => None,
        })
        .collect();

    let mut guards = Vec::new();
    for current_table in &current.tables {
        let table_key = current.key(&current_table.name);
        for fk in &current_table.foreign_keys {
            let Some(name) = &fk.name else {
                continue;
            };

            let owns_changed = fk
                .columns
                .iter()
                .any(|c| changed.contains(&(table_key.clone(), IdentKey::from(c))));
            let references_changed = fk.referenced_columns.iter().any(|c| {
                changed.contains(&(current.key(&fk.referenced_table), IdentKey::from(c)))
            });
            if !owns_changed && !references_changed {
                continue;
            }

            let drop_key = (table_key.clone(), IdentKey::from(name));
            if dropped.contains(&drop_key) {
                continue;
            }

            // The desired schema still carries this key (otherwise the
            // constraint diff would have dropped it already); re-add the
            // desired version after the column changes.
            let Some(desired_fk) = desired
                .table(&table_key)
                .and_then(|t| {
                    t.foreign_keys.iter().find(|candidate| {
                        candidate
                            .name
                            .as_ref()
                            .is_some_and(|n| IdentKey::from(n) == IdentKey::from(name))
                    })
                })
            else {
                continue;
            };

            dropped.insert(drop_key);
            guards.push(ChangeOp::DropForeignKey {
                table: current_table.name.clone(),
                name: name.clone(),
            });
            guards.push(ChangeOp::AddForeignKey {
                table: current_table.name.clone(),
                fk: desired_fk.clone(),
            });
        }
    }

    ops.extend(guards);
}
