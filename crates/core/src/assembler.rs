//! Folds the parsed statement list into the schema model.
//!
//! Dumps arrive as `CREATE TABLE` plus trailing `CREATE INDEX` / `ALTER
//! TABLE ... ADD` statements; those are replayed onto their tables here so
//! the differ always sees fully-assembled objects. Structural invariants
//! (unique names, no orphans, index columns exist) are enforced at this
//! stage and reported as `SchemaError`.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, SchemaError};
use crate::ir::{
    CheckConstraint, Column, ColumnPosition, CommentTarget, ForeignKey, IdentKey, Index, NameKey,
    PrimaryKey, SchemaObject, Table,
};
use crate::parser::{AlterAction, DdlStatement};
use crate::Mode;

pub fn assemble(mode: Mode, statements: Vec<DdlStatement>) -> Result<Vec<SchemaObject>> {
    let default_schema = mode.rules().default_schema;
    let mut objects: Vec<SchemaObject> = Vec::new();
    let mut tables: BTreeMap<NameKey, usize> = BTreeMap::new();
    let mut seen: BTreeSet<(&'static str, NameKey)> = BTreeSet::new();

    for statement in statements {
        match statement {
            DdlStatement::CreateTable(table) => {
                let key = NameKey::of(&table.name, default_schema);
                if tables.contains_key(&key) {
                    return Err(SchemaError::new(
                        format!("table {}", table.name),
                        "defined more than once",
                    )
                    .into());
                }
                validate_table(&table)?;
                tables.insert(key, objects.len());
                objects.push(SchemaObject::Table(table));
            }
            DdlStatement::CreateIndex { table, index } => {
                let target = lookup_table(&mut objects, &tables, &table, default_schema, "index")?;
                attach_index(target, index)?;
            }
            DdlStatement::CreateView(view) => {
                check_unique(&mut seen, "view", NameKey::of(&view.name, default_schema), || {
                    format!("view {}", view.name)
                })?;
                objects.push(SchemaObject::View(view));
            }
            DdlStatement::CreateTrigger(trigger) => {
                if !tables.contains_key(&NameKey::of(&trigger.table, default_schema)) {
                    return Err(SchemaError::new(
                        format!("trigger {}", trigger.name),
                        format!("references unknown table {}", trigger.table),
                    )
                    .into());
                }
                check_unique(
                    &mut seen,
                    "trigger",
                    NameKey::of(&trigger.name, default_schema),
                    || format!("trigger {}", trigger.name),
                )?;
                objects.push(SchemaObject::Trigger(trigger));
            }
            DdlStatement::CreateType(type_def) => {
                check_unique(
                    &mut seen,
                    "type",
                    NameKey::of(&type_def.name, default_schema),
                    || format!("type {}", type_def.name),
                )?;
                objects.push(SchemaObject::Type(type_def));
            }
            DdlStatement::CreateSequence(sequence) => {
                check_unique(
                    &mut seen,
                    "sequence",
                    NameKey::of(&sequence.name, default_schema),
                    || format!("sequence {}", sequence.name),
                )?;
                objects.push(SchemaObject::Sequence(sequence));
            }
            DdlStatement::CreateExtension(extension) => {
                objects.push(SchemaObject::Extension(extension));
            }
            DdlStatement::CreatePolicy(policy) => {
                if !tables.contains_key(&NameKey::of(&policy.table, default_schema)) {
                    return Err(SchemaError::new(
                        format!("policy {}", policy.name),
                        format!("references unknown table {}", policy.table),
                    )
                    .into());
                }
                objects.push(SchemaObject::Policy(policy));
            }
            DdlStatement::AlterTable { table, actions } => {
                let target =
                    lookup_table(&mut objects, &tables, &table, default_schema, "ALTER TABLE")?;
                for action in actions {
                    replay_alter(target, action)?;
                }
            }
            DdlStatement::Comment(comment) => match comment.target {
                // Column comments fold into the column so every dialect
                // compares them the same way; table comments stay objects.
                CommentTarget::Column(ref table, ref column_name) => {
                    let target =
                        lookup_table(&mut objects, &tables, table, default_schema, "comment")?;
                    let column = find_column_mut(target, column_name).ok_or_else(|| {
                        SchemaError::new(
                            format!("comment on {}.{}", table, column_name),
                            "references unknown column",
                        )
                    })?;
                    column.comment = comment.text;
                }
                CommentTarget::Table(_) => objects.push(SchemaObject::Comment(comment)),
            },
        }
    }

    for object in &objects {
        if let SchemaObject::Table(table) = object {
            validate_index_columns(table)?;
        }
    }

    Ok(objects)
}

fn lookup_table<'a>(
    objects: &'a mut [SchemaObject],
    tables: &BTreeMap<NameKey, usize>,
    name: &crate::QualifiedName,
    default_schema: Option<&str>,
    referrer: &str,
) -> Result<&'a mut Table> {
    let index = tables
        .get(&NameKey::of(name, default_schema))
        .copied()
        .ok_or_else(|| {
            SchemaError::new(
                format!("{referrer} on {name}"),
                "references unknown table",
            )
        })?;
    match &mut objects[index] {
        SchemaObject::Table(table) => Ok(table),
        _ => unreachable!("table index map points at tables only"),
    }
}

fn check_unique(
    seen: &mut BTreeSet<(&'static str, NameKey)>,
    kind: &'static str,
    key: NameKey,
    describe: impl FnOnce() -> String,
) -> Result<()> {
    if !seen.insert((kind, key)) {
        return Err(SchemaError::new(describe(), "defined more than once").into());
    }
    Ok(())
}

fn validate_table(table: &Table) -> Result<()> {
    let mut names = BTreeSet::new();
    for column in &table.columns {
        if !names.insert(IdentKey::from(&column.name)) {
            return Err(SchemaError::new(
                format!("table {}", table.name),
                format!("duplicate column `{}`", column.name.value),
            )
            .into());
        }
    }

    let mut index_names = BTreeSet::new();
    for index in &table.indexes {
        if !index_names.insert(IdentKey::from(&index.name)) {
            return Err(SchemaError::new(
                format!("table {}", table.name),
                format!("duplicate index `{}`", index.name.value),
            )
            .into());
        }
    }

    Ok(())
}

/// Index key and include columns must reference existing columns.
fn validate_index_columns(table: &Table) -> Result<()> {
    let columns: BTreeSet<IdentKey> = table.columns.iter().map(|c| IdentKey::from(&c.name)).collect();

    for index in &table.indexes {
        for part in &index.columns {
            if !columns.contains(&IdentKey::from(&part.column)) {
                return Err(SchemaError::new(
                    format!("index {} on {}", index.name.value, table.name),
                    format!("references unknown column `{}`", part.column.value),
                )
                .into());
            }
        }
        for included in &index.include {
            if !columns.contains(&IdentKey::from(included)) {
                return Err(SchemaError::new(
                    format!("index {} on {}", index.name.value, table.name),
                    format!("references unknown column `{}`", included.value),
                )
                .into());
            }
        }
    }

    if let Some(pk) = &table.primary_key {
        for part in &pk.columns {
            if !columns.contains(&IdentKey::from(&part.column)) {
                return Err(SchemaError::new(
                    format!("primary key on {}", table.name),
                    format!("references unknown column `{}`", part.column.value),
                )
                .into());
            }
        }
    }

    Ok(())
}

fn replay_alter(table: &mut Table, action: AlterAction) -> Result<()> {
    match action {
        AlterAction::AddColumn { column, position } => add_column(table, *column, position),
        AlterAction::AddPrimaryKey(pk) => add_primary_key(table, pk),
        AlterAction::AddForeignKey(fk) => add_foreign_key(table, fk),
        AlterAction::AddCheck(check) => add_check(table, check),
        AlterAction::AddIndex(index) => attach_index(table, index),
    }
}

fn add_column(table: &mut Table, column: Column, position: Option<ColumnPosition>) -> Result<()> {
    if find_column_mut(table, &column.name).is_some() {
        return Err(SchemaError::new(
            format!("table {}", table.name),
            format!("duplicate column `{}`", column.name.value),
        )
        .into());
    }

    match position {
        Some(ColumnPosition::First) => table.columns.insert(0, column),
        Some(ColumnPosition::After(after)) => {
            let at = table
                .columns
                .iter()
                .position(|c| IdentKey::from(&c.name) == IdentKey::from(&after))
                .ok_or_else(|| {
                    SchemaError::new(
                        format!("table {}", table.name),
                        format!("AFTER references unknown column `{}`", after.value),
                    )
                })?;
            table.columns.insert(at + 1, column);
        }
        None => table.columns.push(column),
    }

    Ok(())
}

fn add_primary_key(table: &mut Table, pk: PrimaryKey) -> Result<()> {
    if table.primary_key.is_some() {
        return Err(SchemaError::new(
            format!("table {}", table.name),
            "multiple primary keys",
        )
        .into());
    }
    for part in &pk.columns {
        if let Some(column) = find_column_mut(table, &part.column) {
            column.nullable = false;
        }
    }
    table.primary_key = Some(pk);
    Ok(())
}

fn add_foreign_key(table: &mut Table, fk: ForeignKey) -> Result<()> {
    if let Some(name) = &fk.name
        && table
            .foreign_keys
            .iter()
            .any(|existing| existing.name.as_ref().is_some_and(|n| IdentKey::from(n) == IdentKey::from(name)))
    {
        return Err(SchemaError::new(
            format!("table {}", table.name),
            format!("duplicate foreign key `{}`", name.value),
        )
        .into());
    }
    table.foreign_keys.push(fk);
    Ok(())
}

fn add_check(table: &mut Table, check: CheckConstraint) -> Result<()> {
    if let Some(name) = &check.name
        && table
            .checks
            .iter()
            .any(|existing| existing.name.as_ref().is_some_and(|n| IdentKey::from(n) == IdentKey::from(name)))
    {
        return Err(SchemaError::new(
            format!("table {}", table.name),
            format!("duplicate check constraint `{}`", name.value),
        )
        .into());
    }
    table.checks.push(check);
    Ok(())
}

fn attach_index(table: &mut Table, index: Index) -> Result<()> {
    if table
        .indexes
        .iter()
        .any(|existing| IdentKey::from(&existing.name) == IdentKey::from(&index.name))
    {
        return Err(SchemaError::new(
            format!("table {}", table.name),
            format!("duplicate index `{}`", index.name.value),
        )
        .into());
    }
    table.indexes.push(index);
    Ok(())
}

fn find_column_mut<'a>(table: &'a mut Table, name: &crate::Ident) -> Option<&'a mut Column> {
    let key = IdentKey::from(name);
    table
        .columns
        .iter_mut()
        .find(|c| IdentKey::from(&c.name) == key)
}
