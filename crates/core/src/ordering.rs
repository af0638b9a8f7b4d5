//! Plan ordering.
//!
//! Operations are arranged so that every prefix of the plan leaves a
//! structurally valid schema: referencing objects are dropped before the
//! objects they reference change, creations happen in dependency order, and
//! foreign keys are added last, after every table mutation. Within a group,
//! order is deterministic by qualified name.

use std::collections::{BTreeMap, BTreeSet};

use crate::diff::ChangeOp;
use crate::ir::{IdentKey, NameKey, Table, View};
use crate::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Group {
    DropPolicy,
    DropTrigger,
    DropView,
    DropForeignKey,
    DropIndex,
    DropTable,
    DropSequence,
    DropType,
    DropExtension,
    DropComment,
    CreateExtension,
    CreateType,
    AlterType,
    CreateSequence,
    CreateTable,
    TableScoped,
    AddForeignKey,
    CreateView,
    AddIndex,
    CreateTrigger,
    CreatePolicy,
    SetComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TableScopedStep {
    RenameTable,
    RenameColumn,
    ChangeColumn,
    AddColumn,
    DropColumn,
    PrimaryKey,
    Check,
}

#[derive(Debug)]
struct IndexedOp {
    original: usize,
    op: ChangeOp,
}

#[must_use]
pub fn sort_ops(mode: Mode, ops: Vec<ChangeOp>) -> Vec<ChangeOp> {
    let mut groups: BTreeMap<Group, Vec<IndexedOp>> = BTreeMap::new();
    for (original, op) in ops.into_iter().enumerate() {
        groups
            .entry(group_of(&op))
            .or_default()
            .push(IndexedOp { original, op });
    }

    let mut sorted = Vec::new();
    for (group, mut entries) in groups {
        match group {
            Group::CreateTable => sort_create_tables(mode, &mut entries),
            Group::CreateView => sort_views(mode, &mut entries),
            Group::TableScoped => sort_table_scoped(mode, &mut entries),
            Group::AddForeignKey => entries.sort_by_key(|entry| match &entry.op {
                ChangeOp::AddForeignKey { table, fk } => (
                    fk.name.as_ref().map(IdentKey::from),
                    NameKey::of(table, mode.rules().default_schema),
                    entry.original,
                ),
                _ => (None, sort_key(mode, &entry.op), entry.original),
            }),
            _ => entries.sort_by_key(|entry| (sort_key(mode, &entry.op), entry.original)),
        }
        sorted.extend(entries.into_iter().map(|entry| entry.op));
    }

    sorted
}

fn group_of(op: &ChangeOp) -> Group {
    match op {
        ChangeOp::DropPolicy { .. } => Group::DropPolicy,
        ChangeOp::DropTrigger { .. } => Group::DropTrigger,
        ChangeOp::DropView(_) => Group::DropView,
        ChangeOp::DropForeignKey { .. } => Group::DropForeignKey,
        ChangeOp::DropIndex { .. } => Group::DropIndex,
        ChangeOp::DropTable(_) => Group::DropTable,
        ChangeOp::DropSequence(_) => Group::DropSequence,
        ChangeOp::DropType(_) => Group::DropType,
        ChangeOp::DropExtension(_) => Group::DropExtension,
        ChangeOp::DropComment { .. } => Group::DropComment,
        ChangeOp::CreateExtension(_) => Group::CreateExtension,
        ChangeOp::CreateType(_) => Group::CreateType,
        ChangeOp::AlterType { .. } => Group::AlterType,
        ChangeOp::CreateSequence(_) => Group::CreateSequence,
        ChangeOp::CreateTable(_) => Group::CreateTable,
        ChangeOp::RenameTable { .. }
        | ChangeOp::RenameColumn { .. }
        | ChangeOp::ChangeColumn { .. }
        | ChangeOp::AddColumn { .. }
        | ChangeOp::DropColumn { .. }
        | ChangeOp::AddPrimaryKey { .. }
        | ChangeOp::DropPrimaryKey { .. }
        | ChangeOp::AddCheck { .. }
        | ChangeOp::DropCheck { .. } => Group::TableScoped,
        ChangeOp::AddForeignKey { .. } => Group::AddForeignKey,
        ChangeOp::CreateView(_) | ChangeOp::ReplaceView(_) => Group::CreateView,
        ChangeOp::AddIndex { .. } => Group::AddIndex,
        ChangeOp::CreateTrigger(_) => Group::CreateTrigger,
        ChangeOp::CreatePolicy(_) => Group::CreatePolicy,
        ChangeOp::SetComment(_) => Group::SetComment,
    }
}

/// Principal qualified name of an operation, as a comparison key.
fn sort_key(mode: Mode, op: &ChangeOp) -> NameKey {
    let default_schema = mode.rules().default_schema;
    let name = match op {
        ChangeOp::CreateTable(table) => &table.name,
        ChangeOp::DropTable(name) => name,
        ChangeOp::RenameTable { to, .. } => to,
        ChangeOp::AddColumn { table, .. }
        | ChangeOp::DropColumn { table, .. }
        | ChangeOp::ChangeColumn { table, .. }
        | ChangeOp::RenameColumn { table, .. }
        | ChangeOp::AddIndex { table, .. }
        | ChangeOp::DropIndex { table, .. }
        | ChangeOp::AddForeignKey { table, .. }
        | ChangeOp::DropForeignKey { table, .. }
        | ChangeOp::AddCheck { table, .. }
        | ChangeOp::DropCheck { table, .. }
        | ChangeOp::AddPrimaryKey { table, .. }
        | ChangeOp::DropPrimaryKey { table, .. }
        | ChangeOp::DropPolicy { table, .. } => table,
        ChangeOp::CreateView(view) | ChangeOp::ReplaceView(view) => &view.name,
        ChangeOp::DropView(name) => name,
        ChangeOp::CreateTrigger(trigger) => &trigger.name,
        ChangeOp::DropTrigger { name, .. } => name,
        ChangeOp::CreateType(type_def) => &type_def.name,
        ChangeOp::DropType(name) | ChangeOp::AlterType { name, .. } => name,
        ChangeOp::CreateSequence(sequence) => &sequence.name,
        ChangeOp::DropSequence(name) => name,
        ChangeOp::CreateExtension(extension) => {
            return NameKey {
                schema: None,
                name: IdentKey::from(&extension.name),
            };
        }
        ChangeOp::DropExtension(name) => {
            return NameKey {
                schema: None,
                name: IdentKey::from(name),
            };
        }
        ChangeOp::CreatePolicy(policy) => &policy.table,
        ChangeOp::SetComment(comment) => return comment_key(mode, &comment.target),
        ChangeOp::DropComment { target } => return comment_key(mode, target),
    };
    NameKey::of(name, default_schema)
}

fn comment_key(mode: Mode, target: &crate::ir::CommentTarget) -> NameKey {
    match target {
        crate::ir::CommentTarget::Table(table)
        | crate::ir::CommentTarget::Column(table, _) => {
            NameKey::of(table, mode.rules().default_schema)
        }
    }
}

fn sort_table_scoped(mode: Mode, entries: &mut [IndexedOp]) {
    entries.sort_by_key(|entry| {
        (
            sort_key(mode, &entry.op),
            table_scoped_step(&entry.op),
            entry.original,
        )
    });
}

fn table_scoped_step(op: &ChangeOp) -> TableScopedStep {
    match op {
        ChangeOp::RenameTable { .. } => TableScopedStep::RenameTable,
        ChangeOp::RenameColumn { .. } => TableScopedStep::RenameColumn,
        ChangeOp::ChangeColumn { .. } => TableScopedStep::ChangeColumn,
        ChangeOp::AddColumn { .. } => TableScopedStep::AddColumn,
        ChangeOp::DropColumn { .. } => TableScopedStep::DropColumn,
        ChangeOp::AddPrimaryKey { .. } | ChangeOp::DropPrimaryKey { .. } => {
            TableScopedStep::PrimaryKey
        }
        _ => TableScopedStep::Check,
    }
}

// --- CREATE TABLE dependency order -------------------------------------

fn sort_create_tables(mode: Mode, entries: &mut Vec<IndexedOp>) {
    let tables: Vec<&Table> = entries
        .iter()
        .filter_map(|entry| match &entry.op {
            ChangeOp::CreateTable(table) => Some(table),
            _ => None,
        })
        .collect();
    if tables.len() != entries.len() {
        return;
    }

    let default_schema = mode.rules().default_schema;
    let mut index_by_key = BTreeMap::new();
    for (i, table) in tables.iter().enumerate() {
        index_by_key.insert(NameKey::of(&table.name, default_schema), i);
    }

    let mut dependencies = vec![BTreeSet::new(); tables.len()];
    for (i, table) in tables.iter().enumerate() {
        for fk in &table.foreign_keys {
            let target = NameKey::of(&fk.referenced_table, default_schema);
            if let Some(target_index) = index_by_key.get(&target).copied()
                && target_index != i
            {
                dependencies[i].insert(target_index);
            }
        }
    }

    let keys: Vec<NameKey> = tables
        .iter()
        .map(|t| NameKey::of(&t.name, default_schema))
        .collect();
    let order = topological_order(&dependencies, &keys);

    let mut taken: Vec<Option<IndexedOp>> = std::mem::take(entries).into_iter().map(Some).collect();
    *entries = order
        .into_iter()
        .map(|i| taken[i].take().expect("each index appears once"))
        .collect();
}

// --- CREATE VIEW dependency order --------------------------------------

fn sort_views(mode: Mode, entries: &mut Vec<IndexedOp>) {
    let views: Vec<&View> = entries
        .iter()
        .filter_map(|entry| match &entry.op {
            ChangeOp::CreateView(view) | ChangeOp::ReplaceView(view) => Some(view),
            _ => None,
        })
        .collect();
    if views.len() != entries.len() {
        return;
    }

    let default_schema = mode.rules().default_schema;
    let mut indexes_by_name: BTreeMap<IdentKey, Vec<usize>> = BTreeMap::new();
    for (i, view) in views.iter().enumerate() {
        indexes_by_name
            .entry(IdentKey::from(&view.name.name))
            .or_default()
            .push(i);
    }

    let mut dependencies = vec![BTreeSet::new(); views.len()];
    for (i, view) in views.iter().enumerate() {
        for reference in relation_references(&view.query) {
            // Only unambiguous name matches become edges.
            if let Some(candidates) = indexes_by_name.get(&IdentKey::folded(&reference))
                && candidates.len() == 1
                && candidates[0] != i
            {
                dependencies[i].insert(candidates[0]);
            }
        }
    }

    let keys: Vec<NameKey> = views
        .iter()
        .map(|v| NameKey::of(&v.name, default_schema))
        .collect();
    let order = topological_order(&dependencies, &keys);

    let mut taken: Vec<Option<IndexedOp>> = std::mem::take(entries).into_iter().map(Some).collect();
    *entries = order
        .into_iter()
        .map(|i| taken[i].take().expect("each index appears once"))
        .collect();
}

/// Table and view names mentioned after `FROM` / `JOIN`, last component
/// only, unquoted and lowercased.
fn relation_references(query: &str) -> Vec<String> {
    let mut references = Vec::new();
    let mut expect_relation = false;

    for token in query.split_whitespace() {
        let token = token.trim_matches(|c: char| matches!(c, ',' | ';' | '(' | ')'));
        if token.is_empty() {
            continue;
        }

        if expect_relation {
            expect_relation = false;
            if let Some(name) = token.rsplit('.').next() {
                let name = name.trim_matches(|c: char| matches!(c, '"' | '`' | '[' | ']'));
                if !name.is_empty() {
                    references.push(name.to_ascii_lowercase());
                }
            }
            continue;
        }

        if token.eq_ignore_ascii_case("from") || token.eq_ignore_ascii_case("join") {
            expect_relation = true;
        }
    }

    references
}

/// Kahn's algorithm with a name-ordered ready set; nodes left over from a
/// cycle are appended in name order.
fn topological_order(dependencies: &[BTreeSet<usize>], keys: &[NameKey]) -> Vec<usize> {
    let mut dependents = vec![BTreeSet::new(); dependencies.len()];
    for (node, deps) in dependencies.iter().enumerate() {
        for dep in deps {
            dependents[*dep].insert(node);
        }
    }

    let mut remaining: Vec<usize> = dependencies.iter().map(BTreeSet::len).collect();
    let mut ready: BTreeSet<(NameKey, usize)> = remaining
        .iter()
        .enumerate()
        .filter(|(_, count)| **count == 0)
        .map(|(node, _)| (keys[node].clone(), node))
        .collect();

    let mut order = Vec::with_capacity(dependencies.len());
    let mut visited = vec![false; dependencies.len()];

    while let Some((_, node)) = ready.pop_first() {
        if visited[node] {
            continue;
        }
        visited[node] = true;
        order.push(node);

        for dependent in &dependents[node] {
            if remaining[*dependent] > 0 {
                remaining[*dependent] -= 1;
                if remaining[*dependent] == 0 {
                    ready.insert((keys[*dependent].clone(), *dependent));
                }
            }
        }
    }

    if order.len() != dependencies.len() {
        let mut leftover: Vec<usize> = (0..dependencies.len())
            .filter(|node| !visited[*node])
            .collect();
        leftover.sort_by_key(|node| keys[*node].clone());
        order.extend(leftover);
    }

    order
}
