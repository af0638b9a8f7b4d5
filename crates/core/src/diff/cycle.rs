//! Foreign-key cycle handling.
//!
//! Mutually referencing tables cannot be created with their foreign keys
//! inline in any order, and cannot be dropped in any order while the keys
//! still exist. On the create side, keys on cyclic edges are stripped out
//! of the `CreateTable` definitions and re-emitted as standalone
//! `AddForeignKey` operations, which the ordering pass places after every
//! table exists. On the drop side, the cyclic keys get explicit
//! `DropForeignKey` operations ahead of the `DropTable`s.

use std::collections::{BTreeMap, BTreeSet};

use super::ops::ChangeOp;
use crate::ir::{NameKey, QualifiedName, SchemaObject, Table};
use crate::Mode;

pub(super) fn split_fk_cycles(
    mode: Mode,
    ops: Vec<ChangeOp>,
    current: &[SchemaObject],
) -> Vec<ChangeOp> {
    let ops = split_create_cycles(mode, ops);
    break_drop_cycles(mode, ops, current)
}

fn split_create_cycles(mode: Mode, ops: Vec<ChangeOp>) -> Vec<ChangeOp> {
    let created: Vec<&Table> = ops
        .iter()
        .filter_map(|op| match op {
            ChangeOp::CreateTable(table) => Some(table),
            _ => None,
        })
        .collect();
    if created.len() < 2 {
        return ops;
    }

    let graph = FkGraph::build(mode, &created);
    let cyclic = graph.cyclic_edges();
    if cyclic.is_empty() {
        return ops;
    }

    let mut out = Vec::with_capacity(ops.len());
    let mut deferred = Vec::new();

    for op in ops {
        match op {
            ChangeOp::CreateTable(mut table) => {
                let source = graph.index_of(mode, &table.name);
                let mut retained = Vec::with_capacity(table.foreign_keys.len());

                for fk in table.foreign_keys {
                    let target = graph.index_of(mode, &fk.referenced_table);
                    let on_cycle = match (source, target) {
                        (Some(source), Some(target)) if source != target => {
                            cyclic.contains(&(source, target))
                        }
                        _ => false,
                    };

                    if on_cycle {
                        deferred.push(ChangeOp::AddForeignKey {
                            table: table.name.clone(),
                            fk,
                        });
                    } else {
                        retained.push(fk);
                    }
                }

                table.foreign_keys = retained;
                out.push(ChangeOp::CreateTable(table));
            }
            other => out.push(other),
        }
    }

    out.extend(deferred);
    out
}

/// Tables dropped together keep their foreign keys until the drop, so a
/// reference cycle among them blocks every drop order. Emit explicit key
/// drops for the cyclic edges first.
fn break_drop_cycles(mode: Mode, mut ops: Vec<ChangeOp>, current: &[SchemaObject]) -> Vec<ChangeOp> {
    let default_schema = mode.rules().default_schema;
    let dropped_keys: BTreeSet<NameKey> = ops
        .iter()
        .filter_map(|op| match op {
            ChangeOp::DropTable(name) => Some(NameKey::of(name, default_schema)),
            _ => None,
        })
        .collect();
    if dropped_keys.len() < 2 {
        return ops;
    }

    let dropped_tables: Vec<&Table> = current
        .iter()
        .filter_map(|object| match object {
            SchemaObject::Table(table)
                if dropped_keys.contains(&NameKey::of(&table.name, default_schema)) =>
            {
                Some(table)
            }
            _ => None,
        })
        .collect();

    let graph = FkGraph::build(mode, &dropped_tables);
    let cyclic = graph.cyclic_edges();
    if cyclic.is_empty() {
        return ops;
    }

    let mut breakers = Vec::new();
    for (i, table) in dropped_tables.iter().enumerate() {
        for fk in &table.foreign_keys {
            let Some(name) = &fk.name else {
                continue;
            };
            let Some(target) = graph.index_of(mode, &fk.referenced_table) else {
                continue;
            };
            if target != i && cyclic.contains(&(i, target)) {
                breakers.push(ChangeOp::DropForeignKey {
                    table: table.name.clone(),
                    name: name.clone(),
                });
            }
        }
    }

    breakers.append(&mut ops);
    breakers
}

struct FkGraph {
    index_by_table: BTreeMap<NameKey, usize>,
    dependencies: Vec<BTreeSet<usize>>,
}

impl FkGraph {
    fn build(mode: Mode, tables: &[&Table]) -> Self {
        let default_schema = mode.rules().default_schema;
        let mut index_by_table = BTreeMap::new();
        for (i, table) in tables.iter().enumerate() {
            index_by_table.insert(NameKey::of(&table.name, default_schema), i);
        }

        let mut dependencies = vec![BTreeSet::new(); tables.len()];
        for (i, table) in tables.iter().enumerate() {
            for fk in &table.foreign_keys {
                let target = NameKey::of(&fk.referenced_table, default_schema);
                if let Some(target_index) = index_by_table.get(&target).copied()
                    && target_index != i
                {
                    dependencies[i].insert(target_index);
                }
            }
        }

        Self {
            index_by_table,
            dependencies,
        }
    }

    fn index_of(&self, mode: Mode, name: &QualifiedName) -> Option<usize> {
        self.index_by_table
            .get(&NameKey::of(name, mode.rules().default_schema))
            .copied()
    }

    /// An edge is cyclic when its target can reach its source.
    fn cyclic_edges(&self) -> BTreeSet<(usize, usize)> {
        let mut cyclic = BTreeSet::new();
        for (source, targets) in self.dependencies.iter().enumerate() {
            for target in targets {
                if self.reaches(*target, source) {
                    cyclic.insert((source, *target));
                }
            }
        }
        cyclic
    }

    fn reaches(&self, from: usize, to: usize) -> bool {
        let mut stack = vec![from];
        let mut visited = BTreeSet::new();

        while let Some(node) = stack.pop() {
            if node == to {
                return true;
            }
            if !visited.insert(node) {
                continue;
            }
            for next in &self.dependencies[node] {
                if !visited.contains(next) {
                    stack.push(*next);
                }
            }
        }

        false
    }
}
