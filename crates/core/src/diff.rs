//! The differ: computes an ordered change-operation plan that transforms the
//! current schema into the desired one.

mod compare;
mod cycle;
mod ops;
mod skip_drop;

pub use ops::ChangeOp;
pub use skip_drop::{SkippedOp, is_destructive};

use crate::error::Result;
use crate::ir::SchemaObject;
use crate::ordering::sort_ops;
use crate::Mode;

/// Differ configuration, carried alongside the generator mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffOptions {
    /// Suppress destructive operations; suppressed operations are reported
    /// in [`DiffOutcome::skipped`].
    pub skip_drop: bool,
}

/// An ordered plan plus the operations withheld by skip-drop.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffOutcome {
    pub ops: Vec<ChangeOp>,
    pub skipped: Vec<SkippedOp>,
}

impl DiffOutcome {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty() && self.skipped.is_empty()
    }
}

/// Pure function of `(current, desired, mode)`; holds no state and can run
/// concurrently on disjoint inputs.
#[derive(Debug, Clone, Copy)]
pub struct Differ {
    mode: Mode,
}

impl Differ {
    #[must_use]
    pub const fn new(mode: Mode) -> Self {
        Self { mode }
    }

    /// Computes the ordered plan. `current` and `desired` must be assembled
    /// and normalized.
    pub fn diff(
        &self,
        current: &[SchemaObject],
        desired: &[SchemaObject],
        options: DiffOptions,
    ) -> Result<DiffOutcome> {
        let ops = compare::compare_schemas(self.mode, current, desired)?;
        let ops = cycle::split_fk_cycles(self.mode, ops, current);
        let ops = sort_ops(self.mode, ops);

        let (ops, skipped) = if options.skip_drop {
            skip_drop::filter(ops)
        } else {
            (ops, Vec::new())
        };

        Ok(DiffOutcome { ops, skipped })
    }
}
