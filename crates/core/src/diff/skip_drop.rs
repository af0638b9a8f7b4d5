//! Skip-drop filtering.
//!
//! With `--skip-drop`, destructive operations are removed from the plan
//! after ordering, so the surviving operations keep their relative order.
//! Every suppressed operation is reported so a dry run can show what was
//! withheld. A `ChangeColumn` whose new type cannot hold the old values
//! counts as destructive too.

use super::ops::ChangeOp;

/// An operation withheld from the plan by skip-drop.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedOp {
    pub op: ChangeOp,
}

impl SkippedOp {
    /// One-line description for dry-run output.
    pub fn describe(&self) -> String {
        format!("{} {}", self.op.tag(), self.op.target())
    }
}

pub(super) fn filter(ops: Vec<ChangeOp>) -> (Vec<ChangeOp>, Vec<SkippedOp>) {
    let mut kept = Vec::with_capacity(ops.len());
    let mut skipped = Vec::new();

    for op in ops {
        if is_destructive(&op) {
            skipped.push(SkippedOp { op });
        } else {
            kept.push(op);
        }
    }

    (kept, skipped)
}

/// The destructive set: every `Drop*`, plus narrowing column changes.
pub fn is_destructive(op: &ChangeOp) -> bool {
    match op {
        ChangeOp::DropTable(_)
        | ChangeOp::DropColumn { .. }
        | ChangeOp::DropIndex { .. }
        | ChangeOp::DropForeignKey { .. }
        | ChangeOp::DropCheck { .. }
        | ChangeOp::DropPrimaryKey { .. }
        | ChangeOp::DropView(_)
        | ChangeOp::DropTrigger { .. }
        | ChangeOp::DropType(_)
        | ChangeOp::DropSequence(_)
        | ChangeOp::DropExtension(_)
        | ChangeOp::DropPolicy { .. }
        | ChangeOp::DropComment { .. } => true,
        ChangeOp::ChangeColumn { from, to, .. } => !to.data_type.can_hold(&from.data_type),
        _ => false,
    }
}
