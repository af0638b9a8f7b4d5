//! The run engine: wires parser, assembler, normalizer, differ, renderer,
//! and executor into the four run modes of the tool.

use tracing::{debug, info};

use crate::assembler::assemble;
use crate::cancel::CancelToken;
use crate::database::Database;
use crate::diff::{DiffOptions, Differ};
use crate::error::Result;
use crate::executor::Executor;
use crate::ir::SchemaObject;
use crate::normalize::normalize;
use crate::parser::parse;
use crate::plan::Plan;
use crate::render::{export_schema, render_ops, statements_to_text, Statement};
use crate::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Execute the plan against the database.
    Apply,
    /// Print the plan without executing it.
    DryRun,
    /// Print the current schema and skip diffing entirely.
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub action: Action,
    pub skip_drop: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Plan applied; count of executed statements.
    Applied(usize),
    DryRun(String),
    Export(String),
}

pub struct Engine {
    mode: Mode,
}

impl Engine {
    #[must_use]
    pub const fn new(mode: Mode) -> Self {
        Self { mode }
    }

    /// Parse, assemble, and normalize one DDL text into a schema model.
    pub fn load_schema(&self, sql: &str) -> Result<Vec<SchemaObject>> {
        let statements = parse(self.mode, sql)?;
        let mut objects = assemble(self.mode, statements)?;
        normalize(self.mode, &mut objects);
        Ok(objects)
    }

    /// Diff two DDL texts into an ordered plan.
    pub fn plan(&self, current_sql: &str, desired_sql: &str, skip_drop: bool) -> Result<Plan> {
        let current = self.load_schema(current_sql)?;
        let desired = self.load_schema(desired_sql)?;

        let outcome = Differ::new(self.mode).diff(&current, &desired, DiffOptions { skip_drop })?;
        debug!(
            ops = outcome.ops.len(),
            skipped = outcome.skipped.len(),
            "plan computed"
        );
        Ok(Plan::new(outcome.ops, outcome.skipped))
    }

    /// Render a plan to dialect statements.
    pub fn statements(&self, plan: &Plan) -> Result<Vec<Statement>> {
        render_ops(self.mode, plan.ops())
    }

    /// Full run against a database: export, dry-run, or apply.
    pub fn run(
        &self,
        database: &mut dyn Database,
        desired_sql: &str,
        options: RunOptions,
        cancel: &CancelToken,
    ) -> Result<RunOutcome> {
        let current_sql = database.export_schema()?;

        if options.action == Action::Export {
            let objects = self.load_schema(&current_sql)?;
            return Ok(RunOutcome::Export(export_schema(self.mode, &objects)?));
        }

        let plan = self.plan(&current_sql, desired_sql, options.skip_drop)?;
        let statements = self.statements(&plan)?;

        match options.action {
            Action::DryRun => Ok(RunOutcome::DryRun(self.render_dry_run(&plan, &statements))),
            Action::Apply => {
                let executed =
                    Executor::new(database, cancel.clone()).execute_plan(&statements)?;
                info!(executed, "plan applied");
                Ok(RunOutcome::Applied(executed))
            }
            Action::Export => unreachable!("handled above"),
        }
    }

    fn render_dry_run(&self, plan: &Plan, statements: &[Statement]) -> String {
        let mut out = String::new();
        for skipped in plan.skipped() {
            out.push_str("-- skipped: ");
            out.push_str(&skipped.describe());
            out.push('\n');
        }
        out.push_str(&statements_to_text(self.mode, statements));
        out
    }
}
