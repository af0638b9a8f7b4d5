//! Plan execution: a thin sequencing layer over the `Database` capability.
//!
//! No decisions are made here. Statements run one by one; the first failure
//! stops the run and reports the offending statement verbatim. Earlier
//! statements stay applied; rollback semantics are dialect-dependent and
//! intentionally not attempted.

use tracing::debug;

use crate::cancel::CancelToken;
use crate::database::Database;
use crate::error::{Error, ExecutionError, Result};
use crate::render::Statement;

pub struct Executor<'a> {
    database: &'a mut dyn Database,
    cancel: CancelToken,
}

impl<'a> Executor<'a> {
    #[must_use]
    pub fn new(database: &'a mut dyn Database, cancel: CancelToken) -> Self {
        Self { database, cancel }
    }

    /// Executes the plan in order. Returns the number of statements run.
    pub fn execute_plan(&mut self, statements: &[Statement]) -> Result<usize> {
        let mut executed = 0usize;

        for statement in statements {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let Statement::Sql { sql, .. } = statement else {
                // Batch boundaries matter to script output, not to a live
                // connection issuing one statement at a time.
                continue;
            };

            debug!(statement = %sql, "executing");
            self.database.execute(sql).map_err(|cause| {
                Error::Execution(ExecutionError {
                    statement: sql.clone(),
                    executed,
                    cause: Box::new(cause),
                })
            })?;
            executed += 1;
        }

        Ok(executed)
    }
}
