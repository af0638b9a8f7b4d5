#![allow(dead_code)]

use ddlsync_core::{ConnectionError, Database, Result};

/// In-memory `Database` that records executed statements and can be told to
/// fail on a marker statement.
pub struct RecordingDatabase {
    pub current_schema: String,
    pub executed: Vec<String>,
    pub fail_on_contains: Option<String>,
    pub closed: bool,
}

impl RecordingDatabase {
    pub fn new(current_schema: &str) -> Self {
        Self {
            current_schema: current_schema.to_string(),
            executed: Vec::new(),
            fail_on_contains: None,
            closed: false,
        }
    }

    pub fn failing_on(current_schema: &str, marker: &str) -> Self {
        let mut database = Self::new(current_schema);
        database.fail_on_contains = Some(marker.to_string());
        database
    }
}

impl Database for RecordingDatabase {
    fn table_names(&mut self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn dump_table_ddl(&mut self, _table: &str) -> Result<String> {
        Ok(String::new())
    }

    fn views(&mut self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn triggers(&mut self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn types(&mut self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn execute(&mut self, ddl: &str) -> Result<()> {
        if let Some(marker) = &self.fail_on_contains
            && ddl.contains(marker.as_str())
        {
            return Err(ConnectionError::new(format!("simulated failure on `{ddl}`")).into());
        }
        self.executed.push(ddl.to_string());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn export_schema(&mut self) -> Result<String> {
        Ok(self.current_schema.clone())
    }
}
