//! The `Database` capability consumed by the engine, and its file-backed
//! implementation.
//!
//! Live connectivity is an external collaborator: a driver crate implements
//! this trait over a single connection and hands it to the engine. The
//! engine itself ships only [`FileDatabase`], which serves a schema from DDL
//! files and turns `execute` into a no-op.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{ConnectionError, Result};
use crate::parser::split_sql_statements;

/// A single database connection yielding DDL strings and executing DDL
/// statements. Methods are synchronous and sequential; implementations must
/// return rows in a caller-sorted, deterministic order.
pub trait Database {
    /// Qualified table names, sorted so tables with no unresolved foreign
    /// key dependencies come first; tables on FK cycles come last.
    fn table_names(&mut self) -> Result<Vec<String>>;

    /// Canonical `CREATE TABLE` DDL including inline indexes and foreign
    /// keys.
    fn dump_table_ddl(&mut self, table: &str) -> Result<String>;

    fn views(&mut self) -> Result<Vec<String>>;

    fn triggers(&mut self) -> Result<Vec<String>>;

    /// `CREATE TYPE` statements; empty for dialects without them.
    fn types(&mut self) -> Result<Vec<String>>;

    fn execute(&mut self, ddl: &str) -> Result<()>;

    fn close(&mut self) -> Result<()>;

    /// The whole current schema as concatenated DDL. The default
    /// composition queries the narrow methods in dependency order.
    fn export_schema(&mut self) -> Result<String> {
        let mut out = String::new();
        for table in self.table_names()? {
            push_statement(&mut out, &self.dump_table_ddl(&table)?);
        }
        for view in self.views()? {
            push_statement(&mut out, &view);
        }
        for trigger in self.triggers()? {
            push_statement(&mut out, &trigger);
        }
        for type_ddl in self.types()? {
            push_statement(&mut out, &type_ddl);
        }
        Ok(out)
    }
}

fn push_statement(out: &mut String, ddl: &str) {
    let trimmed = ddl.trim();
    if trimmed.is_empty() {
        return;
    }
    out.push_str(trimmed);
    if !trimmed.ends_with(';') {
        out.push(';');
    }
    out.push('\n');
}

/// Schema source backed by DDL files; `execute` does nothing.
pub struct FileDatabase {
    statements: Vec<String>,
    closed: bool,
}

impl FileDatabase {
    /// Reads and concatenates the given files; `-` means stdin.
    pub fn open(paths: &[PathBuf]) -> Result<Self> {
        let mut contents = String::new();
        for path in paths {
            if path.as_os_str() == "-" {
                std::io::stdin()
                    .read_to_string(&mut contents)
                    .map_err(|source| {
                        ConnectionError::with_cause("reading schema from stdin", Box::new(source))
                    })?;
            } else {
                contents.push_str(&read_schema_file(path)?);
            }
            if !contents.ends_with('\n') {
                contents.push('\n');
            }
        }
        Ok(Self::from_sql(&contents))
    }

    pub fn from_sql(sql: &str) -> Self {
        Self {
            statements: split_sql_statements(sql)
                .into_iter()
                .map(|fragment| fragment.text)
                .collect(),
            closed: false,
        }
    }

    fn statements_where(&self, predicate: impl Fn(&[String]) -> bool) -> Vec<String> {
        self.statements
            .iter()
            .filter(|statement| {
                let words: Vec<String> = statement
                    .split_whitespace()
                    .take(4)
                    .map(str::to_ascii_lowercase)
                    .collect();
                predicate(&words)
            })
            .cloned()
            .collect()
    }
}

fn read_schema_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| {
        ConnectionError::with_cause(
            format!("reading schema file `{}`", path.display()),
            Box::new(source),
        )
        .into()
    })
}

impl Database for FileDatabase {
    fn table_names(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for statement in &self.statements {
            if let Some(name) = create_table_name(statement) {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn dump_table_ddl(&mut self, table: &str) -> Result<String> {
        let wanted = table.to_ascii_lowercase();
        let matching = self.statements_where(|words| match words {
            [create, kind, name, ..] if create == "create" && kind == "table" => {
                trim_ident(name).ends_with(&wanted)
            }
            [alter, kind, name, ..] if alter == "alter" && kind == "table" => {
                trim_ident(name).ends_with(&wanted)
            }
            _ => false,
        });
        Ok(matching.join(";\n"))
    }

    fn views(&mut self) -> Result<Vec<String>> {
        Ok(self.statements_where(|words| matches!(words, [c, k, ..] if c == "create" && k == "view")))
    }

    fn triggers(&mut self) -> Result<Vec<String>> {
        Ok(self
            .statements_where(|words| matches!(words, [c, k, ..] if c == "create" && k == "trigger")))
    }

    fn types(&mut self) -> Result<Vec<String>> {
        Ok(self.statements_where(|words| matches!(words, [c, k, ..] if c == "create" && k == "type")))
    }

    fn execute(&mut self, _ddl: &str) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    /// File contents already are the schema; no recomposition needed.
    fn export_schema(&mut self) -> Result<String> {
        let mut out = String::new();
        for statement in &self.statements {
            push_statement(&mut out, statement);
        }
        Ok(out)
    }
}

fn create_table_name(statement: &str) -> Option<String> {
    let mut words = statement.split_whitespace();
    if !words.next()?.eq_ignore_ascii_case("create") {
        return None;
    }
    let mut word = words.next()?;
    if word.eq_ignore_ascii_case("temp") || word.eq_ignore_ascii_case("temporary") {
        word = words.next()?;
    }
    if !word.eq_ignore_ascii_case("table") {
        return None;
    }
    let mut name = words.next()?;
    if name.eq_ignore_ascii_case("if") {
        // IF NOT EXISTS
        words.next()?;
        words.next()?;
        name = words.next()?;
    }
    Some(trim_ident(name))
}

fn trim_ident(raw: &str) -> String {
    raw.split('(')
        .next()
        .unwrap_or(raw)
        .trim_matches(|c: char| matches!(c, '"' | '`' | '[' | ']' | ';'))
        .to_ascii_lowercase()
}
