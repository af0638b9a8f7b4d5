//! CLI error rendering.
//!
//! Core errors carry their own source chains; this module tags them for the
//! terminal and turns them into `miette` reports so nested causes print as
//! an indented chain.

use std::io;
use std::path::PathBuf;

use anyhow::Context as _;
use miette::Report;

pub(crate) type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug)]
pub(crate) enum CliError {
    /// No database name and no current-schema file.
    MissingCurrentSchema,
    /// Live connections need a driver this build does not carry.
    NoDriver { mode: ddlsync_core::Mode },
    ReadFile { path: PathBuf, source: io::Error },
    Core(ddlsync_core::Error),
}

impl From<ddlsync_core::Error> for CliError {
    fn from(value: ddlsync_core::Error) -> Self {
        Self::Core(value)
    }
}

pub(crate) fn render_error(error: CliError) -> String {
    match error {
        CliError::MissingCurrentSchema => format!("[usage] {}", missing_current_schema_message()),
        CliError::NoDriver { mode } => format!(
            "[connection] no {mode} driver is built into this binary; pass the current schema \
             with a second --file argument"
        ),
        CliError::ReadFile { path, source } => {
            let report = report_with_context(
                source,
                format!("while reading schema file `{}`", path.display()),
            );
            format!("[io] {report:?}")
        }
        CliError::Core(source) => {
            let tag = match &source {
                ddlsync_core::Error::Parse(_) => "parse",
                ddlsync_core::Error::Schema(_) => "schema",
                ddlsync_core::Error::Unsupported(_) => "unsupported",
                ddlsync_core::Error::Connection(_) => "connection",
                ddlsync_core::Error::Execution(_) => "execution",
                ddlsync_core::Error::Cancelled => "cancelled",
            };
            let report = report_with_context(source, "while computing the migration");
            format!("[{tag}] {report:?}")
        }
    }
}

pub(crate) fn missing_current_schema_message() -> &'static str {
    "no database is specified; name a database or pass the current schema as a second --file"
}

fn report_with_context(
    source: impl std::error::Error + Send + Sync + 'static,
    context: impl std::fmt::Display + Send + Sync + 'static,
) -> Report {
    let wrapped = anyhow::Result::<()>::Err(anyhow::Error::new(source))
        .context(context)
        .expect_err("constructed from an error");
    Report::msg(format!("{wrapped:#}"))
}
