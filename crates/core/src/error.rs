use std::{error::Error as StdError, fmt};

use crate::Mode;

type BoxedError = Box<dyn StdError + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

/// Location in one of the two input DDL texts, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub line: usize,
    pub column: Option<usize>,
}

impl SourceSpan {
    pub fn line(line: usize) -> Self {
        Self { line, column: None }
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "{}:{column}", self.line),
            None => write!(f, "{}", self.line),
        }
    }
}

/// Syntax failure in either input. A single parse error halts the run.
#[derive(Debug)]
pub struct ParseError {
    pub span: SourceSpan,
    pub message: String,
    pub source: Option<BoxedError>,
}

impl ParseError {
    pub fn new(span: SourceSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(span: SourceSpan, message: impl Into<String>, source: BoxedError) -> Self {
        Self {
            span,
            message: message.into(),
            source: Some(source),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at line {}: {}", self.span, self.message)
    }
}

impl StdError for ParseError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.source {
            Some(source) => Some(source.as_ref()),
            None => None,
        }
    }
}

/// Structural invariant violation in an assembled schema: duplicate names,
/// orphan indexes or triggers, ambiguous references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub object: String,
    pub message: String,
}

impl SchemaError {
    pub fn new(object: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid schema: {}: {}", self.object, self.message)
    }
}

impl StdError for SchemaError {}

/// The active dialect cannot express a requested change. The differ never
/// silently drops a difference; it raises this instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedOperation {
    pub mode: Mode,
    pub description: String,
}

impl UnsupportedOperation {
    pub fn new(mode: Mode, description: impl Into<String>) -> Self {
        Self {
            mode,
            description: description.into(),
        }
    }
}

impl fmt::Display for UnsupportedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cannot express: {}", self.mode, self.description)
    }
}

impl StdError for UnsupportedOperation {}

/// Raised by `Database` implementations on connect or query failure.
#[derive(Debug)]
pub struct ConnectionError {
    pub message: String,
    pub cause: Option<BoxedError>,
}

impl ConnectionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(message: impl Into<String>, cause: BoxedError) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause),
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "database connection failed: {}", self.message)
    }
}

impl StdError for ConnectionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A statement in the plan failed. Earlier statements stay applied; the
/// failing statement is reported verbatim.
#[derive(Debug)]
pub struct ExecutionError {
    pub statement: String,
    /// Statements successfully executed before the failure.
    pub executed: usize,
    pub cause: BoxedError,
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "executing `{}` failed after {} earlier statements",
            self.statement, self.executed
        )
    }
}

impl StdError for ExecutionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.cause.as_ref())
    }
}

#[derive(Debug)]
pub enum Error {
    Parse(ParseError),
    Schema(SchemaError),
    Unsupported(UnsupportedOperation),
    Connection(ConnectionError),
    Execution(ExecutionError),
    Cancelled,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::Schema(e) => write!(f, "{e}"),
            Self::Unsupported(e) => write!(f, "{e}"),
            Self::Connection(e) => write!(f, "{e}"),
            Self::Execution(e) => write!(f, "{e}"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Schema(e) => Some(e),
            Self::Unsupported(e) => Some(e),
            Self::Connection(e) => Some(e),
            Self::Execution(e) => Some(e),
            Self::Cancelled => None,
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<SchemaError> for Error {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

impl From<UnsupportedOperation> for Error {
    fn from(e: UnsupportedOperation) -> Self {
        Self::Unsupported(e)
    }
}

impl From<ConnectionError> for Error {
    fn from(e: ConnectionError) -> Self {
        Self::Connection(e)
    }
}

impl From<ExecutionError> for Error {
    fn from(e: ExecutionError) -> Self {
        Self::Execution(e)
    }
}
