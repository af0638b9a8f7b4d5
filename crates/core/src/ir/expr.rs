use std::fmt;

use super::Ident;

/// Default and check expressions, reduced to the shapes the differ has to
/// compare. Anything richer than this vocabulary is carried verbatim in
/// `Raw` and compares textually after whitespace collapsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Column(Ident),
    FunctionCall { name: String, args: Vec<Expr> },
    CurrentTimestamp { precision: Option<u32> },
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    /// Numeric literals keep their source text so `1.50` survives a
    /// round-trip unchanged.
    Number(String),
    String(String),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Column(ident) => write!(f, "{ident}"),
            Self::FunctionCall { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Self::CurrentTimestamp { precision } => match precision {
                Some(p) => write!(f, "CURRENT_TIMESTAMP({p})"),
                None => f.write_str("CURRENT_TIMESTAMP"),
            },
            Self::Raw(sql) => f.write_str(sql),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(true) => f.write_str("TRUE"),
            Self::Bool(false) => f.write_str("FALSE"),
            Self::Number(text) => f.write_str(text),
            Self::String(text) => write!(f, "'{}'", text.replace('\'', "''")),
        }
    }
}
