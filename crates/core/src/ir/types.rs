use std::fmt;

/// Length argument of character and binary types. `Max` covers T-SQL
/// `varchar(max)` / `varbinary(max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Fixed(u32),
    Max,
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Max => f.write_str("max"),
        }
    }
}

/// Dialect-canonical data type.
///
/// Construction goes through the per-mode parser, which already strips
/// display widths and spelled-out aliases (`int(11)` parses to `Int`,
/// `character varying` to `Varchar`), so derived equality on this enum is the
/// type-equality the differ needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Bool,
    TinyInt { unsigned: bool },
    SmallInt { unsigned: bool },
    MediumInt { unsigned: bool },
    Int { unsigned: bool },
    BigInt { unsigned: bool },
    Decimal { precision: Option<u32>, scale: Option<u32> },
    Float,
    Double,
    Real,
    Char { length: Option<u32> },
    Varchar { length: Option<Length> },
    NChar { length: Option<u32> },
    NVarchar { length: Option<Length> },
    Text,
    Binary { length: Option<u32> },
    Varbinary { length: Option<Length> },
    Blob,
    Bytea,
    Date,
    Time { precision: Option<u32>, with_timezone: bool },
    DateTime { precision: Option<u32> },
    Timestamp { precision: Option<u32>, with_timezone: bool },
    Json,
    Jsonb,
    Uuid,
    Enum(Vec<String>),
    Array(Box<DataType>),
    /// Anything outside the shared vocabulary, normalized to lowercase.
    /// Covers user-defined types (PG enums referenced by name, domains) and
    /// vendor types this engine does not special-case.
    Custom(String),
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn unsigned_suffix(unsigned: bool) -> &'static str {
            if unsigned { " unsigned" } else { "" }
        }

        match self {
            Self::Bool => f.write_str("boolean"),
            Self::TinyInt { unsigned } => write!(f, "tinyint{}", unsigned_suffix(*unsigned)),
            Self::SmallInt { unsigned } => write!(f, "smallint{}", unsigned_suffix(*unsigned)),
            Self::MediumInt { unsigned } => write!(f, "mediumint{}", unsigned_suffix(*unsigned)),
            Self::Int { unsigned } => write!(f, "int{}", unsigned_suffix(*unsigned)),
            Self::BigInt { unsigned } => write!(f, "bigint{}", unsigned_suffix(*unsigned)),
            Self::Decimal { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => write!(f, "numeric({p},{s})"),
                (Some(p), None) => write!(f, "numeric({p})"),
                _ => f.write_str("numeric"),
            },
            Self::Float => f.write_str("float"),
            Self::Double => f.write_str("double precision"),
            Self::Real => f.write_str("real"),
            Self::Char { length } => match length {
                Some(n) => write!(f, "char({n})"),
                None => f.write_str("char"),
            },
            Self::Varchar { length } => match length {
                Some(n) => write!(f, "varchar({n})"),
                None => f.write_str("varchar"),
            },
            Self::NChar { length } => match length {
                Some(n) => write!(f, "nchar({n})"),
                None => f.write_str("nchar"),
            },
            Self::NVarchar { length } => match length {
                Some(n) => write!(f, "nvarchar({n})"),
                None => f.write_str("nvarchar"),
            },
            Self::Text => f.write_str("text"),
            Self::Binary { length } => match length {
                Some(n) => write!(f, "binary({n})"),
                None => f.write_str("binary"),
            },
            Self::Varbinary { length } => match length {
                Some(n) => write!(f, "varbinary({n})"),
                None => f.write_str("varbinary"),
            },
            Self::Blob => f.write_str("blob"),
            Self::Bytea => f.write_str("bytea"),
            Self::Date => f.write_str("date"),
            Self::Time {
                precision,
                with_timezone,
            } => {
                f.write_str("time")?;
                if let Some(p) = precision {
                    write!(f, "({p})")?;
                }
                if *with_timezone {
                    f.write_str(" with time zone")?;
                }
                Ok(())
            }
            Self::DateTime { precision } => match precision {
                Some(p) => write!(f, "datetime({p})"),
                None => f.write_str("datetime"),
            },
            Self::Timestamp {
                precision,
                with_timezone,
            } => {
                f.write_str("timestamp")?;
                if let Some(p) = precision {
                    write!(f, "({p})")?;
                }
                if *with_timezone {
                    f.write_str(" with time zone")?;
                }
                Ok(())
            }
            Self::Json => f.write_str("json"),
            Self::Jsonb => f.write_str("jsonb"),
            Self::Uuid => f.write_str("uuid"),
            Self::Enum(values) => {
                f.write_str("enum(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "'{}'", value.replace('\'', "''"))?;
                }
                f.write_str(")")
            }
            Self::Array(inner) => write!(f, "{inner}[]"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

impl DataType {
    /// Whether a column of type `self` can hold every value a column of type
    /// `from` holds. Used by skip-drop to classify narrowing `ChangeColumn`
    /// operations as destructive.
    pub fn can_hold(&self, from: &DataType) -> bool {
        if self == from {
            return true;
        }

        match (from, self) {
            (a, b) if int_rank(a).is_some() && int_rank(b).is_some() => {
                int_rank(b) >= int_rank(a)
            }
            (DataType::Varchar { length: from_len }, DataType::Varchar { length: to_len })
            | (DataType::NVarchar { length: from_len }, DataType::NVarchar { length: to_len })
            | (DataType::Varbinary { length: from_len }, DataType::Varbinary { length: to_len }) => {
                length_covers(*to_len, *from_len)
            }
            (DataType::Char { length: from_len }, DataType::Char { length: to_len })
            | (DataType::NChar { length: from_len }, DataType::NChar { length: to_len })
            | (DataType::Binary { length: from_len }, DataType::Binary { length: to_len }) => {
                fixed_covers(*to_len, *from_len)
            }
            (DataType::Varchar { .. } | DataType::Char { .. }, DataType::Text) => true,
            (
                DataType::Decimal {
                    precision: Some(fp),
                    scale: fs,
                },
                DataType::Decimal {
                    precision: Some(tp),
                    scale: ts,
                },
            ) => tp >= fp && (*ts).unwrap_or(0) >= (*fs).unwrap_or(0),
            _ => false,
        }
    }
}

fn int_rank(data_type: &DataType) -> Option<u8> {
    match data_type {
        DataType::TinyInt { .. } => Some(0),
        DataType::SmallInt { .. } => Some(1),
        DataType::MediumInt { .. } => Some(2),
        DataType::Int { .. } => Some(3),
        DataType::BigInt { .. } => Some(4),
        _ => None,
    }
}

fn length_covers(to: Option<Length>, from: Option<Length>) -> bool {
    match (to, from) {
        (Some(Length::Max), _) | (None, None) => true,
        (Some(Length::Fixed(to)), Some(Length::Fixed(from))) => to >= from,
        (Some(Length::Fixed(_)), Some(Length::Max) | None) => false,
        (None, _) => false,
    }
}

fn fixed_covers(to: Option<u32>, from: Option<u32>) -> bool {
    match (to, from) {
        (None, None) => true,
        (Some(to), Some(from)) => to >= from,
        _ => false,
    }
}
