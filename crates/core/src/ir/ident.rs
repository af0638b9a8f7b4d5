use std::fmt;

/// A SQL identifier as written in the source DDL.
///
/// `quoted` records whether the identifier was delimited (`"x"`, `` `x` ``,
/// `[x]`); quoting affects both comparison folding and rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub value: String,
    pub quoted: bool,
}

impl Ident {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: false,
        }
    }

    pub fn quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: true,
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "\"{}\"", self.value)
        } else {
            f.write_str(&self.value)
        }
    }
}

/// A `(schema, object)` pair. The schema component is absent when the source
/// DDL did not qualify the name; `Mode::rules().default_schema` supplies the
/// implicit schema during comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub schema: Option<Ident>,
    pub name: Ident,
}

impl QualifiedName {
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: Ident::new(name),
        }
    }

    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(Ident::new(schema)),
            name: Ident::new(name),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{schema}.")?;
        }
        write!(f, "{}", self.name)
    }
}

/// Comparison key for a single identifier.
///
/// Unquoted identifiers fold to ASCII lowercase; quoted identifiers compare
/// exactly. This treats every dialect as case-insensitive by default (MySQL's
/// `lower_case_table_names` variability is intentionally not modeled).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct IdentKey(String);

impl IdentKey {
    pub fn folded(value: &str) -> Self {
        Self(value.to_ascii_lowercase())
    }
}

impl From<&Ident> for IdentKey {
    fn from(ident: &Ident) -> Self {
        if ident.quoted {
            Self(ident.value.clone())
        } else {
            Self(ident.value.to_ascii_lowercase())
        }
    }
}

/// Comparison key for a qualified name, with the mode's default schema
/// substituted for an absent one so `users` and `public.users` collide.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NameKey {
    pub schema: Option<IdentKey>,
    pub name: IdentKey,
}

impl NameKey {
    pub fn of(name: &QualifiedName, default_schema: Option<&str>) -> Self {
        let schema = name
            .schema
            .as_ref()
            .map(IdentKey::from)
            .or_else(|| default_schema.map(IdentKey::folded));
        Self {
            schema,
            name: IdentKey::from(&name.name),
        }
    }
}
