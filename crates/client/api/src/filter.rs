//! Interface to the external filter compiler.

/// A compiled filter predicate.
///
/// Opaque to this crate: produced by the [FilterCompiler], handed to the
/// index verbatim together with its positional parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predicate(String);

impl Predicate {
    /// Wraps an already-normalized expression. Only filter compiler
    /// implementations should call this.
    pub fn from_normalized(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated field name, usable as a sort or grouping key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field(String);

impl Field {
    /// Wraps an already-validated field name. Only filter compiler
    /// implementations should call this.
    pub fn from_validated(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("parsing filter: {0}")]
    Parse(String),
    #[error("invalid field name `{0}`")]
    BadField(String),
}

/// Compiles ad-hoc filter expressions and validates field names.
///
/// The grammar and the compilation strategy are external to this crate.
pub trait FilterCompiler: Send + Sync {
    fn compile(&self, filter: &str) -> Result<Predicate, FilterError>;
    fn parse_field(&self, name: &str) -> Result<Field, FilterError>;
}
