use serde::{Deserialize, Serialize};

/// A positional parameter supplied alongside an ad-hoc filter expression.
///
/// Parameter count and types must match what the compiled predicate expects;
/// a mismatch is a caller error reported by the index, not a system fault.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum FilterParam {
    String(String),
    Int(i64),
    Bool(bool),
    Bytes(Vec<u8>),
}

impl From<&str> for FilterParam {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for FilterParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for FilterParam {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
