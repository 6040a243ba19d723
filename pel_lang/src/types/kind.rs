//! Type kind constants
//!
//! Declaration order is load-bearing: `is_primitive` and `is_built_in` are
//! range checks over the derived ordering, and conversion rows are arrays
//! indexed by discriminant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The nine value kinds the language knows about
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Null,
    Bool,
    Date,
    Number,
    String,
    Time,
    Array,
    Map,
    Any,
}

impl TypeKind {
    /// Canonical lowercase name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::Number => "number",
            Self::String => "string",
            Self::Time => "time",
            Self::Array => "array",
            Self::Map => "map",
            Self::Any => "any",
        }
    }

    /// Parse from a case-insensitive name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "null" => Some(Self::Null),
            "bool" | "boolean" => Some(Self::Bool),
            "date" => Some(Self::Date),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            "time" => Some(Self::Time),
            "array" => Some(Self::Array),
            "map" => Some(Self::Map),
            "any" => Some(Self::Any),
            _ => None,
        }
    }

    /// Scalar kinds: the `Bool..=Time` range plus `Null`
    pub fn is_primitive(&self) -> bool {
        (Self::Bool..=Self::Time).contains(self) || *self == Self::Null
    }

    /// Kinds with a concrete value shape: the `Bool..=Map` range plus `Null`
    pub fn is_built_in(&self) -> bool {
        (Self::Bool..=Self::Map).contains(self) || *self == Self::Null
    }

    /// Every kind, in declaration order
    pub const fn all() -> [TypeKind; 9] {
        [
            Self::Null,
            Self::Bool,
            Self::Date,
            Self::Number,
            Self::String,
            Self::Time,
            Self::Array,
            Self::Map,
            Self::Any,
        ]
    }

    /// Discriminant used to index conversion rows
    pub(crate) const fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
