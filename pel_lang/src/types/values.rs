//! Runtime values
//!
//! `LValue` is the single tagged representation every evaluation produces
//! and consumes. `Null` is a variant, not a missing value: it flows through
//! conversions and aggregates like any other value and reports its own kind.

use crate::tokens::token::format_number;
use crate::types::kind::TypeKind;
use crate::types::lang_type::{descriptor, LangType};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A value produced by evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LValue {
    Null,
    Bool(bool),
    Date(NaiveDate),
    Number(f64),
    Str(String),
    Time(NaiveTime),
    Array(Vec<LValue>),
    Map(BTreeMap<String, LValue>),
}

impl LValue {
    /// The kind tag of this value (never `Any`; that kind has no value shape)
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Null => TypeKind::Null,
            Self::Bool(_) => TypeKind::Bool,
            Self::Date(_) => TypeKind::Date,
            Self::Number(_) => TypeKind::Number,
            Self::Str(_) => TypeKind::String,
            Self::Time(_) => TypeKind::Time,
            Self::Array(_) => TypeKind::Array,
            Self::Map(_) => TypeKind::Map,
        }
    }

    /// The built-in type descriptor for this value's kind
    pub fn lang_type(&self) -> &'static LangType {
        descriptor(self.kind())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[LValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, LValue>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Map a JSON document onto a value; JSON strings stay strings
    /// (date/time interpretation happens through explicit conversion)
    pub fn from_json(value: &serde_json::Value) -> LValue {
        match value {
            serde_json::Value::Null => LValue::Null,
            serde_json::Value::Bool(b) => LValue::Bool(*b),
            serde_json::Value::Number(n) => LValue::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => LValue::Str(s.clone()),
            serde_json::Value::Array(items) => {
                LValue::Array(items.iter().map(LValue::from_json).collect())
            }
            serde_json::Value::Object(entries) => LValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), LValue::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render as plain JSON; dates and times become their display strings
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Str(s) => serde_json::Value::String(s.clone()),
            Self::Date(_) | Self::Time(_) => serde_json::Value::String(self.to_string()),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(LValue::to_json).collect())
            }
            Self::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for LValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Str(s) => f.write_str(s),
            Self::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<f64> for LValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for LValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for LValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for LValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<LValue>> for LValue {
    fn from(items: Vec<LValue>) -> Self {
        Self::Array(items)
    }
}
