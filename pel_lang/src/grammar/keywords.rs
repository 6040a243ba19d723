//! Keyword definitions for the PEL expression grammar
//!
//! PEL reserves very few words: the aggregate connector `of`, the word forms
//! of the logical operators, and the literal words `true`/`false`/`null`.
//! Aggregate names (`sum`, `avg`, ...) are deliberately NOT keywords - they
//! are plain identifiers claimed by parser plugins at dispatch time, so hosts
//! can register additional grammar on any unreserved word.
//!
//! All word matching is case-insensitive.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved structural words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    /// Aggregate connector: `sum of expr`
    Of,
    /// Word form of `&&`
    And,
    /// Word form of `||`
    Or,
    /// Word form of `!`
    Not,
}

impl Keyword {
    /// Get the keyword as it appears in canonical (lowercase) source
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Of => "of",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
        }
    }

    /// Parse a keyword from a word (case-insensitive)
    pub fn from_str(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "of" => Some(Self::Of),
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "not" => Some(Self::Not),
            _ => None,
        }
    }

    /// Whether this keyword joins two boolean operands
    pub fn is_logical_connector(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// All keywords, in declaration order
    pub fn all() -> &'static [Keyword] {
        &[Self::Of, Self::And, Self::Or, Self::Not]
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of a lexed word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordType {
    /// Reserved structural word
    Keyword,
    /// `true` or `false`
    BoolLiteral,
    /// `null`
    NullLiteral,
    /// Everything else
    Identifier,
}

/// Classify a word without constructing a token
pub fn classify_word_type(word: &str) -> WordType {
    if Keyword::from_str(word).is_some() {
        return WordType::Keyword;
    }
    match word.to_ascii_lowercase().as_str() {
        "true" | "false" => WordType::BoolLiteral,
        "null" => WordType::NullLiteral,
        _ => WordType::Identifier,
    }
}

/// Whether a word is unavailable as a plugin trigger or variable name
pub fn is_reserved_word(word: &str) -> bool {
    classify_word_type(word) != WordType::Identifier
}
