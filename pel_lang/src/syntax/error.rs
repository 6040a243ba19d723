//! Syntax analysis error types
//!
//! Grammar-level failures raised while turning a token stream into an
//! expression tree. Any parse error is fatal to the current parse; there is
//! no partial-AST recovery.

use crate::config::compile_time::syntax::*;
use crate::tokens::{SpannedToken, TokenStreamError};
use crate::utils::Span;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised during parsing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Unexpected token: expected {expected}, found '{found}' at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEndOfInput { expected: String },

    #[error("Expression nesting too deep: {depth} levels (max {MAX_PARSE_DEPTH})")]
    MaxParseDepth { depth: usize, span: Span },

    #[error("Too many collection elements: {count} (max {MAX_COLLECTION_ELEMENTS})")]
    TooManyElements { count: usize, span: Span },

    #[error("Input continues after the expression: found '{found}' at {span}")]
    TrailingInput { found: String, span: Span },

    #[error("Unknown aggregate keyword '{keyword}' at {span}")]
    UnknownAggregate { keyword: String, span: Span },

    #[error(transparent)]
    Stream(#[from] TokenStreamError),
}

impl ParseError {
    /// Create unexpected token error from the offending token
    pub fn unexpected_token(expected: &str, found: &SpannedToken) -> Self {
        Self::UnexpectedToken {
            expected: expected.to_string(),
            found: found.token.as_source_string(),
            span: found.span,
        }
    }

    /// Create unexpected end of input error
    pub fn unexpected_end(expected: &str) -> Self {
        Self::UnexpectedEndOfInput {
            expected: expected.to_string(),
        }
    }

    /// Get span if available
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::MaxParseDepth { span, .. }
            | Self::TooManyElements { span, .. }
            | Self::TrailingInput { span, .. }
            | Self::UnknownAggregate { span, .. } => Some(*span),
            Self::UnexpectedEndOfInput { .. } => None,
            Self::Stream(inner) => inner.span(),
        }
    }
}
