//! Shared utilities for the PEL core

pub mod span;

pub use span::{Position, SourceMap, Span, Spanned};
