//! Syntactic analysis
//!
//! Turns a token stream into an expression tree. The grammar core is a
//! fixed precedence ladder; everything at primary position beyond
//! literals, names, grouping, and collection literals arrives through
//! the plugin registry.

pub mod error;
pub mod parser;

pub use error::{ParseError, ParseResult};
pub use parser::{parse, Parser};
