//! Grammar definitions: keywords and the expression AST

pub mod ast;
pub mod keywords;

pub use keywords::{classify_word_type, Keyword, WordType};
