//! Token definitions and the cursor-addressable token stream

pub mod token;
pub mod token_stream;

pub use token::{classify_word, SpannedToken, Token, TokenClass};
pub use token_stream::{TokenStream, TokenStreamBuilder, TokenStreamError};
