//! Cursor-addressable token stream for parsing
//!
//! The stream owns every token the lexer produced (whitespace and comments
//! included) but exposes a cursor over the significant subsequence only.
//! All parsing code - core and plugins - consumes tokens through this one
//! cursor: lookahead via `peek`, commitment via `advance`/`expect`. The
//! position moves forward only; the single in-place mutation is
//! `replace_current`, which token-alias plugins use to substitute a
//! canonical keyword without disturbing the cursor.

use crate::tokens::token::{SpannedToken, Token};
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type StreamResult<T> = Result<T, TokenStreamError>;

/// Errors raised by stream navigation and expectation
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum TokenStreamError {
    #[error("Unexpected token: expected {expected}, found '{found}' at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEndOfStream { expected: String },

    #[error("Empty token stream - no tokens to parse")]
    EmptyStream,

    #[error("Token stream does not terminate with EOF")]
    MissingEof,

    #[error("Cannot advance {requested} tokens: only {available} remain")]
    AdvancePastEnd { requested: usize, available: usize },
}

impl TokenStreamError {
    /// Create unexpected token error
    pub fn unexpected_token(expected: &str, found: &SpannedToken) -> Self {
        Self::UnexpectedToken {
            expected: expected.to_string(),
            found: found.token.as_source_string(),
            span: found.span,
        }
    }

    /// Create unexpected end of stream error
    pub fn unexpected_end(expected: &str) -> Self {
        Self::UnexpectedEndOfStream {
            expected: expected.to_string(),
        }
    }

    /// Get span if available
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedToken { span, .. } => Some(*span),
            _ => None,
        }
    }
}

/// The ordered token sequence with a forward-only significant cursor
#[derive(Debug, Clone)]
pub struct TokenStream {
    /// Every token from the lexer, in source order
    all_tokens: Vec<SpannedToken>,
    /// Indices into `all_tokens` of the significant tokens
    significant_indices: Vec<usize>,
    /// Cursor over `significant_indices`; never exceeds the EOF position
    position: usize,
}

impl TokenStream {
    /// Build a stream, validating shape; prefer [`TokenStreamBuilder`]
    pub fn new(tokens: Vec<SpannedToken>) -> StreamResult<Self> {
        TokenStreamBuilder::new().tokens(tokens).build()
    }

    /// The significant token under the cursor
    pub fn current(&self) -> &SpannedToken {
        let idx = self.significant_indices[self.position];
        &self.all_tokens[idx]
    }

    /// Span of the token under the cursor
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// The significant token `offset` positions ahead (0 = current);
    /// `None` past the terminating EOF
    pub fn peek(&self, offset: usize) -> Option<&SpannedToken> {
        let target = self.position.checked_add(offset)?;
        let idx = self.significant_indices.get(target)?;
        Some(&self.all_tokens[*idx])
    }

    /// Consume and return the current token; fails on EOF
    pub fn advance(&mut self) -> StreamResult<SpannedToken> {
        if self.is_at_end() {
            return Err(TokenStreamError::unexpected_end("any token"));
        }
        let consumed = self.current().clone();
        self.position += 1;
        Ok(consumed)
    }

    /// Consume `n` tokens; fails without moving if fewer than `n` remain
    pub fn advance_n(&mut self, n: usize) -> StreamResult<()> {
        let available = self.remaining();
        if n > available {
            return Err(TokenStreamError::AdvancePastEnd {
                requested: n,
                available,
            });
        }
        self.position += n;
        Ok(())
    }

    /// Consume the current token if it equals `expected`, else fail with
    /// expected/found/position populated and the cursor unmoved
    pub fn expect(&mut self, expected: &Token) -> StreamResult<SpannedToken> {
        let current = self.current();
        if &current.token == expected {
            self.advance()
        } else if current.token == Token::Eof {
            Err(TokenStreamError::unexpected_end(
                &expected.as_source_string(),
            ))
        } else {
            Err(TokenStreamError::unexpected_token(
                &format!("'{}'", expected.as_source_string()),
                current,
            ))
        }
    }

    /// Consume the current token if it is an identifier, returning its text
    pub fn expect_identifier(&mut self) -> StreamResult<(String, Span)> {
        let current = self.current();
        match &current.token {
            Token::Identifier(name) => {
                let name = name.clone();
                let span = current.span;
                self.advance()?;
                Ok((name, span))
            }
            Token::Eof => Err(TokenStreamError::unexpected_end("identifier")),
            _ => Err(TokenStreamError::unexpected_token("identifier", current)),
        }
    }

    /// Replace the token under the cursor, keeping its span
    ///
    /// This is the alias-substitution hook: the cursor does not move, so the
    /// substituted token is re-dispatched as if it had been written in the
    /// source. Replacing the EOF terminator is rejected.
    pub fn replace_current(&mut self, token: Token) -> StreamResult<()> {
        if self.is_at_end() {
            return Err(TokenStreamError::unexpected_end("replaceable token"));
        }
        let idx = self.significant_indices[self.position];
        let span = self.all_tokens[idx].span;
        self.all_tokens[idx] = SpannedToken::new(token, span);
        Ok(())
    }

    /// Whether the cursor sits on the terminating EOF
    pub fn is_at_end(&self) -> bool {
        self.current().token == Token::Eof
    }

    /// Significant tokens remaining before the terminating EOF
    pub fn remaining(&self) -> usize {
        self.significant_indices.len() - 1 - self.position
    }

    /// Count of significant tokens (EOF included)
    pub fn significant_len(&self) -> usize {
        self.significant_indices.len()
    }

    /// Count of all tokens, whitespace and comments included
    pub fn total_len(&self) -> usize {
        self.all_tokens.len()
    }
}

/// Validating constructor for [`TokenStream`]
#[derive(Debug, Default)]
pub struct TokenStreamBuilder {
    tokens: Vec<SpannedToken>,
}

impl TokenStreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(mut self, tokens: Vec<SpannedToken>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Validate and build: the input must be non-empty and its final
    /// significant token must be EOF
    pub fn build(self) -> StreamResult<TokenStream> {
        if self.tokens.is_empty() {
            return Err(TokenStreamError::EmptyStream);
        }

        let significant_indices: Vec<usize> = self
            .tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.token.is_significant())
            .map(|(i, _)| i)
            .collect();

        let terminated = significant_indices
            .last()
            .map(|&i| self.tokens[i].token == Token::Eof)
            .unwrap_or(false);
        if !terminated {
            return Err(TokenStreamError::MissingEof);
        }

        Ok(TokenStream {
            all_tokens: self.tokens,
            significant_indices,
            position: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    fn spanned(token: Token, offset: usize) -> SpannedToken {
        let start = Position::new(offset, 1, offset as u32 + 1);
        let end = Position::new(offset + 1, 1, offset as u32 + 2);
        SpannedToken::new(token, Span::new(start, end))
    }

    fn stream_of(tokens: Vec<Token>) -> TokenStream {
        let spanned_tokens: Vec<SpannedToken> = tokens
            .into_iter()
            .enumerate()
            .map(|(i, t)| spanned(t, i))
            .collect();
        TokenStream::new(spanned_tokens).unwrap()
    }

    #[test]
    fn test_empty_input_rejected() {
        let result = TokenStream::new(vec![]);
        assert_eq!(result.unwrap_err(), TokenStreamError::EmptyStream);
    }

    #[test]
    fn test_missing_eof_rejected() {
        let result = TokenStream::new(vec![spanned(Token::Number(1.0), 0)]);
        assert_eq!(result.unwrap_err(), TokenStreamError::MissingEof);
    }

    #[test]
    fn test_whitespace_is_skipped_by_cursor() {
        let stream = stream_of(vec![
            Token::Number(1.0),
            Token::Space,
            Token::Plus,
            Token::Space,
            Token::Number(2.0),
            Token::Eof,
        ]);

        assert_eq!(stream.current().token, Token::Number(1.0));
        assert_eq!(stream.peek(1).unwrap().token, Token::Plus);
        assert_eq!(stream.peek(2).unwrap().token, Token::Number(2.0));
        assert_eq!(stream.peek(3).unwrap().token, Token::Eof);
        assert!(stream.peek(4).is_none());
        assert_eq!(stream.significant_len(), 4);
        assert_eq!(stream.total_len(), 6);
    }

    #[test]
    fn test_advance_consumes_in_order() {
        let mut stream = stream_of(vec![Token::Number(1.0), Token::Plus, Token::Eof]);

        assert_eq!(stream.advance().unwrap().token, Token::Number(1.0));
        assert_eq!(stream.advance().unwrap().token, Token::Plus);
        assert!(stream.is_at_end());
        assert_matches::assert_matches!(
            stream.advance(),
            Err(TokenStreamError::UnexpectedEndOfStream { .. })
        );
    }

    #[test]
    fn test_advance_n_rejects_overrun_without_moving() {
        let mut stream = stream_of(vec![Token::Number(1.0), Token::Plus, Token::Eof]);

        let err = stream.advance_n(3).unwrap_err();
        assert_eq!(
            err,
            TokenStreamError::AdvancePastEnd {
                requested: 3,
                available: 2
            }
        );
        // Failed advance must not move the cursor
        assert_eq!(stream.current().token, Token::Number(1.0));

        stream.advance_n(2).unwrap();
        assert!(stream.is_at_end());
    }

    #[test]
    fn test_expect_match_consumes() {
        let mut stream = stream_of(vec![Token::LeftParen, Token::RightParen, Token::Eof]);

        let consumed = stream.expect(&Token::LeftParen).unwrap();
        assert_eq!(consumed.token, Token::LeftParen);
        assert_eq!(stream.current().token, Token::RightParen);
    }

    #[test]
    fn test_expect_mismatch_populates_both_sides_and_keeps_cursor() {
        let mut stream = stream_of(vec![Token::Comma, Token::Eof]);

        let err = stream.expect(&Token::RightParen).unwrap_err();
        match err {
            TokenStreamError::UnexpectedToken {
                expected, found, ..
            } => {
                assert!(expected.contains(')'));
                assert_eq!(found, ",");
            }
            other => panic!("expected UnexpectedToken, got {:?}", other),
        }
        // Mismatch never partially consumes
        assert_eq!(stream.current().token, Token::Comma);
    }

    #[test]
    fn test_expect_at_eof_reports_end_of_stream() {
        let mut stream = stream_of(vec![Token::Eof]);
        assert_matches::assert_matches!(
            stream.expect(&Token::RightParen),
            Err(TokenStreamError::UnexpectedEndOfStream { .. })
        );
    }

    #[test]
    fn test_expect_identifier() {
        let mut stream = stream_of(vec![
            Token::Identifier("servers".to_string()),
            Token::Eof,
        ]);

        let (name, _) = stream.expect_identifier().unwrap();
        assert_eq!(name, "servers");
        assert!(stream.is_at_end());
    }

    #[test]
    fn test_replace_current_keeps_span_and_cursor() {
        let mut stream = stream_of(vec![
            Token::Identifier("total".to_string()),
            Token::Keyword(crate::grammar::keywords::Keyword::Of),
            Token::Eof,
        ]);
        let original_span = stream.current_span();

        stream
            .replace_current(Token::Identifier("sum".to_string()))
            .unwrap();

        assert_eq!(
            stream.current().token,
            Token::Identifier("sum".to_string())
        );
        assert_eq!(stream.current_span(), original_span);
        // Next token untouched
        assert_eq!(
            stream.peek(1).unwrap().token,
            Token::Keyword(crate::grammar::keywords::Keyword::Of)
        );
    }

    #[test]
    fn test_replace_at_eof_rejected() {
        let mut stream = stream_of(vec![Token::Eof]);
        assert!(stream.replace_current(Token::Null).is_err());
    }
}
