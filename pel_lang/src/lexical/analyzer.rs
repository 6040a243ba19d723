//! Core lexical analyzer implementation
//!
//! Systematic single-pass tokenization over the raw source text. Every
//! character lands in exactly one token (whitespace and comments included)
//! so downstream spans always reconstruct the original text. Security
//! limits are compile-time constants baked in by build.rs.

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::tokens::token::classify_operator_symbol;
use crate::tokens::{classify_word, SpannedToken, Token, TokenStream, TokenStreamError};
use crate::utils::{Position, Span};
use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

/// Lexical analysis errors with compile-time security boundaries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexerError {
    #[error("Invalid character '{character}' at {span}")]
    InvalidCharacter { character: char, span: Span },

    #[error("Unterminated string literal starting at {span}")]
    UnterminatedString { span: Span },

    #[error("Invalid escape sequence '\\{character}' at {span}")]
    InvalidEscape { character: char, span: Span },

    #[error("Invalid number format '{text}' at {span}")]
    InvalidNumber { text: String, span: Span },

    #[error("Source too large: {size} bytes (max {MAX_SOURCE_SIZE})")]
    SourceTooLarge { size: usize },

    #[error("Identifier too long: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { length: usize, span: Span },

    #[error("String literal too large: {size} bytes (max {MAX_STRING_SIZE})")]
    StringTooLarge { size: usize, span: Span },

    #[error("Numeric literal too long: {length} characters (max {MAX_NUMBER_LENGTH})")]
    NumberTooLong { length: usize, span: Span },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },

    #[error(transparent)]
    Stream(#[from] TokenStreamError),
}

impl LexerError {
    /// Get span if available
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::InvalidCharacter { span, .. }
            | Self::UnterminatedString { span }
            | Self::InvalidEscape { span, .. }
            | Self::InvalidNumber { span, .. }
            | Self::IdentifierTooLong { span, .. }
            | Self::StringTooLarge { span, .. }
            | Self::NumberTooLong { span, .. } => Some(*span),
            Self::SourceTooLarge { .. } | Self::TooManyTokens { .. } => None,
            Self::Stream(inner) => inner.span(),
        }
    }
}

/// Core lexical analyzer with compile-time security boundaries
pub struct LexicalAnalyzer {
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self {
            preferences: LexicalPreferences::default(),
        }
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self { preferences }
    }

    /// Get current preferences
    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    /// Tokenize source text into a validated token stream
    pub fn tokenize(&self, source: &str) -> Result<TokenStream, LexerError> {
        // SECURITY: bound input size before walking it
        if source.len() > MAX_SOURCE_SIZE {
            return Err(LexerError::SourceTooLarge { size: source.len() });
        }

        let mut tokens: Vec<SpannedToken> = Vec::new();
        let mut chars = source.char_indices().peekable();
        let mut pos = Position::start();

        while let Some((_, ch)) = chars.next() {
            // SECURITY: check token count limit to prevent token explosion
            if tokens.len() >= MAX_TOKEN_COUNT {
                return Err(LexerError::TooManyTokens {
                    count: tokens.len(),
                });
            }

            match ch {
                // Whitespace
                ' ' => emit(&mut tokens, &mut pos, Token::Space, " "),
                '\t' => emit(&mut tokens, &mut pos, Token::Tab, "\t"),
                '\n' => emit(&mut tokens, &mut pos, Token::Newline, "\n"),
                '\r' => {
                    if chars.peek().map(|&(_, c)| c) == Some('\n') {
                        chars.next();
                        emit(&mut tokens, &mut pos, Token::Newline, "\r\n");
                    } else {
                        // Bare carriage return counts as a line break
                        let start = pos;
                        pos = Position::new(pos.offset + 1, pos.line + 1, 1);
                        tokens.push(SpannedToken::new(Token::Newline, Span::new(start, pos)));
                    }
                }

                // Grouping and punctuation
                '(' => emit(&mut tokens, &mut pos, Token::LeftParen, "("),
                ')' => emit(&mut tokens, &mut pos, Token::RightParen, ")"),
                '[' => emit(&mut tokens, &mut pos, Token::LeftBracket, "["),
                ']' => emit(&mut tokens, &mut pos, Token::RightBracket, "]"),
                '{' => emit(&mut tokens, &mut pos, Token::LeftBrace, "{"),
                '}' => emit(&mut tokens, &mut pos, Token::RightBrace, "}"),
                ',' => emit(&mut tokens, &mut pos, Token::Comma, ","),
                ':' => emit(&mut tokens, &mut pos, Token::Colon, ":"),

                // Comments and division
                '/' => {
                    if chars.peek().map(|&(_, c)| c) == Some('/') {
                        let (token, lexeme) = scan_comment(&mut chars);
                        if self.preferences.retain_comment_tokens {
                            emit(&mut tokens, &mut pos, token, &lexeme);
                        } else {
                            // Position advances even when the token is dropped
                            pos.advance_str(&lexeme);
                        }
                    } else {
                        emit(&mut tokens, &mut pos, Token::Slash, "/");
                    }
                }

                // String literals
                '\'' | '"' => {
                    let start = pos;
                    let (token, end) = scan_string(ch, &mut chars, start)?;
                    pos = end;
                    tokens.push(SpannedToken::new(token, Span::new(start, pos)));
                }

                // Numbers (a leading '-' lexes as an operator, not a sign)
                '0'..='9' => {
                    let (token, lexeme) = scan_number(ch, &mut chars, pos)?;
                    emit(&mut tokens, &mut pos, token, &lexeme);
                }

                // Identifiers, keywords, and literal words
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let (token, lexeme) = scan_word(c, &mut chars, pos)?;
                    emit(&mut tokens, &mut pos, token, &lexeme);
                }

                // Symbol operators
                '+' | '-' | '*' | '%' | '=' | '!' | '<' | '>' | '&' | '|' => {
                    let (token, lexeme) = scan_operator(ch, &mut chars, pos)?;
                    emit(&mut tokens, &mut pos, token, &lexeme);
                }

                other => {
                    return Err(LexerError::InvalidCharacter {
                        character: other,
                        span: Span::point(pos),
                    });
                }
            }
        }

        tokens.push(SpannedToken::new(Token::Eof, Span::point(pos)));
        Ok(TokenStream::new(tokens)?)
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Scanning helpers
// ============================================================================

/// Push `token` spanning `lexeme` starting at `pos`, then move `pos` past it
fn emit(tokens: &mut Vec<SpannedToken>, pos: &mut Position, token: Token, lexeme: &str) {
    let start = *pos;
    pos.advance_str(lexeme);
    tokens.push(SpannedToken::new(token, Span::new(start, *pos)));
}

/// Scan a `//` line comment; the first '/' is already consumed
fn scan_comment(chars: &mut Peekable<CharIndices<'_>>) -> (Token, String) {
    chars.next(); // second '/'
    let mut content = String::new();

    while let Some(&(_, ch)) = chars.peek() {
        if ch == '\n' || ch == '\r' {
            break;
        }
        content.push(ch);
        chars.next();
    }

    let lexeme = format!("//{content}");
    (Token::Comment(content), lexeme)
}

/// Scan a quoted string; the opening quote is already consumed
fn scan_string(
    quote: char,
    chars: &mut Peekable<CharIndices<'_>>,
    start: Position,
) -> Result<(Token, Position), LexerError> {
    let mut cur = start;
    cur.advance(quote);
    let mut content = String::new();

    loop {
        match chars.next() {
            None => {
                return Err(LexerError::UnterminatedString {
                    span: Span::point(start),
                });
            }
            Some((_, c)) if c == quote => {
                cur.advance(c);
                return Ok((Token::Str(content), cur));
            }
            Some((_, '\n')) => {
                // Strings are single-line; escapes carry line breaks
                return Err(LexerError::UnterminatedString {
                    span: Span::new(start, cur),
                });
            }
            Some((_, '\\')) => {
                let escape_start = cur;
                cur.advance('\\');
                let Some((_, escaped)) = chars.next() else {
                    return Err(LexerError::UnterminatedString {
                        span: Span::point(start),
                    });
                };
                cur.advance(escaped);
                let resolved = match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '\\' => '\\',
                    '\'' => '\'',
                    '"' => '"',
                    other => {
                        return Err(LexerError::InvalidEscape {
                            character: other,
                            span: Span::new(escape_start, cur),
                        });
                    }
                };
                content.push(resolved);
            }
            Some((_, c)) => {
                cur.advance(c);
                content.push(c);

                // SECURITY: fail fast instead of accumulating an oversized literal
                if content.len() > MAX_STRING_SIZE {
                    return Err(LexerError::StringTooLarge {
                        size: content.len(),
                        span: Span::new(start, cur),
                    });
                }
            }
        }
    }
}

/// Scan a numeric literal; `first` is already consumed
///
/// Accepts digits, one fractional point followed by a digit, and one
/// exponent part. A trailing '.' without a digit stays unconsumed so the
/// grammar sees it as a separate (invalid) character.
fn scan_number(
    first: char,
    chars: &mut Peekable<CharIndices<'_>>,
    at: Position,
) -> Result<(Token, String), LexerError> {
    let mut text = String::new();
    text.push(first);
    let mut has_dot = false;
    let mut has_exponent = false;

    while let Some(&(_, ch)) = chars.peek() {
        match ch {
            '0'..='9' => {
                text.push(ch);
                chars.next();
            }
            '.' if !has_dot && !has_exponent => {
                let mut lookahead = chars.clone();
                lookahead.next();
                if lookahead.peek().is_some_and(|&(_, c)| c.is_ascii_digit()) {
                    has_dot = true;
                    text.push('.');
                    chars.next();
                } else {
                    break;
                }
            }
            'e' | 'E' if !has_exponent => {
                let mut lookahead = chars.clone();
                lookahead.next();
                let exponent_ok = match lookahead.peek() {
                    Some(&(_, c)) if c.is_ascii_digit() => true,
                    Some(&(_, '+')) | Some(&(_, '-')) => {
                        lookahead.next();
                        lookahead.peek().is_some_and(|&(_, c)| c.is_ascii_digit())
                    }
                    _ => false,
                };
                if !exponent_ok {
                    break;
                }
                has_exponent = true;
                text.push(ch);
                chars.next();
                if let Some(&(_, sign @ ('+' | '-'))) = chars.peek() {
                    text.push(sign);
                    chars.next();
                }
            }
            _ => break,
        }

        if text.len() > MAX_NUMBER_LENGTH {
            let mut end = at;
            end.advance_str(&text);
            return Err(LexerError::NumberTooLong {
                length: text.len(),
                span: Span::new(at, end),
            });
        }
    }

    let mut end = at;
    end.advance_str(&text);
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok((Token::Number(value), text)),
        _ => Err(LexerError::InvalidNumber {
            text,
            span: Span::new(at, end),
        }),
    }
}

/// Scan an identifier-shaped word and classify it; `first` is already consumed
fn scan_word(
    first: char,
    chars: &mut Peekable<CharIndices<'_>>,
    at: Position,
) -> Result<(Token, String), LexerError> {
    let mut word = String::new();
    word.push(first);

    while let Some(&(_, ch)) = chars.peek() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            word.push(ch);
            chars.next();
        } else {
            break;
        }
    }

    if word.len() > MAX_IDENTIFIER_LENGTH {
        let mut end = at;
        end.advance_str(&word);
        return Err(LexerError::IdentifierTooLong {
            length: word.len(),
            span: Span::new(at, end),
        });
    }

    let token = classify_word(&word);
    Ok((token, word))
}

/// Scan a symbol operator, preferring the two-character form
fn scan_operator(
    first: char,
    chars: &mut Peekable<CharIndices<'_>>,
    at: Position,
) -> Result<(Token, String), LexerError> {
    if let Some(&(_, next)) = chars.peek() {
        let mut pair = String::new();
        pair.push(first);
        pair.push(next);
        if let Some(token) = classify_operator_symbol(&pair) {
            chars.next();
            return Ok((token, pair));
        }
    }

    let single = first.to_string();
    match classify_operator_symbol(&single) {
        Some(token) => Ok((token, single)),
        None => Err(LexerError::InvalidCharacter {
            character: first,
            span: Span::point(at),
        }),
    }
}
