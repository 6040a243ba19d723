//! Token system for the PEL expression grammar
//!
//! All operators are dedicated symbol tokens; words become keywords, literal
//! tokens, or identifiers via [`classify_word`]. Aggregate names stay
//! identifiers on purpose - parser plugins claim them by text at dispatch
//! time, so the token layer needs no knowledge of registered grammar.

use crate::grammar::keywords::Keyword;
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A lexical token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    // === STRUCTURAL KEYWORDS ===
    /// Reserved words (`of`, `and`, `or`, `not`)
    Keyword(Keyword),

    // === LITERALS ===
    /// Numeric literal (IEEE 754 double precision; PEL has one number kind)
    Number(f64),
    /// String literal, quotes and escapes already processed
    Str(String),
    /// Boolean literal
    Bool(bool),
    /// The null literal
    Null,

    // === IDENTIFIERS ===
    /// User-level names, variable references, and plugin trigger words
    Identifier(String),

    // === GROUPING ===
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    LeftBrace,    // {
    RightBrace,   // }
    Comma,        // ,
    Colon,        // :

    // === ARITHMETIC OPERATORS ===
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // === COMPARISON OPERATORS ===
    EqualEqual,   // ==
    BangEqual,    // !=
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=

    // === LOGICAL OPERATORS ===
    AmpAmp,   // &&
    PipePipe, // ||
    Bang,     // !

    // === WHITESPACE AND STRUCTURE ===
    /// Single space character
    Space,
    /// Tab character
    Tab,
    /// Newline character
    Newline,
    /// Comment (// to end of line)
    Comment(String),
    /// End of input marker
    Eof,
}

impl Token {
    /// Check if this token is an arithmetic operator
    pub fn is_arithmetic_operator(&self) -> bool {
        matches!(
            self,
            Self::Plus | Self::Minus | Self::Star | Self::Slash | Self::Percent
        )
    }

    /// Check if this token is a comparison operator
    pub fn is_comparison_operator(&self) -> bool {
        matches!(
            self,
            Self::EqualEqual
                | Self::BangEqual
                | Self::Less
                | Self::LessEqual
                | Self::Greater
                | Self::GreaterEqual
        )
    }

    /// Check if this token is a logical operator (symbol or word form)
    pub fn is_logical_operator(&self) -> bool {
        matches!(self, Self::AmpAmp | Self::PipePipe)
            || matches!(self, Self::Keyword(kw) if kw.is_logical_connector())
    }

    /// Check if this token is a literal value
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Number(_) | Self::Str(_) | Self::Bool(_) | Self::Null
        )
    }

    /// Check if this token is an identifier
    pub fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier(_))
    }

    /// Check if this token is a specific identifier, case-insensitively
    pub fn is_identifier_with_text(&self, text: &str) -> bool {
        matches!(self, Self::Identifier(id) if id.eq_ignore_ascii_case(text))
    }

    /// Check if this token matches a specific keyword
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Self::Keyword(kw) if *kw == keyword)
    }

    /// Check if this token is whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Space | Self::Tab | Self::Newline)
    }

    /// Check if this token should be ignored during parsing
    pub fn is_ignorable(&self) -> bool {
        self.is_whitespace() || matches!(self, Self::Comment(_))
    }

    pub fn is_significant(&self) -> bool {
        !self.is_ignorable()
    }

    /// Get identifier text if this token is an identifier
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Get keyword if this token is a keyword
    pub fn as_keyword(&self) -> Option<Keyword> {
        match self {
            Self::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// The text the parser dispatches plugins on: identifier text, or the
    /// canonical form of a keyword (alias plugins may target either)
    pub fn dispatch_text(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            Self::Keyword(kw) => Some(kw.as_str()),
            _ => None,
        }
    }

    /// Get the token as it would appear in PEL source
    pub fn as_source_string(&self) -> String {
        match self {
            Self::Keyword(kw) => kw.as_str().to_string(),

            Self::Number(n) => format_number(*n),
            Self::Str(s) => format!("'{}'", s),
            Self::Bool(b) => b.to_string(),
            Self::Null => "null".to_string(),

            Self::Identifier(id) => id.clone(),

            Self::LeftParen => "(".to_string(),
            Self::RightParen => ")".to_string(),
            Self::LeftBracket => "[".to_string(),
            Self::RightBracket => "]".to_string(),
            Self::LeftBrace => "{".to_string(),
            Self::RightBrace => "}".to_string(),
            Self::Comma => ",".to_string(),
            Self::Colon => ":".to_string(),

            Self::Plus => "+".to_string(),
            Self::Minus => "-".to_string(),
            Self::Star => "*".to_string(),
            Self::Slash => "/".to_string(),
            Self::Percent => "%".to_string(),

            Self::EqualEqual => "==".to_string(),
            Self::BangEqual => "!=".to_string(),
            Self::Less => "<".to_string(),
            Self::LessEqual => "<=".to_string(),
            Self::Greater => ">".to_string(),
            Self::GreaterEqual => ">=".to_string(),

            Self::AmpAmp => "&&".to_string(),
            Self::PipePipe => "||".to_string(),
            Self::Bang => "!".to_string(),

            Self::Space => " ".to_string(),
            Self::Tab => "\t".to_string(),
            Self::Newline => "\n".to_string(),
            Self::Comment(text) => format!("//{}", text),
            Self::Eof => "<EOF>".to_string(),
        }
    }

    /// Short name of the token's kind, used in expected/found error text
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Keyword(_) => "keyword",
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::Bool(_) => "boolean",
            Self::Null => "null",
            Self::Identifier(_) => "identifier",
            Self::LeftParen => "'('",
            Self::RightParen => "')'",
            Self::LeftBracket => "'['",
            Self::RightBracket => "']'",
            Self::LeftBrace => "'{'",
            Self::RightBrace => "'}'",
            Self::Comma => "','",
            Self::Colon => "':'",
            Self::Plus | Self::Minus | Self::Star | Self::Slash | Self::Percent => {
                "arithmetic operator"
            }
            Self::EqualEqual
            | Self::BangEqual
            | Self::Less
            | Self::LessEqual
            | Self::Greater
            | Self::GreaterEqual => "comparison operator",
            Self::AmpAmp | Self::PipePipe | Self::Bang => "logical operator",
            Self::Space | Self::Tab | Self::Newline => "whitespace",
            Self::Comment(_) => "comment",
            Self::Eof => "end of input",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_source_string())
    }
}

/// Render a numeric literal; integral values print without a trailing `.0`
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// A token paired with its source span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

impl SpannedToken {
    pub fn new(token: Token, span: Span) -> Self {
        Self { token, span }
    }
}

impl fmt::Display for SpannedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.token, self.span)
    }
}

/// Token classification for stream statistics and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// Structural tokens (keywords, grouping, punctuation)
    Structural,
    /// Operator symbols
    Operation,
    /// Literal values
    Literal,
    /// Identifiers
    Identifier,
    /// Whitespace and formatting
    Whitespace,
    /// Special tokens (EOF, comments)
    Special,
}

impl Token {
    /// Get the classification of this token
    pub fn token_class(&self) -> TokenClass {
        match self {
            Self::Keyword(_)
            | Self::LeftParen
            | Self::RightParen
            | Self::LeftBracket
            | Self::RightBracket
            | Self::LeftBrace
            | Self::RightBrace
            | Self::Comma
            | Self::Colon => TokenClass::Structural,

            Self::Plus
            | Self::Minus
            | Self::Star
            | Self::Slash
            | Self::Percent
            | Self::EqualEqual
            | Self::BangEqual
            | Self::Less
            | Self::LessEqual
            | Self::Greater
            | Self::GreaterEqual
            | Self::AmpAmp
            | Self::PipePipe
            | Self::Bang => TokenClass::Operation,

            Self::Number(_) | Self::Str(_) | Self::Bool(_) | Self::Null => TokenClass::Literal,

            Self::Identifier(_) => TokenClass::Identifier,
            Self::Space | Self::Tab | Self::Newline => TokenClass::Whitespace,
            Self::Comment(_) | Self::Eof => TokenClass::Special,
        }
    }
}

// === SYSTEMATIC CLASSIFICATION FUNCTIONS ===

/// Classify a word as keyword, literal, or identifier
pub fn classify_word(word: &str) -> Token {
    if let Some(keyword) = Keyword::from_str(word) {
        return Token::Keyword(keyword);
    }

    // Literal words are case-insensitive like keywords
    match word.to_ascii_lowercase().as_str() {
        "true" => Token::Bool(true),
        "false" => Token::Bool(false),
        "null" => Token::Null,
        _ => Token::Identifier(word.to_string()),
    }
}

/// Map a symbol character sequence to its operator token
pub fn classify_operator_symbol(symbol: &str) -> Option<Token> {
    match symbol {
        "+" => Some(Token::Plus),
        "-" => Some(Token::Minus),
        "*" => Some(Token::Star),
        "/" => Some(Token::Slash),
        "%" => Some(Token::Percent),
        "==" => Some(Token::EqualEqual),
        "!=" => Some(Token::BangEqual),
        "<" => Some(Token::Less),
        "<=" => Some(Token::LessEqual),
        ">" => Some(Token::Greater),
        ">=" => Some(Token::GreaterEqual),
        "&&" => Some(Token::AmpAmp),
        "||" => Some(Token::PipePipe),
        "!" => Some(Token::Bang),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_word_keywords_and_literals() {
        assert_eq!(classify_word("of"), Token::Keyword(Keyword::Of));
        assert_eq!(classify_word("true"), Token::Bool(true));
        assert_eq!(classify_word("False"), Token::Bool(false));
        assert_eq!(classify_word("NULL"), Token::Null);
        assert_eq!(
            classify_word("sum"),
            Token::Identifier("sum".to_string())
        );
    }

    #[test]
    fn test_classify_operator_symbols() {
        assert_eq!(classify_operator_symbol("=="), Some(Token::EqualEqual));
        assert_eq!(classify_operator_symbol("<="), Some(Token::LessEqual));
        assert_eq!(classify_operator_symbol("&&"), Some(Token::AmpAmp));
        assert_eq!(classify_operator_symbol("="), None);
    }

    #[test]
    fn test_identifier_text_match_ignores_case() {
        let token = Token::Identifier("Sum".to_string());
        assert!(token.is_identifier_with_text("sum"));
        assert!(token.is_identifier_with_text("SUM"));
        assert!(!token.is_identifier_with_text("avg"));
    }

    #[test]
    fn test_dispatch_text() {
        assert_eq!(
            Token::Identifier("total".to_string()).dispatch_text(),
            Some("total")
        );
        assert_eq!(Token::Keyword(Keyword::Of).dispatch_text(), Some("of"));
        assert_eq!(Token::Number(1.0).dispatch_text(), None);
    }

    #[test]
    fn test_significance() {
        assert!(Token::Number(1.0).is_significant());
        assert!(Token::Eof.is_significant());
        assert!(!Token::Space.is_significant());
        assert!(!Token::Comment(" note".to_string()).is_significant());
    }

    #[test]
    fn test_token_class() {
        assert_eq!(Token::LeftParen.token_class(), TokenClass::Structural);
        assert_eq!(Token::Plus.token_class(), TokenClass::Operation);
        assert_eq!(Token::Null.token_class(), TokenClass::Literal);
        assert_eq!(Token::Newline.token_class(), TokenClass::Whitespace);
        assert_eq!(Token::Eof.token_class(), TokenClass::Special);
    }

    #[test]
    fn test_number_source_form() {
        assert_eq!(Token::Number(5.0).as_source_string(), "5");
        assert_eq!(Token::Number(2.5).as_source_string(), "2.5");
    }
}
