//! Lexical analysis module
//!
//! Provides systematic tokenization of policy expression source text with
//! compile-time security limits.

pub mod analyzer;

pub use analyzer::{LexerError, LexicalAnalyzer};

use crate::config::runtime::LexicalPreferences;
use crate::tokens::TokenStream;

/// Tokenize source text with default preferences
pub fn tokenize(source: &str) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::new().tokenize(source)
}

/// Tokenize with custom runtime preferences (security limits stay compile-time)
pub fn tokenize_with_preferences(
    source: &str,
    preferences: LexicalPreferences,
) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::with_preferences(preferences).tokenize(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::keywords::Keyword;
    use crate::tokens::Token;

    fn significant(source: &str) -> Vec<Token> {
        let mut stream = tokenize(source).unwrap();
        let mut out = Vec::new();
        while !stream.is_at_end() {
            out.push(stream.advance().unwrap().token);
        }
        out.push(stream.current().token.clone());
        out
    }

    #[test]
    fn test_empty_source_yields_lone_eof() {
        let stream = tokenize("").unwrap();
        assert_eq!(stream.current().token, Token::Eof);
        assert_eq!(stream.significant_len(), 1);
    }

    #[test]
    fn test_simple_arithmetic() {
        assert_eq!(
            significant("1 + 2.5"),
            vec![
                Token::Number(1.0),
                Token::Plus,
                Token::Number(2.5),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_subtraction_is_not_a_negative_literal() {
        // '1-2' must lex as three tokens so binary minus parses
        assert_eq!(
            significant("1-2"),
            vec![
                Token::Number(1.0),
                Token::Minus,
                Token::Number(2.0),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_aggregate_form_tokens() {
        assert_eq!(
            significant("Sum of prices"),
            vec![
                Token::Identifier("Sum".to_string()),
                Token::Keyword(Keyword::Of),
                Token::Identifier("prices".to_string()),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_word_literals_are_case_insensitive() {
        assert_eq!(
            significant("TRUE And Null"),
            vec![
                Token::Bool(true),
                Token::Keyword(Keyword::And),
                Token::Null,
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            significant(r#""line\n'quote' \"inner\"""#),
            vec![
                Token::Str("line\n'quote' \"inner\"".to_string()),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_single_and_double_quotes() {
        assert_eq!(
            significant(r#"'abc' == "abc""#),
            vec![
                Token::Str("abc".to_string()),
                Token::EqualEqual,
                Token::Str("abc".to_string()),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_matches::assert_matches!(
            tokenize("'oops"),
            Err(LexerError::UnterminatedString { .. })
        );
        assert_matches::assert_matches!(
            tokenize("'broken\nline'"),
            Err(LexerError::UnterminatedString { .. })
        );
    }

    #[test]
    fn test_invalid_escape() {
        assert_matches::assert_matches!(
            tokenize(r"'bad \q escape'"),
            Err(LexerError::InvalidEscape { character: 'q', .. })
        );
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(
            significant("0 42 3.25 1e3 2.5E-2"),
            vec![
                Token::Number(0.0),
                Token::Number(42.0),
                Token::Number(3.25),
                Token::Number(1000.0),
                Token::Number(0.025),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_operator_pairs_win_over_singles() {
        assert_eq!(
            significant("a<=b != c && !d"),
            vec![
                Token::Identifier("a".to_string()),
                Token::LessEqual,
                Token::Identifier("b".to_string()),
                Token::BangEqual,
                Token::Identifier("c".to_string()),
                Token::AmpAmp,
                Token::Bang,
                Token::Identifier("d".to_string()),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_lone_equals_is_invalid() {
        assert_matches::assert_matches!(
            tokenize("a = b"),
            Err(LexerError::InvalidCharacter { character: '=', .. })
        );
    }

    #[test]
    fn test_comment_retention_preference() {
        let retained = tokenize("1 // total\n2").unwrap();
        assert!(retained
            .peek(0)
            .map(|t| t.token == Token::Number(1.0))
            .unwrap_or(false));
        assert_eq!(retained.total_len(), 6); // 1, space, comment, newline, 2, eof

        let dropped = tokenize_with_preferences(
            "1 // total\n2",
            LexicalPreferences {
                retain_comment_tokens: false,
            },
        )
        .unwrap();
        assert_eq!(dropped.total_len(), 5);
        // Spans stay anchored to the original text either way
        let mut stream = dropped;
        stream.advance().unwrap();
        assert_eq!(stream.current().token, Token::Number(2.0));
        assert_eq!(stream.current_span().start().line, 2);
    }

    #[test]
    fn test_crlf_counts_one_line_break() {
        let mut stream = tokenize("1\r\n2").unwrap();
        stream.advance().unwrap();
        let span = stream.current_span();
        assert_eq!(stream.current().token, Token::Number(2.0));
        assert_eq!(span.start().line, 2);
        assert_eq!(span.start().column, 1);
    }

    #[test]
    fn test_collection_punctuation() {
        assert_eq!(
            significant("[1, 2]"),
            vec![
                Token::LeftBracket,
                Token::Number(1.0),
                Token::Comma,
                Token::Number(2.0),
                Token::RightBracket,
                Token::Eof
            ]
        );
        assert_eq!(
            significant("{count: 3}"),
            vec![
                Token::LeftBrace,
                Token::Identifier("count".to_string()),
                Token::Colon,
                Token::Number(3.0),
                Token::RightBrace,
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_spans_cover_lexemes() {
        let stream = tokenize("sum(xs)").unwrap();
        let first = stream.peek(0).unwrap();
        assert_eq!(first.span.start().offset, 0);
        assert_eq!(first.span.end().offset, 3);
        let paren = stream.peek(1).unwrap();
        assert_eq!(paren.span.start().offset, 3);
        assert_eq!(paren.span.len(), 1);
    }

    #[test]
    fn test_invalid_character_reports_position() {
        let err = tokenize("1 + ~2").unwrap_err();
        match err {
            LexerError::InvalidCharacter { character, span } => {
                assert_eq!(character, '~');
                assert_eq!(span.start().column, 5);
            }
            other => panic!("expected InvalidCharacter, got {:?}", other),
        }
    }
}
