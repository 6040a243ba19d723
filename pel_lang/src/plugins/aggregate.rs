//! Aggregate expression plugin
//!
//! Parses the six aggregate keywords in both surface forms, `sum(expr)`
//! and `sum of expr`. The `of` form is greedy: it takes the longest
//! expression to its right, so `sum of xs + 1` aggregates `xs + 1`.
//! Parenthesize to aggregate less.

use crate::grammar::ast::nodes::{AggregateOp, Expr};
use crate::grammar::keywords::Keyword;
use crate::plugins::ExprPlugin;
use crate::syntax::error::{ParseError, ParseResult};
use crate::syntax::parser::Parser;
use crate::tokens::Token;

#[derive(Debug, Default, Clone, Copy)]
pub struct AggregatePlugin;

impl AggregatePlugin {
    pub fn new() -> Self {
        Self
    }
}

impl ExprPlugin for AggregatePlugin {
    fn name(&self) -> &str {
        "aggregate"
    }

    fn start_tokens(&self) -> Vec<String> {
        AggregateOp::all()
            .iter()
            .map(|op| op.as_str().to_string())
            .collect()
    }

    /// Applicable only when the keyword is followed by '(' or 'of';
    /// a bare trigger word stays an ordinary name
    fn can_handle(&self, parser: &Parser<'_>) -> bool {
        matches!(
            parser.peek(1).map(|next| &next.token),
            Some(Token::LeftParen) | Some(Token::Keyword(Keyword::Of))
        )
    }

    fn parse(&self, parser: &mut Parser<'_>) -> ParseResult<Expr> {
        let trigger = parser.advance()?;
        let op = trigger
            .token
            .dispatch_text()
            .and_then(AggregateOp::parse)
            .ok_or_else(|| ParseError::UnknownAggregate {
                keyword: trigger.token.as_source_string(),
                span: trigger.span,
            })?;

        match &parser.current().token {
            Token::LeftParen => {
                parser.advance()?;
                let source = parser.parse_expression()?;
                let close = parser.expect(&Token::RightParen)?;
                Ok(Expr::Aggregate {
                    op,
                    source: Box::new(source),
                    span: trigger.span.merge(close.span),
                })
            }
            Token::Keyword(Keyword::Of) => {
                parser.advance()?;
                let source = parser.parse_expression()?;
                let span = trigger.span.merge(source.span());
                Ok(Expr::Aggregate {
                    op,
                    source: Box::new(source),
                    span,
                })
            }
            _ => Err(ParseError::unexpected_token(
                "'(' or 'of'",
                parser.current(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use crate::plugins::default_registry;
    use crate::syntax::parser::parse;

    fn parse_str(source: &str) -> ParseResult<Expr> {
        let registry = default_registry().unwrap();
        parse(tokenize(source).unwrap(), &registry)
    }

    fn aggregate_parts(expr: Expr) -> (AggregateOp, Expr) {
        match expr {
            Expr::Aggregate { op, source, .. } => (op, *source),
            other => panic!("expected aggregate, got {:?}", other),
        }
    }

    #[test]
    fn test_paren_form() {
        let (op, source) = aggregate_parts(parse_str("sum(prices)").unwrap());
        assert_eq!(op, AggregateOp::Sum);
        assert_matches::assert_matches!(source, Expr::Name { name, .. } if name == "prices");
    }

    #[test]
    fn test_of_form() {
        let (op, source) = aggregate_parts(parse_str("count of servers").unwrap());
        assert_eq!(op, AggregateOp::Count);
        assert_matches::assert_matches!(source, Expr::Name { name, .. } if name == "servers");
    }

    #[test]
    fn test_both_forms_share_source_shape() {
        for keyword in ["sum", "avg", "min", "max", "count", "number"] {
            let (paren_op, paren_source) =
                aggregate_parts(parse_str(&format!("{}(xs)", keyword)).unwrap());
            let (of_op, of_source) =
                aggregate_parts(parse_str(&format!("{} of xs", keyword)).unwrap());
            assert_eq!(paren_op, of_op, "operator mismatch for {}", keyword);
            // Sources carry different spans but identical structure
            assert_matches::assert_matches!(
                paren_source,
                Expr::Name { ref name, .. } if name == "xs"
            );
            assert_matches::assert_matches!(
                of_source,
                Expr::Name { ref name, .. } if name == "xs"
            );
        }
    }

    #[test]
    fn test_case_insensitive_dispatch() {
        for spelling in ["min(xs)", "Min(xs)", "MIN(xs)"] {
            let (op, _) = aggregate_parts(parse_str(spelling).unwrap());
            assert_eq!(op, AggregateOp::Min);
        }
    }

    #[test]
    fn test_aggregate_over_literal_list() {
        let expr = parse_str("sum([1, 2, 3])").unwrap();
        match expr {
            Expr::Aggregate { op, source, .. } => {
                assert_eq!(op, AggregateOp::Sum);
                assert_matches::assert_matches!(
                    *source,
                    Expr::Array { ref elements, .. } if elements.len() == 3
                );
            }
            other => panic!("expected aggregate, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_aggregates() {
        let expr = parse_str("avg of [sum(a), sum(b)]").unwrap();
        match expr {
            Expr::Aggregate { op, source, .. } => {
                assert_eq!(op, AggregateOp::Avg);
                assert_matches::assert_matches!(*source, Expr::Array { .. });
            }
            other => panic!("expected aggregate, got {:?}", other),
        }
    }

    #[test]
    fn test_of_form_is_greedy() {
        let expr = parse_str("sum of xs + 1").unwrap();
        match expr {
            Expr::Aggregate { op, source, .. } => {
                assert_eq!(op, AggregateOp::Sum);
                assert_matches::assert_matches!(*source, Expr::Binary { .. });
            }
            other => panic!("expected aggregate at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_operand_after_of() {
        let err = parse_str("sum of").unwrap_err();
        assert_matches::assert_matches!(err, ParseError::UnexpectedEndOfInput { .. });
    }

    #[test]
    fn test_unclosed_paren_form() {
        let err = parse_str("sum(xs").unwrap_err();
        assert_matches::assert_matches!(err, ParseError::Stream(_));
    }

    #[test]
    fn test_span_covers_whole_form() {
        let expr = parse_str("max(scores)").unwrap();
        let span = expr.span();
        assert_eq!(span.start().offset, 0);
        assert_eq!(span.end().offset, 11);
    }
}
