//! Recursive descent parser for policy expressions
//!
//! A precedence ladder (condition, comparison, additive, multiplicative,
//! unary, primary) over the significant token cursor. Primary position
//! dispatches to registered plugins before the core grammar runs, so
//! keyword forms like aggregates are host-extensible without touching the
//! ladder. Recursion depth and collection sizes are bounded by the
//! compile-time limits.

use crate::config::compile_time::syntax::*;
use crate::grammar::ast::nodes::{
    BinaryOp, CompareOp, ConditionOp, Constant, Expr, UnaryOp,
};
use crate::grammar::keywords::Keyword;
use crate::plugins::PluginRegistry;
use crate::syntax::error::{ParseError, ParseResult};
use crate::tokens::{SpannedToken, Token, TokenStream};
use crate::utils::Span;

/// Parse one complete expression; every significant token must be consumed
pub fn parse(stream: TokenStream, registry: &PluginRegistry) -> ParseResult<Expr> {
    let mut parser = Parser::new(stream, registry);
    let expr = parser.parse_expression()?;

    let current = parser.current();
    if current.token != Token::Eof {
        return Err(ParseError::TrailingInput {
            found: current.token.as_source_string(),
            span: current.span,
        });
    }
    Ok(expr)
}

/// Recursive descent parser over a token stream
///
/// Plugins receive `&mut Parser` and drive it through the same surface the
/// core grammar uses: `current`/`peek` to look, `advance`/`expect` to
/// commit, and `parse_expression`/`parse_primary` to recurse.
pub struct Parser<'r> {
    stream: TokenStream,
    registry: &'r PluginRegistry,
    depth: usize,
}

impl<'r> Parser<'r> {
    pub fn new(stream: TokenStream, registry: &'r PluginRegistry) -> Self {
        Self {
            stream,
            registry,
            depth: 0,
        }
    }

    /// The significant token under the cursor
    pub fn current(&self) -> &SpannedToken {
        self.stream.current()
    }

    pub fn current_span(&self) -> Span {
        self.stream.current_span()
    }

    /// Bounded lookahead; plugins stay LL(k) within the configured cap
    pub fn peek(&self, offset: usize) -> Option<&SpannedToken> {
        if offset > MAX_LOOKAHEAD_TOKENS {
            return None;
        }
        self.stream.peek(offset)
    }

    /// Consume and return the current token
    pub fn advance(&mut self) -> ParseResult<SpannedToken> {
        Ok(self.stream.advance()?)
    }

    /// Consume the current token if it equals `expected`
    pub fn expect(&mut self, expected: &Token) -> ParseResult<SpannedToken> {
        Ok(self.stream.expect(expected)?)
    }

    /// Direct stream access for token-rewriting plugins
    pub fn stream_mut(&mut self) -> &mut TokenStream {
        &mut self.stream
    }

    fn descend<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_PARSE_DEPTH {
            return Err(ParseError::MaxParseDepth {
                depth: self.depth,
                span: self.current_span(),
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // === PRECEDENCE LADDER ===

    /// expression ::= condition
    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.descend(Self::parse_condition)
    }

    /// condition ::= comparison (("&&" | "||" | "and" | "or") comparison)*
    fn parse_condition(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match &self.current().token {
                Token::AmpAmp | Token::Keyword(Keyword::And) => ConditionOp::And,
                Token::PipePipe | Token::Keyword(Keyword::Or) => ConditionOp::Or,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_comparison()?;
            let span = left.span().merge(right.span());
            left = Expr::Condition {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    /// comparison ::= additive (("==" | "!=" | "<" | "<=" | ">" | ">=") additive)*
    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match &self.current().token {
                Token::EqualEqual => CompareOp::Eq,
                Token::BangEqual => CompareOp::Ne,
                Token::Less => CompareOp::Lt,
                Token::LessEqual => CompareOp::Le,
                Token::Greater => CompareOp::Gt,
                Token::GreaterEqual => CompareOp::Ge,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_additive()?;
            let span = left.span().merge(right.span());
            left = Expr::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    /// additive ::= multiplicative (("+" | "-") multiplicative)*
    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match &self.current().token {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_multiplicative()?;
            let span = left.span().merge(right.span());
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    /// multiplicative ::= unary (("*" | "/" | "%") unary)*
    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match &self.current().token {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_unary()?;
            let span = left.span().merge(right.span());
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    /// unary ::= ("-" | "!" | "not") unary | primary
    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match &self.current().token {
            Token::Minus => UnaryOp::Neg,
            Token::Bang | Token::Keyword(Keyword::Not) => UnaryOp::Not,
            _ => return self.parse_primary(),
        };
        let op_span = self.current_span();
        self.advance()?;
        let operand = self.descend(Self::parse_unary)?;
        let span = op_span.merge(operand.span());
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
            span,
        })
    }

    /// primary ::= plugin_form | literal | name | "(" expression ")"
    ///           | array_literal | map_literal
    pub fn parse_primary(&mut self) -> ParseResult<Expr> {
        self.descend(Self::parse_primary_inner)
    }

    fn parse_primary_inner(&mut self) -> ParseResult<Expr> {
        // Plugin dispatch runs before the core grammar: first registered
        // plugin whose trigger and applicability test match wins
        let trigger = self.current().token.dispatch_text().map(str::to_lowercase);
        if let Some(trigger) = trigger {
            let registry = self.registry;
            for plugin in registry.candidates(&trigger) {
                if plugin.is_auto_matched() || plugin.can_handle(self) {
                    return plugin.parse(self);
                }
            }
        }

        let current = self.current().clone();
        match current.token {
            Token::Number(n) => {
                self.advance()?;
                Ok(Expr::Literal {
                    value: Constant::Number(n),
                    span: current.span,
                })
            }
            Token::Str(s) => {
                self.advance()?;
                Ok(Expr::Literal {
                    value: Constant::Str(s),
                    span: current.span,
                })
            }
            Token::Bool(b) => {
                self.advance()?;
                Ok(Expr::Literal {
                    value: Constant::Bool(b),
                    span: current.span,
                })
            }
            Token::Null => {
                self.advance()?;
                Ok(Expr::Literal {
                    value: Constant::Null,
                    span: current.span,
                })
            }
            Token::Identifier(name) => {
                self.advance()?;
                Ok(Expr::Name {
                    name,
                    span: current.span,
                })
            }
            Token::LeftParen => {
                self.advance()?;
                let inner = self.parse_expression()?;
                self.expect(&Token::RightParen)?;
                Ok(inner)
            }
            Token::LeftBracket => self.parse_array(current.span),
            Token::LeftBrace => self.parse_map(current.span),
            Token::Eof => Err(ParseError::unexpected_end("expression")),
            _ => Err(ParseError::unexpected_token("expression", &current)),
        }
    }

    /// array_literal ::= "[" (expression ("," expression)*)? "]"
    fn parse_array(&mut self, open: Span) -> ParseResult<Expr> {
        self.advance()?; // '['
        let mut elements = Vec::new();

        if self.current().token != Token::RightBracket {
            loop {
                if elements.len() >= MAX_COLLECTION_ELEMENTS {
                    return Err(ParseError::TooManyElements {
                        count: elements.len(),
                        span: self.current_span(),
                    });
                }
                elements.push(self.parse_expression()?);
                if self.current().token == Token::Comma {
                    self.advance()?;
                } else {
                    break;
                }
            }
        }

        let close = self.expect(&Token::RightBracket)?;
        Ok(Expr::Array {
            elements,
            span: open.merge(close.span),
        })
    }

    /// map_literal ::= "{" (map_entry ("," map_entry)*)? "}"
    /// map_entry   ::= (identifier | string) ":" expression
    fn parse_map(&mut self, open: Span) -> ParseResult<Expr> {
        self.advance()?; // '{'
        let mut entries = Vec::new();

        if self.current().token != Token::RightBrace {
            loop {
                if entries.len() >= MAX_COLLECTION_ELEMENTS {
                    return Err(ParseError::TooManyElements {
                        count: entries.len(),
                        span: self.current_span(),
                    });
                }
                let key = match &self.current().token {
                    Token::Identifier(name) => name.clone(),
                    Token::Str(s) => s.clone(),
                    _ => {
                        return Err(ParseError::unexpected_token(
                            "map key (identifier or string)",
                            self.current(),
                        ));
                    }
                };
                self.advance()?;
                self.expect(&Token::Colon)?;
                let value = self.parse_expression()?;
                entries.push((key, value));
                if self.current().token == Token::Comma {
                    self.advance()?;
                } else {
                    break;
                }
            }
        }

        let close = self.expect(&Token::RightBrace)?;
        Ok(Expr::Map {
            entries,
            span: open.merge(close.span),
        })
    }
}
