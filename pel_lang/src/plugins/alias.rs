//! Token-aliasing plugin
//!
//! Parses an alias word as if it were a different canonical word. The
//! rewrite happens at dispatch time, in the stream itself: the current
//! token is replaced (span preserved) and primary parsing re-runs, so
//! every downstream behavior of the canonical word is reused unchanged.
//! The substitution is unconditional, which makes the alias word
//! effectively reserved wherever this plugin is registered.

use crate::grammar::ast::Expr;
use crate::plugins::ExprPlugin;
use crate::syntax::error::ParseResult;
use crate::syntax::parser::Parser;
use crate::tokens::Token;

#[derive(Debug, Clone)]
pub struct AliasTokenPlugin {
    name: String,
    alias: String,
    canonical: String,
}

impl AliasTokenPlugin {
    pub fn new(alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            name: format!("alias:{}", alias),
            alias,
            canonical: canonical.into(),
        }
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl ExprPlugin for AliasTokenPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn start_tokens(&self) -> Vec<String> {
        vec![self.alias.clone()]
    }

    fn is_auto_matched(&self) -> bool {
        true
    }

    fn can_handle(&self, _parser: &Parser<'_>) -> bool {
        true
    }

    fn parse(&self, parser: &mut Parser<'_>) -> ParseResult<Expr> {
        // A self-referential alias would loop here; the parse depth
        // guard turns that configuration mistake into an error
        parser
            .stream_mut()
            .replace_current(Token::Identifier(self.canonical.clone()))?;
        parser.parse_primary()
    }
}
