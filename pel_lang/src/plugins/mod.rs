//! Parser extension plugins
//!
//! Plugins own the keyword-introduced expression forms. Each plugin
//! declares its trigger words; the parser consults the registry whenever
//! a word token reaches primary position and hands control to the first
//! registered plugin that accepts. Core grammar stays fixed, hosts extend
//! the language by registering plugins.

pub mod aggregate;
pub mod alias;
pub mod registry;

pub use aggregate::AggregatePlugin;
pub use alias::AliasTokenPlugin;
pub use registry::{PluginRegistry, PluginRegistryBuilder, RegistryError};

use std::sync::Arc;

use crate::grammar::ast::Expr;
use crate::syntax::error::ParseResult;
use crate::syntax::parser::Parser;

/// An expression form hooked into primary position
///
/// Dispatch is two-phase: the registry narrows by trigger word, then
/// `can_handle` confirms the surrounding shape without consuming input.
/// Only `parse` may move the cursor.
pub trait ExprPlugin: Send + Sync {
    /// Registry-unique plugin name, used in registration diagnostics
    fn name(&self) -> &str;

    /// Words that route parsing into this plugin (matched case-insensitively)
    fn start_tokens(&self) -> Vec<String>;

    /// Auto-matched plugins claim their trigger unconditionally,
    /// skipping `can_handle`
    fn is_auto_matched(&self) -> bool {
        false
    }

    /// Whether the tokens at the cursor form this plugin's shape;
    /// must not consume input
    fn can_handle(&self, parser: &Parser<'_>) -> bool;

    /// Parse this plugin's form, trigger word included
    fn parse(&self, parser: &mut Parser<'_>) -> ParseResult<Expr>;
}

/// The stock plugin set: aggregates plus spelling aliases for the two
/// aggregate names hosts most often rename
pub fn default_registry() -> Result<PluginRegistry, RegistryError> {
    let registry = PluginRegistry::builder()
        .register(Arc::new(AggregatePlugin::new()))?
        .register(Arc::new(AliasTokenPlugin::new("total", "sum")))?
        .register(Arc::new(AliasTokenPlugin::new("average", "avg")))?
        .build();
    Ok(registry)
}
