// Internal modules
pub mod config;
pub mod grammar;
pub mod lexical;
pub mod pipeline;
pub mod plugins;
pub mod runtime;
pub mod syntax;
pub mod tokens;
pub mod types;
pub mod utils;

// Re-export key types for library consumers
pub use grammar::ast::Expr;
pub use pipeline::{parse_str, run_str, PipelineError, PipelineResult};
pub use plugins::{default_registry, ExprPlugin, PluginRegistry};
pub use runtime::{evaluate, EvalError, Scope};
pub use types::{LValue, TypeKind};
