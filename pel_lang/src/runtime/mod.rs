//! Evaluation runtime
//!
//! Pure and host-silent: values in, a value or a typed error out. All
//! reporting is the embedding host's job.

pub mod error;
pub mod evaluator;
pub mod scope;

pub use error::{EvalError, EvalResult};
pub use evaluator::{evaluate, Evaluator};
pub use scope::Scope;
