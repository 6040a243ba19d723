use thiserror::Error;

use crate::lexical::LexerError;
use crate::runtime::EvalError;
use crate::syntax::ParseError;
use crate::utils::Span;

/// Pipeline processing errors, one variant per stage
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Syntax analysis failed: {0}")]
    SyntaxAnalysis(#[from] ParseError),

    #[error("Evaluation failed: {0}")]
    Evaluation(#[from] EvalError),
}

impl PipelineError {
    /// Source location of the underlying failure, when it carries one
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::LexicalAnalysis(err) => err.span(),
            Self::SyntaxAnalysis(err) => err.span(),
            Self::Evaluation(err) => err.span(),
        }
    }
}
