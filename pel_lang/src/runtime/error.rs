//! Evaluation errors

use thiserror::Error;

use crate::config::compile_time::runtime::{MAX_ARRAY_ELEMENTS, MAX_SCOPE_BINDINGS};
use crate::types::{ConversionError, TypeKind};
use crate::utils::Span;

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: TypeKind,
        found: TypeKind,
        span: Span,
    },

    #[error("Undefined name '{name}'")]
    UndefinedName { name: String, span: Span },

    #[error("Division by zero")]
    DivisionByZero { span: Span },

    #[error("Operator '{operator}' cannot combine {left} and {right}")]
    InvalidOperands {
        operator: &'static str,
        left: TypeKind,
        right: TypeKind,
        span: Span,
    },

    #[error("Scope is full: {count} bindings (max {MAX_SCOPE_BINDINGS})")]
    TooManyBindings { count: usize },

    #[error("Array too large: {count} elements (max {MAX_ARRAY_ELEMENTS})")]
    ArrayTooLarge { count: usize, span: Span },

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl EvalError {
    pub fn type_mismatch(expected: TypeKind, found: TypeKind, span: Span) -> Self {
        Self::TypeMismatch {
            expected,
            found,
            span,
        }
    }

    pub fn undefined_name(name: impl Into<String>, span: Span) -> Self {
        Self::UndefinedName {
            name: name.into(),
            span,
        }
    }

    pub fn invalid_operands(
        operator: &'static str,
        left: TypeKind,
        right: TypeKind,
        span: Span,
    ) -> Self {
        Self::InvalidOperands {
            operator,
            left,
            right,
            span,
        }
    }

    /// Source location, when the failure is tied to one
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::TypeMismatch { span, .. }
            | Self::UndefinedName { span, .. }
            | Self::DivisionByZero { span }
            | Self::InvalidOperands { span, .. }
            | Self::ArrayTooLarge { span, .. } => Some(*span),
            Self::TooManyBindings { .. } | Self::Conversion(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn test_error_messages() {
        let span = Span::point(Position::start());
        let err = EvalError::type_mismatch(TypeKind::Array, TypeKind::Number, span);
        assert_eq!(err.to_string(), "Type mismatch: expected array, found number");
        assert_eq!(err.span(), Some(span));

        let err = EvalError::TooManyBindings { count: 3 };
        assert!(err.to_string().contains("max"));
        assert_eq!(err.span(), None);
    }
}
