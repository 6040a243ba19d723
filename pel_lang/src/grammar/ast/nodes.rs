//! Complete AST node definitions for the expression grammar
//!
//! Every production rule has a corresponding node, every node carries the
//! span of the source text it covers, and the whole tree serializes for
//! host-side consumption. The `Expr` enum is closed: plugins produce these
//! shapes, they do not extend them.

use crate::types::LValue;
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

// === LITERAL CONSTANTS ===

/// A literal constant as written in source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Constant {
    /// The runtime value of this constant; `Null` passes through unchanged
    pub fn to_value(&self) -> LValue {
        match self {
            Self::Null => LValue::Null,
            Self::Bool(b) => LValue::Bool(*b),
            Self::Number(n) => LValue::Number(*n),
            Self::Str(s) => LValue::Str(s.clone()),
        }
    }
}

// === OPERATORS ===

/// Aggregate operations over array sources (EBNF: aggregate_keyword)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateOp {
    Sum,
    Avg,
    Min,
    Max,
    Count,
    Number,
}

impl AggregateOp {
    /// Parse an aggregate keyword (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sum" => Some(Self::Sum),
            "avg" => Some(Self::Avg),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "count" => Some(Self::Count),
            "number" => Some(Self::Number),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
            Self::Count => "count",
            Self::Number => "number",
        }
    }

    /// Every aggregate keyword, in grammar order
    pub const fn all() -> [AggregateOp; 6] {
        [
            Self::Sum,
            Self::Avg,
            Self::Min,
            Self::Max,
            Self::Count,
            Self::Number,
        ]
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Arithmetic negation `-`
    Neg,
    /// Logical negation `!` / `not`
    Not,
}

impl UnaryOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// Logical connectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOp {
    And,
    Or,
}

impl ConditionOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

// === EXPRESSION TREE ===

/// A parsed expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A literal constant
    Literal { value: Constant, span: Span },

    /// A variable reference resolved against the evaluation scope
    Name { name: String, span: Span },

    /// An array literal `[a, b, c]`
    Array { elements: Vec<Expr>, span: Span },

    /// A map literal `{key: expr, ...}`; source order is preserved
    Map {
        entries: Vec<(String, Expr)>,
        span: Span,
    },

    /// A prefix operation
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },

    /// An arithmetic operation
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },

    /// A comparison
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },

    /// A logical connection
    Condition {
        op: ConditionOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },

    /// An aggregate over an array source; both grammar forms produce this
    /// one shape
    Aggregate {
        op: AggregateOp,
        source: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    /// The source span this expression covers
    pub fn span(&self) -> Span {
        match self {
            Self::Literal { span, .. }
            | Self::Name { span, .. }
            | Self::Array { span, .. }
            | Self::Map { span, .. }
            | Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::Compare { span, .. }
            | Self::Condition { span, .. }
            | Self::Aggregate { span, .. } => *span,
        }
    }

    /// Variant name for diagnostics and dispatch tests
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Literal { .. } => "literal",
            Self::Name { .. } => "name",
            Self::Array { .. } => "array",
            Self::Map { .. } => "map",
            Self::Unary { .. } => "unary",
            Self::Binary { .. } => "binary",
            Self::Compare { .. } => "compare",
            Self::Condition { .. } => "condition",
            Self::Aggregate { .. } => "aggregate",
        }
    }
}
