//! Abstract syntax tree for policy expressions

pub mod nodes;

pub use nodes::{
    AggregateOp, BinaryOp, CompareOp, ConditionOp, Constant, Expr, UnaryOp,
};
