//! Expression tree evaluation
//!
//! A pure recursive walk: the scope is read-only, results are values,
//! failures are typed errors carrying the span of the offending
//! subexpression. Arithmetic coerces operands to numbers where the
//! conversion matrix allows, except that `+` concatenates when either
//! side is a string; comparisons order values only within a kind;
//! conditions require booleans and evaluate both sides.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::config::compile_time::runtime::MAX_ARRAY_ELEMENTS;
use crate::grammar::ast::nodes::{
    AggregateOp, BinaryOp, CompareOp, ConditionOp, Expr, UnaryOp,
};
use crate::runtime::error::{EvalError, EvalResult};
use crate::runtime::scope::Scope;
use crate::types::{convert, ConversionError, ConversionMode, LValue, TypeKind};
use crate::utils::Span;

/// Evaluate `expr` against the bindings in `scope`
pub fn evaluate(expr: &Expr, scope: &Scope) -> EvalResult<LValue> {
    Evaluator::new(scope).eval(expr)
}

pub struct Evaluator<'s> {
    scope: &'s Scope,
}

impl<'s> Evaluator<'s> {
    pub fn new(scope: &'s Scope) -> Self {
        Self { scope }
    }

    pub fn eval(&self, expr: &Expr) -> EvalResult<LValue> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.to_value()),
            Expr::Name { name, span } => self
                .scope
                .lookup(name)
                .cloned()
                .ok_or_else(|| EvalError::undefined_name(name.clone(), *span)),
            Expr::Array { elements, span } => self.eval_array(elements, *span),
            Expr::Map { entries, .. } => self.eval_map(entries),
            Expr::Unary { op, operand, .. } => self.eval_unary(*op, operand),
            Expr::Binary {
                op, left, right, span,
            } => self.eval_binary(*op, left, right, *span),
            Expr::Compare {
                op, left, right, span,
            } => self.eval_compare(*op, left, right, *span),
            Expr::Condition { op, left, right, .. } => self.eval_condition(*op, left, right),
            Expr::Aggregate { op, source, .. } => self.eval_aggregate(*op, source),
        }
    }

    fn eval_array(&self, elements: &[Expr], span: Span) -> EvalResult<LValue> {
        if elements.len() > MAX_ARRAY_ELEMENTS {
            return Err(EvalError::ArrayTooLarge {
                count: elements.len(),
                span,
            });
        }
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            values.push(self.eval(element)?);
        }
        Ok(LValue::Array(values))
    }

    /// Later entries win on duplicate keys
    fn eval_map(&self, entries: &[(String, Expr)]) -> EvalResult<LValue> {
        let mut map = BTreeMap::new();
        for (key, value) in entries {
            map.insert(key.clone(), self.eval(value)?);
        }
        Ok(LValue::Map(map))
    }

    fn eval_unary(&self, op: UnaryOp, operand: &Expr) -> EvalResult<LValue> {
        let value = self.eval(operand)?;
        match op {
            UnaryOp::Neg => {
                let n = coerce_number(&value, operand.span())?;
                Ok(LValue::Number(-n))
            }
            UnaryOp::Not => match value {
                LValue::Bool(b) => Ok(LValue::Bool(!b)),
                other => Err(EvalError::type_mismatch(
                    TypeKind::Bool,
                    other.kind(),
                    operand.span(),
                )),
            },
        }
    }

    fn eval_binary(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        span: Span,
    ) -> EvalResult<LValue> {
        let lhs = self.eval(left)?;
        let rhs = self.eval(right)?;

        // `+` joins strings; the non-string side renders through the matrix
        if op == BinaryOp::Add
            && (lhs.kind() == TypeKind::String || rhs.kind() == TypeKind::String)
        {
            let l = coerce_string(&lhs, left.span())?;
            let r = coerce_string(&rhs, right.span())?;
            return Ok(LValue::Str(l + &r));
        }

        if !numeric_convertible(&lhs) || !numeric_convertible(&rhs) {
            return Err(EvalError::invalid_operands(
                op.as_str(),
                lhs.kind(),
                rhs.kind(),
                span,
            ));
        }
        let l = coerce_number(&lhs, left.span())?;
        let r = coerce_number(&rhs, right.span())?;

        let result = match op {
            BinaryOp::Add => l + r,
            BinaryOp::Sub => l - r,
            BinaryOp::Mul => l * r,
            BinaryOp::Div => {
                if r == 0.0 {
                    return Err(EvalError::DivisionByZero { span });
                }
                l / r
            }
            BinaryOp::Mod => {
                if r == 0.0 {
                    return Err(EvalError::DivisionByZero { span });
                }
                l % r
            }
        };
        Ok(LValue::Number(result))
    }

    fn eval_compare(
        &self,
        op: CompareOp,
        left: &Expr,
        right: &Expr,
        span: Span,
    ) -> EvalResult<LValue> {
        let lhs = self.eval(left)?;
        let rhs = self.eval(right)?;

        let result = match op {
            // Equality is structural; values of different kinds are unequal
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => {
                let ordering = compare_ordered(&lhs, &rhs).ok_or_else(|| {
                    EvalError::invalid_operands(op.as_str(), lhs.kind(), rhs.kind(), span)
                })?;
                matches!(
                    (op, ordering),
                    (CompareOp::Lt, Ordering::Less)
                        | (CompareOp::Le, Ordering::Less | Ordering::Equal)
                        | (CompareOp::Gt, Ordering::Greater)
                        | (CompareOp::Ge, Ordering::Greater | Ordering::Equal)
                )
            }
        };
        Ok(LValue::Bool(result))
    }

    /// Both sides evaluate; there is no short-circuit
    fn eval_condition(
        &self,
        op: ConditionOp,
        left: &Expr,
        right: &Expr,
    ) -> EvalResult<LValue> {
        let l = self.bool_operand(left)?;
        let r = self.bool_operand(right)?;
        let result = match op {
            ConditionOp::And => l && r,
            ConditionOp::Or => l || r,
        };
        Ok(LValue::Bool(result))
    }

    fn bool_operand(&self, expr: &Expr) -> EvalResult<bool> {
        match self.eval(expr)? {
            LValue::Bool(b) => Ok(b),
            other => Err(EvalError::type_mismatch(
                TypeKind::Bool,
                other.kind(),
                expr.span(),
            )),
        }
    }

    fn eval_aggregate(&self, op: AggregateOp, source: &Expr) -> EvalResult<LValue> {
        let value = self.eval(source)?;
        // A null source is rejected here, before element extraction
        let elements = match value {
            LValue::Array(elements) => elements,
            other => {
                return Err(EvalError::type_mismatch(
                    TypeKind::Array,
                    other.kind(),
                    source.span(),
                ));
            }
        };

        let result = match op {
            AggregateOp::Count | AggregateOp::Number => elements.len() as f64,
            AggregateOp::Sum => elements.iter().map(contribution).sum(),
            AggregateOp::Avg => {
                if elements.is_empty() {
                    0.0
                } else {
                    elements.iter().map(contribution).sum::<f64>() / elements.len() as f64
                }
            }
            AggregateOp::Min => elements
                .iter()
                .map(contribution)
                .fold(None::<f64>, |acc, v| Some(acc.map_or(v, |a| a.min(v))))
                .unwrap_or(0.0),
            AggregateOp::Max => elements
                .iter()
                .map(contribution)
                .fold(None::<f64>, |acc, v| Some(acc.map_or(v, |a| a.max(v))))
                .unwrap_or(0.0),
        };
        Ok(LValue::Number(result))
    }
}

/// Numeric contribution of one element; non-numeric elements count as zero
fn contribution(value: &LValue) -> f64 {
    match value {
        LValue::Number(n) => *n,
        _ => 0.0,
    }
}

fn numeric_convertible(value: &LValue) -> bool {
    value.lang_type().conversion_to(TypeKind::Number) != ConversionMode::NotSupported
}

fn coerce_number(value: &LValue, span: Span) -> EvalResult<f64> {
    match convert(value, TypeKind::Number) {
        Ok(LValue::Number(n)) => Ok(n),
        Ok(_) | Err(ConversionError::NotSupported { .. }) => Err(EvalError::type_mismatch(
            TypeKind::Number,
            value.kind(),
            span,
        )),
        Err(err) => Err(err.into()),
    }
}

fn coerce_string(value: &LValue, span: Span) -> EvalResult<String> {
    match convert(value, TypeKind::String) {
        Ok(LValue::Str(s)) => Ok(s),
        Ok(_) | Err(ConversionError::NotSupported { .. }) => Err(EvalError::type_mismatch(
            TypeKind::String,
            value.kind(),
            span,
        )),
        Err(err) => Err(err.into()),
    }
}

/// Ordering is defined only within a kind, for the four ordered kinds
fn compare_ordered(left: &LValue, right: &LValue) -> Option<Ordering> {
    match (left, right) {
        (LValue::Number(l), LValue::Number(r)) => Some(l.total_cmp(r)),
        (LValue::Str(l), LValue::Str(r)) => Some(l.cmp(r)),
        (LValue::Date(l), LValue::Date(r)) => Some(l.cmp(r)),
        (LValue::Time(l), LValue::Time(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use crate::plugins::default_registry;
    use crate::syntax::parser::parse;

    fn eval_str(source: &str, scope: &Scope) -> EvalResult<LValue> {
        let registry = default_registry().unwrap();
        let expr = parse(tokenize(source).unwrap(), &registry).unwrap();
        evaluate(&expr, scope)
    }

    fn number(source: &str, scope: &Scope) -> f64 {
        match eval_str(source, scope).unwrap() {
            LValue::Number(n) => n,
            other => panic!("expected number from '{}', got {:?}", source, other),
        }
    }

    fn boolean(source: &str, scope: &Scope) -> bool {
        match eval_str(source, scope).unwrap() {
            LValue::Bool(b) => b,
            other => panic!("expected bool from '{}', got {:?}", source, other),
        }
    }

    fn numbers(values: &[f64]) -> LValue {
        LValue::Array(values.iter().copied().map(LValue::Number).collect())
    }

    #[test]
    fn test_arithmetic() {
        let scope = Scope::new();
        assert_eq!(number("1 + 2 * 3", &scope), 7.0);
        assert_eq!(number("(1 + 2) * 3", &scope), 9.0);
        assert_eq!(number("10 % 3", &scope), 1.0);
        assert_eq!(number("-2 + 3", &scope), 1.0);
        assert_eq!(number("7 / 2", &scope), 3.5);
    }

    #[test]
    fn test_division_by_zero() {
        let scope = Scope::new();
        assert_matches::assert_matches!(
            eval_str("1 / 0", &scope),
            Err(EvalError::DivisionByZero { .. })
        );
        assert_matches::assert_matches!(
            eval_str("1 % 0", &scope),
            Err(EvalError::DivisionByZero { .. })
        );
    }

    #[test]
    fn test_arithmetic_coercion_follows_the_matrix() {
        let scope = Scope::new();
        // bool -> number is always supported
        assert_eq!(number("true + 1", &scope), 2.0);
        // string -> number holds only for numeric strings
        assert_eq!(number("'3' * 2", &scope), 6.0);
        assert_matches::assert_matches!(
            eval_str("'abc' * 2", &scope),
            Err(EvalError::Conversion(ConversionError::Failed { .. }))
        );
        // array -> number is never supported
        assert_matches::assert_matches!(
            eval_str("[1] + 1", &scope),
            Err(EvalError::InvalidOperands { operator: "+", .. })
        );
    }

    #[test]
    fn test_plus_concatenates_strings() {
        let scope = Scope::new();
        assert_eq!(
            eval_str("'pol' + 'icy'", &scope).unwrap(),
            LValue::Str("policy".into())
        );
        // The non-string side renders through the matrix
        assert_eq!(
            eval_str("'total: ' + 42", &scope).unwrap(),
            LValue::Str("total: 42".into())
        );
        assert_eq!(
            eval_str("1 + ' item'", &scope).unwrap(),
            LValue::Str("1 item".into())
        );
        assert_eq!(
            eval_str("'on: ' + true", &scope).unwrap(),
            LValue::Str("on: true".into())
        );
        // Only `+` treats strings this way
        assert_matches::assert_matches!(
            eval_str("'a' - 'b'", &scope),
            Err(EvalError::Conversion(ConversionError::Failed { .. }))
        );
    }

    #[test]
    fn test_comparisons() {
        let scope = Scope::new();
        assert!(boolean("2 < 3", &scope));
        assert!(boolean("3 <= 3", &scope));
        assert!(boolean("'apple' < 'banana'", &scope));
        assert!(boolean("1 == 1", &scope));
        assert!(boolean("1 != 2", &scope));
        // Different kinds are unequal, never an error
        assert!(!boolean("'1' == 1", &scope));
        assert!(boolean("'1' != 1", &scope));
        // but ordering across kinds is an error
        assert_matches::assert_matches!(
            eval_str("'1' < 1", &scope),
            Err(EvalError::InvalidOperands { operator: "<", .. })
        );
    }

    #[test]
    fn test_conditions_require_booleans() {
        let scope = Scope::new();
        assert!(boolean("true && true", &scope));
        assert!(!boolean("true and false", &scope));
        assert!(boolean("false || true", &scope));
        assert!(boolean("not false", &scope));
        assert_matches::assert_matches!(
            eval_str("1 && true", &scope),
            Err(EvalError::TypeMismatch { .. })
        );
    }

    #[test]
    fn test_conditions_evaluate_both_sides() {
        let scope = Scope::new();
        // No short-circuit: the right side fails even though the left
        // already decides the result
        assert_matches::assert_matches!(
            eval_str("false && 1 / 0 == 1", &scope),
            Err(EvalError::DivisionByZero { .. })
        );
    }

    #[test]
    fn test_name_resolution() {
        let mut scope = Scope::new();
        scope.define("limit", LValue::Number(100.0)).unwrap();
        assert_eq!(number("limit / 4", &scope), 25.0);

        let err = eval_str("missing + 1", &scope).unwrap_err();
        assert_matches::assert_matches!(err, EvalError::UndefinedName { name, .. } if name == "missing");
    }

    #[test]
    fn test_collection_literals() {
        let mut scope = Scope::new();
        scope.define("x", LValue::Number(2.0)).unwrap();

        let value = eval_str("[1, x, x * 2]", &scope).unwrap();
        assert_eq!(value, numbers(&[1.0, 2.0, 4.0]));

        let value = eval_str("{a: 1, b: 2, a: 3}", &scope).unwrap();
        match value {
            LValue::Map(map) => {
                // Later duplicate keys win
                assert_eq!(map.get("a"), Some(&LValue::Number(3.0)));
                assert_eq!(map.len(), 2);
            }
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_aggregates_over_literal_list() {
        let scope = Scope::new();
        assert_eq!(number("count([1, 2, 3, 4, 5])", &scope), 5.0);
        assert_eq!(number("sum([1, 2, 3, 4, 5])", &scope), 15.0);
        assert_eq!(number("avg([1, 2, 3, 4, 5])", &scope), 3.0);
        assert_eq!(number("min([1, 2, 3, 4, 5])", &scope), 1.0);
        assert_eq!(number("max([1, 2, 3, 4, 5])", &scope), 5.0);
        assert_eq!(number("number([1, 2, 3, 4, 5])", &scope), 5.0);
    }

    #[test]
    fn test_aggregates_over_bound_array() {
        let mut scope = Scope::new();
        scope
            .define("prices", numbers(&[9.5, 10.5, 20.0]))
            .unwrap();
        assert_eq!(number("sum of prices", &scope), 40.0);
        assert_eq!(number("max(prices)", &scope), 20.0);
        assert!(boolean("avg of prices > 10", &scope));
    }

    #[test]
    fn test_empty_aggregate_source_is_zero() {
        let scope = Scope::new();
        for keyword in ["sum", "avg", "min", "max", "count", "number"] {
            assert_eq!(
                number(&format!("{}([])", keyword), &scope),
                0.0,
                "{} over empty",
                keyword
            );
        }
    }

    #[test]
    fn test_non_numeric_elements_contribute_zero() {
        let mut scope = Scope::new();
        scope
            .define(
                "mixed",
                LValue::Array(vec![
                    LValue::Number(3.0),
                    LValue::Null,
                    LValue::Str("seven".into()),
                    LValue::Number(4.0),
                ]),
            )
            .unwrap();
        assert_eq!(number("sum(mixed)", &scope), 7.0);
        assert_eq!(number("count(mixed)", &scope), 4.0);
        assert_eq!(number("min(mixed)", &scope), 0.0);
    }

    #[test]
    fn test_aggregate_over_non_list_fails() {
        let mut scope = Scope::new();
        scope.define("n", LValue::Number(5.0)).unwrap();
        for keyword in ["sum", "avg", "min", "max", "count", "number"] {
            let err = eval_str(&format!("{}(n)", keyword), &scope).unwrap_err();
            assert_matches::assert_matches!(
                err,
                EvalError::TypeMismatch {
                    expected: TypeKind::Array,
                    found: TypeKind::Number,
                    ..
                },
                "{} over a number",
                keyword
            );
        }
    }

    #[test]
    fn test_aggregate_over_null_fails_before_extraction() {
        let mut scope = Scope::new();
        scope.define("gone", LValue::Null).unwrap();
        let err = eval_str("sum(gone)", &scope).unwrap_err();
        assert_matches::assert_matches!(
            err,
            EvalError::TypeMismatch {
                expected: TypeKind::Array,
                found: TypeKind::Null,
                ..
            }
        );
    }

    #[test]
    fn test_aggregate_result_is_always_numeric() {
        let scope = Scope::new();
        for source in ["sum([true, false])", "count(['a', 'b'])", "max([])"] {
            assert_matches::assert_matches!(
                eval_str(source, &scope).unwrap(),
                LValue::Number(_)
            );
        }
    }

    #[test]
    fn test_date_comparison() {
        let mut scope = Scope::new();
        scope
            .define(
                "expires",
                LValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()),
            )
            .unwrap();
        scope
            .define(
                "today",
                LValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            )
            .unwrap();
        assert!(boolean("today < expires", &scope));
        assert!(boolean("expires != today", &scope));
    }

    #[test]
    fn test_error_spans_point_at_the_offender() {
        let scope = Scope::new();
        //      0123456789
        let err = eval_str("1 + missing", &scope).unwrap_err();
        assert_eq!(err.span().unwrap().start().offset, 4);
    }
}
