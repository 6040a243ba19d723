//! End-to-end expression processing
//!
//! Staged composition of the core (lexical -> syntax -> evaluation) with
//! per-stage error conversion and optional stage timings. Nothing here
//! logs or prints; reporting belongs to the embedding host.

mod error;
mod result;

pub use error::PipelineError;
pub use result::{PipelineResult, StageTimings};

use std::time::Instant;

use crate::config::runtime::PipelinePreferences;
use crate::grammar::ast::Expr;
use crate::lexical;
use crate::plugins::PluginRegistry;
use crate::runtime::{evaluate, Scope};
use crate::syntax;

/// Tokenize and parse one expression
pub fn parse_str(source: &str, registry: &PluginRegistry) -> Result<Expr, PipelineError> {
    let stream = lexical::tokenize(source)?;
    Ok(syntax::parse(stream, registry)?)
}

/// Tokenize, parse, and evaluate one expression against `scope`
pub fn run_str(
    source: &str,
    registry: &PluginRegistry,
    scope: &Scope,
) -> Result<PipelineResult, PipelineError> {
    run_str_with_preferences(source, registry, scope, &PipelinePreferences::default())
}

/// `run_str` with explicit pipeline preferences
pub fn run_str_with_preferences(
    source: &str,
    registry: &PluginRegistry,
    scope: &Scope,
    preferences: &PipelinePreferences,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    // Stage 1: lexical analysis
    let lexical_start = Instant::now();
    let stream = lexical::tokenize(source)?;
    let token_count = stream.significant_len();
    let lexical_elapsed = lexical_start.elapsed();

    // Stage 2: syntax analysis
    let syntax_start = Instant::now();
    let expr = syntax::parse(stream, registry)?;
    let syntax_elapsed = syntax_start.elapsed();

    // Stage 3: evaluation
    let eval_start = Instant::now();
    let value = evaluate(&expr, scope)?;
    let eval_elapsed = eval_start.elapsed();

    let stage_timings = preferences.collect_stage_timings.then(|| StageTimings {
        lexical: lexical_elapsed,
        syntax: syntax_elapsed,
        evaluation: eval_elapsed,
    });

    Ok(PipelineResult {
        expr,
        value,
        token_count,
        processing_duration: start_time.elapsed(),
        stage_timings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::default_registry;
    use crate::runtime::EvalError;
    use crate::syntax::ParseError;
    use crate::types::LValue;

    fn run(source: &str, scope: &Scope) -> Result<LValue, PipelineError> {
        let registry = default_registry().unwrap();
        run_str(source, &registry, scope).map(|result| result.value)
    }

    fn scope_with_numbers(name: &str, values: &[f64]) -> Scope {
        let mut scope = Scope::new();
        scope
            .define(
                name,
                LValue::Array(values.iter().copied().map(LValue::Number).collect()),
            )
            .unwrap();
        scope
    }

    #[test]
    fn test_aggregate_table() {
        let scope = Scope::new();
        let expectations = [
            ("count([1, 2, 3, 4, 5])", 5.0),
            ("sum([1, 2, 3, 4, 5])", 15.0),
            ("avg([1, 2, 3, 4, 5])", 3.0),
            ("min([1, 2, 3, 4, 5])", 1.0),
            ("max([1, 2, 3, 4, 5])", 5.0),
            ("number([1, 2, 3, 4, 5])", 5.0),
        ];
        for (source, expected) in expectations {
            assert_eq!(
                run(source, &scope).unwrap(),
                LValue::Number(expected),
                "{}",
                source
            );
        }
    }

    #[test]
    fn test_form_equivalence_for_every_keyword() {
        let scope = scope_with_numbers("xs", &[2.0, 4.0, 6.0]);
        for keyword in ["sum", "avg", "min", "max", "count", "number"] {
            let paren = run(&format!("{}(xs)", keyword), &scope).unwrap();
            let of = run(&format!("{} of xs", keyword), &scope).unwrap();
            assert_eq!(paren, of, "form mismatch for {}", keyword);
        }
    }

    #[test]
    fn test_case_insensitive_dispatch_end_to_end() {
        let scope = scope_with_numbers("numbers", &[7.0, 3.0, 9.0]);
        assert_eq!(
            run("Min(numbers)", &scope).unwrap(),
            run("min(numbers)", &scope).unwrap()
        );
        assert_eq!(run("MIN of numbers", &scope).unwrap(), LValue::Number(3.0));
    }

    #[test]
    fn test_aliases_match_canonical_results() {
        let scope = scope_with_numbers("xs", &[1.0, 2.0, 3.0]);
        assert_eq!(
            run("total(xs)", &scope).unwrap(),
            run("sum(xs)", &scope).unwrap()
        );
        assert_eq!(
            run("average of xs", &scope).unwrap(),
            run("avg of xs", &scope).unwrap()
        );
    }

    #[test]
    fn test_aggregate_over_literal_fails() {
        let scope = Scope::new();
        let err = run("sum(5)", &scope).unwrap_err();
        assert_matches::assert_matches!(
            err,
            PipelineError::Evaluation(EvalError::TypeMismatch { .. })
        );
    }

    #[test]
    fn test_policy_expression_end_to_end() {
        let scope = scope_with_numbers("prices", &[40.0, 50.0, 60.0]);
        assert_eq!(
            run("sum of prices > 100 && count(prices) >= 3", &scope).unwrap(),
            LValue::Bool(true)
        );
    }

    #[test]
    fn test_errors_carry_stage_and_span() {
        let registry = default_registry().unwrap();
        let scope = Scope::new();

        let err = run_str("1 ~ 2", &registry, &scope).unwrap_err();
        assert_matches::assert_matches!(err, PipelineError::LexicalAnalysis(_));
        assert!(err.span().is_some());

        let err = run_str("1 +", &registry, &scope).unwrap_err();
        assert_matches::assert_matches!(err, PipelineError::SyntaxAnalysis(_));

        let err = run_str("missing", &registry, &scope).unwrap_err();
        assert_matches::assert_matches!(err, PipelineError::Evaluation(_));
        assert_eq!(err.span().unwrap().start().offset, 0);
    }

    #[test]
    fn test_parse_str_yields_ast_without_evaluating() {
        let registry = default_registry().unwrap();
        // 'missing' is unbound; parsing alone must succeed
        let expr = parse_str("sum(missing) * 2", &registry).unwrap();
        assert_matches::assert_matches!(expr, Expr::Binary { .. });

        let err = parse_str("1 2", &registry).unwrap_err();
        assert_matches::assert_matches!(
            err,
            PipelineError::SyntaxAnalysis(ParseError::TrailingInput { .. })
        );
    }

    #[test]
    fn test_stage_timings_follow_preferences() {
        let registry = default_registry().unwrap();
        let scope = Scope::new();

        let collected = run_str_with_preferences(
            "1 + 1",
            &registry,
            &scope,
            &PipelinePreferences {
                collect_stage_timings: true,
            },
        )
        .unwrap();
        let timings = collected.stage_timings.unwrap();
        assert!(collected.processing_duration >= timings.total());
        assert_eq!(collected.token_count, 4); // 1, +, 1, eof

        let skipped = run_str_with_preferences(
            "1 + 1",
            &registry,
            &scope,
            &PipelinePreferences {
                collect_stage_timings: false,
            },
        )
        .unwrap();
        assert!(skipped.stage_timings.is_none());
        assert_eq!(skipped.value, LValue::Number(2.0));
    }
}
