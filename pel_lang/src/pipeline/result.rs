use std::time::Duration;

use crate::grammar::ast::Expr;
use crate::types::LValue;

/// Per-stage wall-clock durations, collected when the pipeline
/// preferences ask for them
#[derive(Debug, Clone, Copy, Default)]
pub struct StageTimings {
    pub lexical: Duration,
    pub syntax: Duration,
    pub evaluation: Duration,
}

impl StageTimings {
    pub fn total(&self) -> Duration {
        self.lexical + self.syntax + self.evaluation
    }
}

/// Complete result of running one expression end to end
#[derive(Debug)]
pub struct PipelineResult {
    pub expr: Expr,
    pub value: LValue,
    pub token_count: usize,
    pub processing_duration: Duration,
    pub stage_timings: Option<StageTimings>,
}

impl PipelineResult {
    /// Tokens processed per second over the whole run
    pub fn processing_rate(&self) -> f64 {
        let seconds = self.processing_duration.as_secs_f64();
        if seconds > 0.0 {
            self.token_count as f64 / seconds
        } else {
            0.0
        }
    }
}
