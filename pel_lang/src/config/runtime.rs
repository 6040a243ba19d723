// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalPreferences {
    /// Whether to retain comment tokens in the produced stream
    /// (they are never significant for parsing either way)
    pub retain_comment_tokens: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            retain_comment_tokens: env::var("PEL_LEXICAL_RETAIN_COMMENTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelinePreferences {
    /// Whether pipeline results carry per-stage durations
    pub collect_stage_timings: bool,
}

impl Default for PipelinePreferences {
    fn default() -> Self {
        Self {
            collect_stage_timings: env::var("PEL_PIPELINE_STAGE_TIMINGS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexical_preferences_defaults() {
        let prefs = LexicalPreferences::default();
        // Defaults hold unless the env var is set in the test environment
        if env::var("PEL_LEXICAL_RETAIN_COMMENTS").is_err() {
            assert!(prefs.retain_comment_tokens);
        }
    }

    #[test]
    fn test_pipeline_preferences_serialize() {
        let prefs = PipelinePreferences::default();
        let json = serde_json::to_string(&prefs).unwrap();
        assert!(json.contains("collect_stage_timings"));
    }
}
