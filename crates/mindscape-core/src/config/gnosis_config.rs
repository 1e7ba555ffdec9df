//! Tunables for the belief lifecycle, confidence tracker, and contradiction
//! index (§4.7, §4.8).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GnosisConfig {
    /// Negation cues used by the heuristic contradiction fallback when the
    /// AI provider is unavailable or returns `null` (§4.8).
    pub negation_cues: Vec<String>,
    /// Optimistic-concurrency retry budget on a belief version conflict (§7).
    pub max_conflict_retries: u32,
}

impl Default for GnosisConfig {
    fn default() -> Self {
        Self {
            negation_cues: vec![
                "not".into(),
                "never".into(),
                "no".into(),
                "false".into(),
                "incorrect".into(),
            ],
            max_conflict_retries: 5,
        }
    }
}
