//! Classification windows, summarisation triggers, and context token split
//! for the temporal stratifier (§4.2).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct StratifyConfig {
    /// Age ceilings in seconds: records older than `cold_max_age_secs` are
    /// `frozen`.
    pub hot_max_age_secs: i64,
    pub warm_max_age_secs: i64,
    pub cold_max_age_secs: i64,

    /// Per-layer record count that triggers summarisation.
    pub hot_count_threshold: u64,
    pub warm_count_threshold: u64,
    pub cold_count_threshold: u64,

    /// Per-layer elapsed time since last summary that triggers summarisation.
    pub hot_interval_secs: i64,
    pub warm_interval_secs: i64,
    pub cold_interval_secs: i64,

    /// Token-budget split across hot/warm/cold/frozen when building context;
    /// must sum to 1.0.
    pub context_token_split: [f64; 4],

    /// Fallback sample size when no stored summary exists for a layer.
    pub sample_fallback_size: usize,
}

impl Default for StratifyConfig {
    fn default() -> Self {
        Self {
            hot_max_age_secs: 86_400,
            warm_max_age_secs: 604_800,
            cold_max_age_secs: 2_592_000,
            hot_count_threshold: 50,
            warm_count_threshold: 100,
            cold_count_threshold: 200,
            hot_interval_secs: 3_600,
            warm_interval_secs: 86_400,
            cold_interval_secs: 604_800,
            context_token_split: [0.50, 0.30, 0.15, 0.05],
            sample_fallback_size: 5,
        }
    }
}
