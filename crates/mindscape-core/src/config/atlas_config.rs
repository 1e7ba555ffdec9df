//! Tunables for the MDL scorer and hierarchical compressor (§4.4, §4.11).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Clamp bounds for the MDL target compression ratio.
    pub mdl_min_ratio: f64,
    pub mdl_max_ratio: f64,

    /// Approximate chunk sizes (record counts) for summary levels L1-L3.
    pub chunk_size_l1: usize,
    pub chunk_size_l2: usize,
    pub chunk_size_l3: usize,

    /// Surprise-score lower bounds mapping to compression levels 0-3; scores
    /// below all of these fall to level 4 (§4.11).
    pub surprise_level_thresholds: [f64; 4],

    /// Usage-feedback learning rate `η` in `I_new = (1-η)*I_old + η*utility`.
    pub usage_feedback_eta: f64,

    /// `N` in novelty's "last N memories of the same agent" (§4.9).
    pub novelty_recent_window: usize,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            mdl_min_ratio: 0.2,
            mdl_max_ratio: 0.8,
            chunk_size_l1: 15,
            chunk_size_l2: 75,
            chunk_size_l3: 300,
            surprise_level_thresholds: [0.7, 0.5, 0.3, 0.1],
            usage_feedback_eta: 0.2,
            novelty_recent_window: 20,
        }
    }
}
