//! The surprise-annotated projection of a MemoryRecord (§3, §4.9).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::layer::Layer;

/// The weighted inputs behind a single `surprise_score` (§4.9).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SurpriseComponents {
    pub novelty: f64,
    pub contradiction: f64,
    pub evidence: f64,
    pub confidence_shift: f64,
    pub disagreement: f64,
}

/// An optional externally-supplied surprise magnitude, used only as a
/// ceiling check against the internally computed score (§4.9, §9.1).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SurpriseSignal {
    pub magnitude: f64,
}

/// The adaptive projection of a `MemoryRecord`: the surprise, importance,
/// layer and compression state that the engine derives and maintains
/// going forward (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveMemory {
    pub id: String,
    pub tenant: String,
    pub agent: String,
    pub core_memory_id: String,
    pub belief_ids: Vec<String>,
    pub surprise_score: f64,
    pub surprise_components: SurpriseComponents,
    pub layer: Layer,
    pub importance: f64,
    pub usage_count: u64,
    pub last_access_ts: DateTime<Utc>,
    pub compression_level: u8,
    pub compressed_payload: Option<Vec<u8>>,
}
