//! Per-pair contradiction records (§3, §4.8).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a contradiction was identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStrategy {
    Ai,
    HeuristicNegationCue,
}

/// A detected contradiction between two beliefs, indexed by a deterministic,
/// order-independent id so re-detection is idempotent (§4.8, I3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contradiction {
    pub id: String,
    pub tenant: String,
    pub belief_id_a: String,
    pub belief_id_b: String,
    pub strategy: DetectionStrategy,
    pub detected_at: DateTime<Utc>,
}
