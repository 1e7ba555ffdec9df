//! A single confidence reading on the belief's history timeline (§3, §4.8).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::claim::Confidence;

/// One entry in a belief's confidence history, keyed by
/// `confidence:{tenant}:{belief_id}:{ts}` (§5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidencePoint {
    pub belief_id: String,
    pub confidence: Confidence,
    pub timestamp: DateTime<Utc>,
}
