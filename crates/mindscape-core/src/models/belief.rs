//! The epistemic unit and its lifecycle state machine (§3, §4.7).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::claim::Confidence;

/// The five-state belief lifecycle (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeliefState {
    Hypothesis,
    Accepted,
    Contested,
    Deprecated,
    Rejected,
}

impl BeliefState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BeliefState::Hypothesis => "hypothesis",
            BeliefState::Accepted => "accepted",
            BeliefState::Contested => "contested",
            BeliefState::Deprecated => "deprecated",
            BeliefState::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for BeliefState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who/what a belief's claim originated from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    pub source: String,
    pub memory_id: String,
    pub agent: String,
}

/// A belief: the epistemic projection of a claim (§3).
///
/// `version` always equals the number of `BeliefVersion` records for this
/// belief (invariant 2, §3). The version chain itself is stored separately
/// (one immutable record per transition) and fetched via `EpistemicStore`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Belief {
    pub id: String,
    pub tenant: String,
    pub claim_text: String,
    pub confidence: Confidence,
    pub state: BeliefState,
    pub provenance: Provenance,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An immutable snapshot of one lifecycle transition (§3, §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeliefVersion {
    pub version_id: String,
    pub belief_id: String,
    pub version: u64,
    pub state: BeliefState,
    pub previous_state: Option<BeliefState>,
    pub confidence: Confidence,
    pub transition_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}
