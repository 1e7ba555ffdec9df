//! Audit emission payload shapes (§4.15).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of reasons a call degraded instead of failing outright (§7, §8 S6).
///
/// `Display` renders the snake_case strings scenario tests match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradationReason {
    AiUnavailableConfidence,
    AiUnavailableContradiction,
    AiUnavailableSummary,
    BeliefRecordingCancelled,
    StorageRetrySucceeded,
}

impl DegradationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DegradationReason::AiUnavailableConfidence => "ai_unavailable_confidence",
            DegradationReason::AiUnavailableContradiction => "ai_unavailable_contradiction",
            DegradationReason::AiUnavailableSummary => "ai_unavailable_summary",
            DegradationReason::BeliefRecordingCancelled => "belief_recording_cancelled",
            DegradationReason::StorageRetrySucceeded => "storage_retry_succeeded",
        }
    }
}

impl std::fmt::Display for DegradationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{component, timestamp}` attached to every audit entry (§4.15).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditMeta {
    pub component: String,
    pub timestamp: DateTime<Utc>,
}

/// The payload `AuditSink::record` receives. Carries no hash or sequence —
/// the sink owns chaining (§3.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub tenant: String,
    pub action: String,
    pub data: serde_json::Value,
    pub meta: AuditMeta,
}
