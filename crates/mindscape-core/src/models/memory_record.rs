//! The narrative unit (§3, §4.1). Immutable after write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// An append-only narrative observation. Never mutated once stored; a
/// superseding observation links back via `parent_id` instead (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub tenant: String,
    pub agent: String,
    /// Free-string memory type (named `record_type` in Rust since `type` is
    /// a reserved word).
    pub record_type: String,
    pub content: String,
    /// Open metadata map; may carry an overriding `timestamp` entry (§3).
    pub metadata: BTreeMap<String, Value>,
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MemoryRecord {
    /// The effective timestamp for layer classification: `metadata.timestamp`
    /// if present and well-formed, else `created_at` (§3: "metadata ...
    /// may override timestamp").
    pub fn effective_timestamp(&self) -> DateTime<Utc> {
        self.metadata
            .get("timestamp")
            .and_then(|v| v.as_str())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(self.created_at)
    }
}

/// Equality filters and budget for `NarrativeStore::retrieve` (§4.1).
#[derive(Debug, Clone, Default)]
pub struct MemoryQuery {
    pub agent: Option<String>,
    pub record_type: Option<String>,
    pub time_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub max_tokens: Option<usize>,
}
