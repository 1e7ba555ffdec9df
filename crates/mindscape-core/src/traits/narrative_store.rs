//! The append-only narrative store contract (C4, §4.1).

use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::MindscapeResult;
use crate::models::{MemoryQuery, MemoryRecord};

/// The payload of a single ingest call, before an id/timestamp is assigned.
#[derive(Debug, Clone, Default)]
pub struct MemoryInput {
    pub record_type: String,
    pub content: String,
    pub metadata: BTreeMap<String, Value>,
    pub parent_id: Option<String>,
}

#[allow(async_fn_in_trait)]
pub trait NarrativeStore: Send + Sync {
    /// Appends a new record. Never mutates or deletes an existing one;
    /// a superseding observation must go through `parent_id` instead (§4.1).
    async fn store(&self, tenant: &str, agent: &str, input: MemoryInput) -> MindscapeResult<MemoryRecord>;

    async fn retrieve(&self, tenant: &str, query: &MemoryQuery) -> MindscapeResult<Vec<MemoryRecord>>;

    /// Walks `parent_id` chains back to the root, oldest first.
    async fn get_memory_lineage(&self, tenant: &str, id: &str) -> MindscapeResult<Vec<MemoryRecord>>;
}
