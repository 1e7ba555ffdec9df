//! The hierarchical summary builder contract (C6, §4.3).

use crate::errors::MindscapeResult;
use crate::models::MemoryRecord;

#[allow(async_fn_in_trait)]
pub trait Summariser: Send + Sync {
    /// Summarises a timestamp-ordered chunk at `target_ratio`, preserving
    /// intent, contradictions, rejected ideas, and key decisions (§4.3).
    /// Idempotent: repeated calls over the same member-id set hit the
    /// per-process summary cache.
    async fn summarize_chunk(
        &self,
        tenant: &str,
        records: &[MemoryRecord],
        target_ratio: f64,
    ) -> MindscapeResult<String>;

    /// Delta mode: focuses on evidence new since `previous_summary`.
    async fn summarize_delta(
        &self,
        tenant: &str,
        records: &[MemoryRecord],
        previous_summary: &str,
        target_ratio: f64,
    ) -> MindscapeResult<String>;
}
