//! The temporal classification and context-building contract (C5, §4.2).

use chrono::{DateTime, Utc};

use crate::errors::MindscapeResult;
use crate::models::{Layer, LayerView, MemoryRecord};

/// Layer-partitioned records ready for a `ContextSnapshot` (§4.2's
/// substitution rule: hot stays full, the rest substitute a summary or
/// sample).
#[derive(Debug, Clone, Default)]
pub struct StratifiedContext {
    pub hot: Vec<MemoryRecord>,
    pub warm: Vec<LayerView>,
    pub cold: Vec<LayerView>,
    pub frozen: Vec<LayerView>,
}

#[allow(async_fn_in_trait)]
pub trait TemporalStratifier: Send + Sync {
    /// Pure age-based classification; no I/O (§4.2's classification windows).
    fn classify(&self, effective_timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Layer;

    /// Inspects the per-(tenant, agent, layer) counters and dispatches a
    /// summarisation job if either threshold in §4.2 is crossed. Returns
    /// whether a trigger fired (idempotent if a pending marker already
    /// exists).
    async fn check_and_trigger_summarization(
        &self,
        tenant: &str,
        agent: &str,
        layer: Layer,
    ) -> MindscapeResult<bool>;

    async fn build_context(
        &self,
        tenant: &str,
        records: Vec<MemoryRecord>,
        max_tokens: usize,
    ) -> MindscapeResult<StratifiedContext>;
}
