//! Surprise scoring, ATLAS priority, hierarchical compression, and retention
//! recommendation, combined behind one trait since they operate on the same
//! `AdaptiveMemory` projection (C11/C12/C13/C14, §4.9-§4.12).

use crate::errors::MindscapeResult;
use crate::models::{AdaptiveMemory, RetentionReport, SurpriseComponents, SurpriseSignal, TenantConfig};

#[allow(async_fn_in_trait)]
pub trait AdaptiveLayer: Send + Sync {
    /// Computes the surprise score and its components for a freshly
    /// ingested record (§4.9). `external` acts only as a ceiling check;
    /// internal components are always computed.
    #[allow(clippy::too_many_arguments)]
    async fn score_surprise(
        &self,
        tenant: &str,
        agent: &str,
        core_memory_id: &str,
        content: &str,
        contradictory_claims: usize,
        total_claims: usize,
        confidence_shift: f64,
        disagreement: f64,
        external: Option<SurpriseSignal>,
    ) -> MindscapeResult<(f64, SurpriseComponents)>;

    /// Writes the initial `AdaptiveMemory` projection for a record, seeding
    /// importance from the just-computed surprise (§4.13 step 5).
    #[allow(clippy::too_many_arguments)]
    async fn seed_adaptive_memory(
        &self,
        tenant: &str,
        agent: &str,
        core_memory_id: &str,
        belief_ids: Vec<String>,
        surprise_score: f64,
        components: SurpriseComponents,
    ) -> MindscapeResult<AdaptiveMemory>;

    async fn get_adaptive_memory(&self, tenant: &str, id: &str) -> MindscapeResult<AdaptiveMemory>;

    /// Usage feedback: `I_new = (1-eta)*I_old + eta*utility` (§4.10).
    async fn record_usage(&self, tenant: &str, id: &str, utility: f64) -> MindscapeResult<AdaptiveMemory>;

    /// Greedy MMR-style rerank under a token budget (§4.10).
    async fn rerank_by_importance(
        &self,
        tenant: &str,
        candidates: Vec<AdaptiveMemory>,
        token_budget: usize,
        query_context: &str,
        diversity_factor: f64,
    ) -> MindscapeResult<Vec<AdaptiveMemory>>;

    /// Imperative compression to (at least) the level implied by the
    /// memory's current surprise bucket (§4.11, §9.1 — never automatic).
    async fn compress(&self, tenant: &str, id: &str) -> MindscapeResult<AdaptiveMemory>;

    /// Imperative promotion out of its current layer (§9.1 — never automatic).
    async fn promote(&self, tenant: &str, id: &str) -> MindscapeResult<AdaptiveMemory>;

    /// Pure recommendation pass; never mutates layer or content (§4.12).
    async fn evaluate_retention(&self, tenant: &str) -> MindscapeResult<RetentionReport>;

    async fn get_config(&self, tenant: &str) -> MindscapeResult<TenantConfig>;

    async fn configure(&self, tenant: &str, config: TenantConfig) -> MindscapeResult<()>;
}
