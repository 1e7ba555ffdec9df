//! Belief lifecycle, confidence tracking, and contradiction indexing,
//! combined behind one trait since they share the belief id space and the
//! per-belief advisory lock (C7/C8/C9/C10, §4.7-§4.8).

use chrono::{DateTime, Utc};

use crate::errors::MindscapeResult;
use crate::models::{
    Belief, BeliefState, BeliefVersion, Confidence, ConfidencePoint, Contradiction,
    DetectionStrategy, Provenance,
};

#[allow(async_fn_in_trait)]
pub trait EpistemicStore: Send + Sync {
    /// Records a new belief in the initial `hypothesis` state (§4.7).
    async fn record_belief(
        &self,
        tenant: &str,
        claim_text: &str,
        confidence: Confidence,
        provenance: Provenance,
    ) -> MindscapeResult<Belief>;

    async fn get_belief(&self, tenant: &str, belief_id: &str) -> MindscapeResult<Belief>;

    /// Applies a lifecycle transition. Fails with `InvalidTransition` unless
    /// `(from, to)` is a member of the FSM table (§4.7).
    async fn transition(
        &self,
        tenant: &str,
        belief_id: &str,
        to: BeliefState,
        reason: Option<String>,
    ) -> MindscapeResult<BeliefVersion>;

    async fn get_belief_history(&self, tenant: &str, belief_id: &str) -> MindscapeResult<Vec<BeliefVersion>>;

    /// Reconstructs the belief as of `at`, by replaying the version chain.
    async fn snapshot_at(&self, tenant: &str, belief_id: &str, at: DateTime<Utc>) -> MindscapeResult<Belief>;

    async fn record_confidence(
        &self,
        tenant: &str,
        belief_id: &str,
        confidence: Confidence,
    ) -> MindscapeResult<ConfidencePoint>;

    async fn get_confidence_history(
        &self,
        tenant: &str,
        belief_id: &str,
    ) -> MindscapeResult<Vec<ConfidencePoint>>;

    /// AI-preferred with heuristic negation-cue fallback; indexes under a
    /// deterministic, order-independent id (§4.8, I3).
    async fn index_contradiction_if_found(
        &self,
        tenant: &str,
        belief_a: &str,
        belief_b: &str,
    ) -> MindscapeResult<Option<Contradiction>>;

    async fn record_contradiction(
        &self,
        tenant: &str,
        belief_a: &str,
        belief_b: &str,
        strategy: DetectionStrategy,
    ) -> MindscapeResult<Contradiction>;

    async fn active_contradictions(&self, tenant: &str) -> MindscapeResult<Vec<Contradiction>>;
}
