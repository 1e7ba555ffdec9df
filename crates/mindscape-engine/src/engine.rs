//! `Engine<S, A, U>` — the orchestrator (C15). Holds one instance of each
//! leaf-crate implementation and dispatches to them, mirroring the
//! teacher's `TemporalEngine` holding `Arc<WriteConnection>`/`Arc<ReadPool>`
//! and delegating to free functions per concern.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::Instant;
use tracing::{debug, warn};

use mindscape_core::config::EngineConfig;
use mindscape_core::errors::{MindscapeError, MindscapeResult};
use mindscape_core::keys;
use mindscape_core::models::{
    AdaptiveMemory, Belief, BeliefState, Claim, CompressionStats, Confidence, ContextSnapshot,
    DegradationReason, IngestOutcome, LayerView, MemoryQuery, MemoryRecord, Provenance,
    RetentionReport, SurpriseSignal, TenantConfig,
};
use mindscape_core::traits::{
    AdaptiveLayer, AiProvider, AuditSink, EpistemicStore, MemoryInput, NarrativeStore,
    StorageDriver, StorageQuery, TemporalStratifier,
};
use mindscape_gnosis::DriverEpistemicStore;
use mindscape_stratify::{AiSummariser, DriverNarrativeStore, DriverTemporalStratifier};

use crate::audit;
use crate::dispatcher::JobDispatcher;
use crate::metrics::EngineMetrics;

/// Token cost of whatever a non-hot layer actually substituted in — the
/// stored summary or the sampled records, never a re-estimate from records
/// that may have been compressed away (§4.2, §8 I5).
fn layer_view_tokens(view: &LayerView) -> usize {
    match view {
        LayerView::Full(record) => mindscape_core::token::estimate_tokens(&record.content),
        LayerView::Summarized(summary) => mindscape_core::token::estimate_tokens(summary),
        LayerView::Sampled(records) => records
            .iter()
            .map(|r| mindscape_core::token::estimate_tokens(&r.content))
            .sum(),
    }
}

/// The generic orchestrator host. `S` is the storage driver, `A` the AI
/// provider, `U` the audit sink; hosts typically instantiate
/// `Engine<MemoryStorageDriver, P, InMemoryAuditSink>` directly.
pub struct Engine<S: StorageDriver, A: AiProvider, U: AuditSink> {
    storage: Arc<S>,
    narrative: DriverNarrativeStore<S>,
    stratifier: DriverTemporalStratifier<S>,
    epistemic: DriverEpistemicStore<S, A>,
    adaptive: DriverAdaptiveLayerAlias<S, A>,
    dispatcher: JobDispatcher<S, U>,
    summariser: Arc<AiSummariser<A>>,
    atlas_config: mindscape_core::config::AtlasConfig,
    audit: Arc<U>,
}

type DriverAdaptiveLayerAlias<S, A> = mindscape_atlas::DriverAdaptiveLayer<S, AiSummariser<A>>;

impl<S: StorageDriver, A: AiProvider, U: AuditSink> Engine<S, A, U> {
    pub fn new(storage: Arc<S>, provider: Arc<A>, audit: Arc<U>, config: EngineConfig) -> Self {
        let summariser = Arc::new(AiSummariser::new(provider.clone()));
        Self {
            narrative: DriverNarrativeStore::new(storage.clone()),
            stratifier: DriverTemporalStratifier::new(storage.clone(), config.stratify),
            epistemic: DriverEpistemicStore::new(storage.clone(), provider.clone(), config.gnosis),
            adaptive: mindscape_atlas::DriverAdaptiveLayer::new(storage.clone(), summariser.clone(), config.atlas),
            dispatcher: JobDispatcher::new(storage.clone(), config.dispatcher, audit.clone()),
            summariser,
            atlas_config: config.atlas,
            storage,
            audit,
        }
    }

    pub fn dispatcher(&self) -> &JobDispatcher<S, U> {
        &self.dispatcher
    }

    /// Executes one dispatched job against this engine's own stratifier and
    /// summariser — the handler `dispatcher().run_once`/`run_worker_loop`
    /// expect (§4.14). `EvaluateRetention` jobs run `evaluate_retention` for
    /// its side effect of recording retention recommendations; `Summarize`
    /// jobs run the L1/L2/L3 windowed hierarchical summariser for the job's
    /// `agent`/`layer` payload.
    #[tracing::instrument(skip(self, job), fields(job_id = %job.id, job_type = ?job.job_type, tenant = %job.tenant))]
    pub async fn run_job(&self, job: mindscape_core::models::Job) -> MindscapeResult<()> {
        match job.job_type {
            mindscape_core::models::JobType::Summarize => {
                let agent = job
                    .payload
                    .get("agent")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| MindscapeError::InvalidInput("summarize job missing agent".into()))?;
                let layer: mindscape_core::models::Layer = job
                    .payload
                    .get("layer")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| MindscapeError::InvalidInput("summarize job missing layer".into()))?
                    .parse()
                    .map_err(MindscapeError::InvalidInput)?;
                self.stratifier
                    .run_summarization_job(self.summariser.as_ref(), &job.tenant, agent, layer, &self.atlas_config)
                    .await
            }
            mindscape_core::models::JobType::EvaluateRetention => {
                self.adaptive.evaluate_retention(&job.tenant).await.map(|_| ())
            }
        }
    }

    async fn record_claims(
        &self,
        tenant: &str,
        agent: &str,
        memory_id: &str,
        claims: &[Claim],
    ) -> MindscapeResult<(Vec<String>, Vec<DegradationReason>)> {
        let mut belief_ids = Vec::with_capacity(claims.len());
        let mut degraded = Vec::new();

        for claim in claims {
            let confidence = match claim.confidence {
                Some(confidence) => confidence,
                None => {
                    degraded.push(DegradationReason::AiUnavailableConfidence);
                    Confidence::fallback()
                }
            };
            let belief = self
                .epistemic
                .record_belief(
                    tenant,
                    &claim.text,
                    confidence,
                    Provenance {
                        source: "ingest".to_string(),
                        memory_id: memory_id.to_string(),
                        agent: agent.to_string(),
                    },
                )
                .await?;
            belief_ids.push(belief.id);
        }

        Ok((belief_ids, degraded))
    }

    /// Pairwise-indexes contradictions among the belief ids just recorded
    /// from one ingestion, returning `(contradictory_pairs, total_pairs)`
    /// for the surprise scorer's contradiction component (§4.9).
    async fn index_pairwise_contradictions(
        &self,
        tenant: &str,
        belief_ids: &[String],
    ) -> MindscapeResult<(usize, usize)> {
        if belief_ids.len() < 2 {
            return Ok((0, 0));
        }
        let mut total = 0usize;
        let mut contradictory = 0usize;
        for i in 0..belief_ids.len() {
            for j in (i + 1)..belief_ids.len() {
                total += 1;
                if self
                    .epistemic
                    .index_contradiction_if_found(tenant, &belief_ids[i], &belief_ids[j])
                    .await?
                    .is_some()
                {
                    contradictory += 1;
                }
            }
        }
        Ok((contradictory, total))
    }

    /// `agent_disagreement` (§9.1 resolution 4): the fraction of distinct
    /// agents among non-`rejected` beliefs sharing `claim_text`'s
    /// normalized key whose confidence mean differs from `confidence` by
    /// more than 0.3.
    async fn agent_disagreement(
        &self,
        tenant: &str,
        claim_text: &str,
        confidence: Confidence,
    ) -> MindscapeResult<f64> {
        let normalized = claim_text.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ");
        let values = self
            .storage
            .query(StorageQuery {
                key_prefix: keys::belief_prefix(tenant),
                time_range: None,
                limit: None,
            })
            .await?;

        let matching: Vec<Belief> = values
            .into_iter()
            .filter_map(|v| serde_json::from_value::<Belief>(v).ok())
            .filter(|b| b.state != BeliefState::Rejected)
            .filter(|b| {
                b.claim_text.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ") == normalized
            })
            .collect();

        if matching.is_empty() {
            return Ok(0.0);
        }

        let disagreeing_agents: std::collections::HashSet<String> = matching
            .iter()
            .filter(|b| (b.confidence.mean - confidence.mean).abs() > 0.3)
            .map(|b| b.provenance.agent.clone())
            .collect();
        let all_agents: std::collections::HashSet<String> =
            matching.iter().map(|b| b.provenance.agent.clone()).collect();

        Ok(disagreeing_agents.len() as f64 / all_agents.len().max(1) as f64)
    }

    /// Ingestion (§4.13): append, record claims as beliefs, score surprise,
    /// seed the adaptive projection, trigger layer checks, emit audit. Steps
    /// after the append are cancellable without losing the appended record.
    #[tracing::instrument(skip(self, input, claims, surprise_signal, deadline))]
    pub async fn store_memory(
        &self,
        tenant: &str,
        agent: &str,
        input: MemoryInput,
        claims: Vec<Claim>,
        surprise_signal: Option<SurpriseSignal>,
        deadline: Option<Instant>,
    ) -> MindscapeResult<IngestOutcome> {
        let record = mindscape_core::deadline::with_deadline(
            self.narrative.store(tenant, agent, input),
            deadline,
        )
        .await?;

        let claims_outcome = mindscape_core::deadline::with_deadline(
            self.record_claims(tenant, agent, &record.id, &claims),
            deadline,
        )
        .await;

        let (belief_ids, degraded) = match claims_outcome {
            Ok(result) => result,
            Err(MindscapeError::Cancelled) => {
                warn!(tenant, memory_id = %record.id, "belief recording cancelled mid-ingest");
                let degraded = vec![DegradationReason::BeliefRecordingCancelled];
                audit::emit(
                    self.audit.as_ref(),
                    tenant,
                    "engine",
                    "store_memory_cancelled",
                    serde_json::json!({ "memory_id": record.id.clone() }),
                )
                .await?;
                return Ok(IngestOutcome {
                    memory_id: record.id,
                    adaptive_id: None,
                    belief_ids: Vec::new(),
                    surprise_score: None,
                    degraded,
                });
            }
            Err(err) => return Err(err),
        };

        let (contradictory_claims, total_claims) =
            self.index_pairwise_contradictions(tenant, &belief_ids).await?;

        let mut disagreement = 0.0;
        for claim in &claims {
            if let Some(confidence) = claim.confidence {
                disagreement += self.agent_disagreement(tenant, &claim.text, confidence).await?;
            }
        }
        if !claims.is_empty() {
            disagreement /= claims.len() as f64;
        }

        // confidence_shift is 0.0 at ingestion: a freshly recorded belief has
        // no prior confidence to shift from. It becomes meaningful once a
        // belief is re-recorded via `record_confidence`, which callers run
        // through `update_belief` rather than `store_memory`.
        let (surprise_score, components) = self
            .adaptive
            .score_surprise(
                tenant,
                agent,
                &record.id,
                &record.content,
                contradictory_claims,
                total_claims,
                0.0,
                disagreement,
                surprise_signal,
            )
            .await?;

        let adaptive = mindscape_core::deadline::with_deadline(
            self.adaptive.seed_adaptive_memory(
                tenant,
                agent,
                &record.id,
                belief_ids.clone(),
                surprise_score,
                components,
            ),
            deadline,
        )
        .await?;

        let layer = self.stratifier.classify(record.effective_timestamp(), Utc::now());
        self.stratifier.check_and_trigger_summarization(tenant, agent, layer).await?;

        debug!(tenant, memory_id = %record.id, adaptive_id = %adaptive.id, surprise_score, "memory ingested");

        audit::emit(
            self.audit.as_ref(),
            tenant,
            "engine",
            "store_memory",
            serde_json::json!({
                "memory_id": record.id.clone(),
                "adaptive_id": adaptive.id.clone(),
                "surprise_score": surprise_score,
            }),
        )
        .await?;

        Ok(IngestOutcome {
            memory_id: record.id,
            adaptive_id: Some(adaptive.id),
            belief_ids,
            surprise_score: Some(surprise_score),
            degraded,
        })
    }

    /// Context assembly (§4.13): layered narrative + epistemic snapshot +
    /// active contradictions, reranked under budget, with retention
    /// recommendations and the high-surprise list attached.
    #[tracing::instrument(skip(self, query_context, deadline))]
    pub async fn build_context(
        &self,
        tenant: &str,
        agent: &str,
        max_tokens: usize,
        query_context: &str,
        deadline: Option<Instant>,
    ) -> MindscapeResult<ContextSnapshot> {
        let records = mindscape_core::deadline::with_deadline(
            self.narrative.retrieve(tenant, &MemoryQuery { agent: Some(agent.to_string()), ..Default::default() }),
            deadline,
        )
        .await?;

        let stratified = self.stratifier.build_context(tenant, records, max_tokens).await?;

        let belief_values = self
            .storage
            .query(StorageQuery { key_prefix: keys::belief_prefix(tenant), time_range: None, limit: None })
            .await?;
        let beliefs: Vec<Belief> = belief_values.into_iter().filter_map(|v| serde_json::from_value(v).ok()).collect();

        let active_contradictions = self.epistemic.active_contradictions(tenant).await?;
        let retention = self.adaptive.evaluate_retention(tenant).await?;

        let adaptive_values = self
            .storage
            .query(StorageQuery { key_prefix: keys::adaptive_memory_prefix(tenant), time_range: None, limit: None })
            .await?;
        let mut adaptive_memories: Vec<AdaptiveMemory> =
            adaptive_values.into_iter().filter_map(|v| serde_json::from_value(v).ok()).collect();

        let config = self.adaptive.get_config(tenant).await?;
        let reranked = self
            .adaptive
            .rerank_by_importance(tenant, adaptive_memories.clone(), max_tokens, query_context, config.diversity_factor)
            .await?;

        adaptive_memories.sort_by(|a, b| b.surprise_score.partial_cmp(&a.surprise_score).unwrap_or(std::cmp::Ordering::Equal));
        let high_surprise: Vec<AdaptiveMemory> =
            adaptive_memories.into_iter().filter(|m| m.surprise_score >= 0.7).take(10).collect();

        let mut compression_stats = CompressionStats::default();
        for memory in &reranked {
            compression_stats.records_by_level[memory.compression_level as usize] += 1;
        }

        let estimated_tokens = stratified
            .hot
            .iter()
            .map(|r| mindscape_core::token::estimate_tokens(&r.content))
            .sum::<usize>()
            + stratified.warm.iter().map(layer_view_tokens).sum::<usize>()
            + stratified.cold.iter().map(layer_view_tokens).sum::<usize>()
            + stratified.frozen.iter().map(layer_view_tokens).sum::<usize>();

        Ok(ContextSnapshot {
            hot: stratified.hot,
            warm: stratified.warm,
            cold: stratified.cold,
            frozen: stratified.frozen,
            beliefs,
            active_contradictions,
            retention,
            high_surprise,
            compression_stats,
            estimated_tokens,
        })
    }

    pub async fn query(&self, tenant: &str, query: MemoryQuery) -> MindscapeResult<Vec<MemoryRecord>> {
        self.narrative.retrieve(tenant, &query).await
    }

    pub async fn update_belief(
        &self,
        tenant: &str,
        belief_id: &str,
        to: BeliefState,
        reason: Option<String>,
    ) -> MindscapeResult<()> {
        let version = self.epistemic.transition(tenant, belief_id, to, reason).await?;
        audit::emit(
            self.audit.as_ref(),
            tenant,
            "engine",
            "update_belief",
            serde_json::json!({ "belief_id": belief_id, "version": version.version, "to": to.as_str() }),
        )
        .await
    }

    pub async fn record_memory_usage(&self, tenant: &str, adaptive_id: &str, utility: f64) -> MindscapeResult<AdaptiveMemory> {
        self.adaptive.record_usage(tenant, adaptive_id, utility).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn evaluate_retention(&self, tenant: &str) -> MindscapeResult<RetentionReport> {
        self.adaptive.evaluate_retention(tenant).await
    }

    /// §4.13/S5: compress an adaptive memory's payload to its surprise-
    /// assigned level, driven directly rather than only through
    /// `evaluate_retention`'s recommendations.
    pub async fn compress(&self, tenant: &str, adaptive_id: &str) -> MindscapeResult<AdaptiveMemory> {
        self.adaptive.compress(tenant, adaptive_id).await
    }

    /// §4.13: promote an adaptive memory one layer toward hot, driven
    /// directly rather than only through `evaluate_retention`'s
    /// recommendations.
    pub async fn promote(&self, tenant: &str, adaptive_id: &str) -> MindscapeResult<AdaptiveMemory> {
        self.adaptive.promote(tenant, adaptive_id).await
    }

    pub async fn configure_adaptive(&self, tenant: &str, config: TenantConfig) -> MindscapeResult<()> {
        self.adaptive.configure(tenant, config).await
    }

    pub async fn get_memory_lineage(&self, tenant: &str, id: &str) -> MindscapeResult<Vec<MemoryRecord>> {
        self.narrative.get_memory_lineage(tenant, id).await
    }

    pub async fn get_metrics(&self, tenant: &str) -> MindscapeResult<EngineMetrics> {
        EngineMetrics::collect(self.storage.as_ref(), tenant).await
    }
}
