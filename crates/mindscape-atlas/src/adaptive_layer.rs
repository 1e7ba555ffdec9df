//! `AdaptiveLayer` backed by any `StorageDriver` + `Summariser`, combining
//! surprise scoring (C11), priority (C12), compression (C13), and retention
//! (C14) behind one per-tenant configuration (§4.9-§4.12).

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use mindscape_core::config::AtlasConfig;
use mindscape_core::errors::{AtlasError, MindscapeResult};
use mindscape_core::keys;
use mindscape_core::models::{
    AdaptiveMemory, Layer, MemoryRecord, RetentionReport, SurpriseComponents, SurpriseSignal,
    TenantConfig,
};
use mindscape_core::traits::{AdaptiveLayer, StorageDriver, StorageMeta, StorageQuery, Summariser};

use crate::compression::{compress_one, level_for_surprise};
use crate::priority::{candidate_token_cost, importance, rerank_by_importance, token_overlap_relevance, update_from_usage, RerankCandidate};
use crate::retention::{evaluate_one, RetentionComponents};
use crate::surprise::{combine, final_score, novelty_from_similarities};

fn tenant_config_key(tenant: &str) -> String {
    keys::adaptive_config(tenant, "full")
}

/// `AdaptiveLayer` over any `StorageDriver` + `Summariser`. The tenant's
/// `TenantConfig` is stored as a single JSON blob under one key rather than
/// per-field, since it is read in full on every scoring/rerank call.
pub struct DriverAdaptiveLayer<D: StorageDriver, S: Summariser> {
    driver: Arc<D>,
    summariser: Arc<S>,
    atlas_config: AtlasConfig,
}

impl<D: StorageDriver, S: Summariser> DriverAdaptiveLayer<D, S> {
    pub fn new(driver: Arc<D>, summariser: Arc<S>, atlas_config: AtlasConfig) -> Self {
        Self {
            driver,
            summariser,
            atlas_config,
        }
    }

    async fn write_memory(&self, tenant: &str, memory: &AdaptiveMemory) -> MindscapeResult<()> {
        let key = keys::adaptive_memory(tenant, &memory.id);
        self.driver
            .write(&key, serde_json::to_value(memory)?, StorageMeta::new(tenant, "adaptive_memory"))
            .await
    }

    async fn read_memory(&self, tenant: &str, id: &str) -> MindscapeResult<AdaptiveMemory> {
        let key = keys::adaptive_memory(tenant, id);
        let value = self
            .driver
            .read(&key)
            .await?
            .ok_or_else(|| AtlasError::AdaptiveMemoryNotFound { id: id.to_string() })?;
        Ok(serde_json::from_value(value)?)
    }

    async fn age_days(&self, memory: &AdaptiveMemory) -> i64 {
        (Utc::now() - memory.last_access_ts).num_days().max(0)
    }

    /// `1 - max token-overlap similarity` against the agent's last
    /// `novelty_recent_window` memories, excluding the one just ingested
    /// (§4.9). An agent's first memory has nothing to compare against and
    /// is maximally novel.
    async fn novelty_against_recent(
        &self,
        tenant: &str,
        agent: &str,
        core_memory_id: &str,
        content: &str,
    ) -> MindscapeResult<f64> {
        let values = self
            .driver
            .query(StorageQuery {
                key_prefix: keys::memory_prefix(tenant),
                time_range: None,
                limit: None,
            })
            .await?;

        let mut recent: Vec<MemoryRecord> = values
            .into_iter()
            .filter_map(|v| serde_json::from_value::<MemoryRecord>(v).ok())
            .filter(|r| r.agent == agent && r.id != core_memory_id)
            .collect();
        recent.sort_by_key(|r| std::cmp::Reverse(r.created_at));

        let similarities: Vec<f64> = recent
            .into_iter()
            .take(self.atlas_config.novelty_recent_window)
            .map(|r| token_overlap_relevance(content, &r.content))
            .collect();
        Ok(novelty_from_similarities(&similarities))
    }
}

impl<D: StorageDriver, S: Summariser> AdaptiveLayer for DriverAdaptiveLayer<D, S> {
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
    ) -> MindscapeResult<(f64, SurpriseComponents)> {
        let contradiction = if total_claims == 0 {
            0.0
        } else {
            (contradictory_claims as f64 / total_claims as f64).clamp(0.0, 1.0)
        };
        let evidence = if content.trim().is_empty() { 0.0 } else { 0.5 };
        let novelty = self.novelty_against_recent(tenant, agent, core_memory_id, content).await?;
        let components = SurpriseComponents {
            novelty,
            contradiction,
            evidence,
            confidence_shift: confidence_shift.clamp(0.0, 1.0),
            disagreement: disagreement.clamp(0.0, 1.0),
        };

        let config = self.get_config(tenant).await?;
        let internal = combine(components, config.surprise_weights);
        let score = final_score(internal, external);
        Ok((score, components))
    }

    async fn seed_adaptive_memory(
        &self,
        tenant: &str,
        agent: &str,
        core_memory_id: &str,
        belief_ids: Vec<String>,
        surprise_score: f64,
        components: SurpriseComponents,
    ) -> MindscapeResult<AdaptiveMemory> {
        let memory = AdaptiveMemory {
            id: uuid::Uuid::new_v4().to_string(),
            tenant: tenant.to_string(),
            agent: agent.to_string(),
            core_memory_id: core_memory_id.to_string(),
            belief_ids,
            surprise_score,
            surprise_components: components,
            layer: Layer::Hot,
            importance: surprise_score,
            usage_count: 0,
            last_access_ts: Utc::now(),
            compression_level: 0,
            compressed_payload: None,
        };
        self.write_memory(tenant, &memory).await?;
        Ok(memory)
    }

    async fn get_adaptive_memory(&self, tenant: &str, id: &str) -> MindscapeResult<AdaptiveMemory> {
        self.read_memory(tenant, id).await
    }

    async fn record_usage(&self, tenant: &str, id: &str, utility: f64) -> MindscapeResult<AdaptiveMemory> {
        let mut memory = self.read_memory(tenant, id).await?;
        memory.usage_count += 1;
        memory.last_access_ts = Utc::now();
        memory.importance = update_from_usage(memory.importance, utility, self.atlas_config.usage_feedback_eta);
        self.write_memory(tenant, &memory).await?;
        Ok(memory)
    }

    async fn rerank_by_importance(
        &self,
        _tenant: &str,
        candidates: Vec<AdaptiveMemory>,
        token_budget: usize,
        query_context: &str,
        diversity_factor: f64,
    ) -> MindscapeResult<Vec<AdaptiveMemory>> {
        let by_id: std::collections::HashMap<String, AdaptiveMemory> =
            candidates.iter().map(|c| (c.id.clone(), c.clone())).collect();

        let rerank_candidates: Vec<RerankCandidate> = candidates
            .into_iter()
            .map(|c| {
                let content = c
                    .compressed_payload
                    .as_ref()
                    .map(|p| crate::compression::decompress(p).unwrap_or_default())
                    .unwrap_or_else(|| c.belief_ids.join(" "));
                let relevance_boost = importance(
                    crate::priority::token_overlap_relevance(&content, query_context),
                    1.0,
                    c.surprise_score,
                    1.0,
                    1.0,
                    Default::default(),
                );
                RerankCandidate {
                    id: c.id.clone(),
                    importance: (c.importance + relevance_boost) / 2.0,
                    token_cost: candidate_token_cost(&content),
                    content,
                }
            })
            .collect();

        let picked = rerank_by_importance(rerank_candidates, token_budget, diversity_factor);
        Ok(picked
            .into_iter()
            .filter_map(|c| by_id.get(&c.id).cloned())
            .collect())
    }

    async fn compress(&self, tenant: &str, id: &str) -> MindscapeResult<AdaptiveMemory> {
        let mut memory = self.read_memory(tenant, id).await?;
        let level = level_for_surprise(memory.surprise_score, self.atlas_config.surprise_level_thresholds);
        let content = memory.belief_ids.join(" ");
        let config = self.get_config(tenant).await?;
        compress_one(
            self.summariser.as_ref(),
            tenant,
            &mut memory,
            &content,
            level,
            &config.compression_strategy,
        )
        .await?;
        self.write_memory(tenant, &memory).await?;
        Ok(memory)
    }

    async fn promote(&self, tenant: &str, id: &str) -> MindscapeResult<AdaptiveMemory> {
        let mut memory = self.read_memory(tenant, id).await?;
        memory.layer = match memory.layer {
            Layer::Frozen => Layer::Cold,
            Layer::Cold => Layer::Warm,
            Layer::Warm | Layer::Hot => Layer::Hot,
        };
        self.write_memory(tenant, &memory).await?;
        Ok(memory)
    }

    async fn evaluate_retention(&self, tenant: &str) -> MindscapeResult<RetentionReport> {
        let values = self
            .driver
            .query(StorageQuery {
                key_prefix: keys::adaptive_memory_prefix(tenant),
                time_range: None,
                limit: None,
            })
            .await?;
        let config = self.get_config(tenant).await?;
        let mut report = RetentionReport::default();

        for value in values {
            let memory: AdaptiveMemory = serde_json::from_value(value)?;
            let age_days = self.age_days(&memory).await;
            let components = RetentionComponents {
                surprise: memory.surprise_score,
                contradiction_involvement: if memory.belief_ids.is_empty() { 0.0 } else { 0.5 },
                temporal_decay: crate::retention::temporal_decay_from_age(age_days as f64),
                evidence_strength: 0.5,
                usage: crate::priority::usage_factor(memory.usage_count, config.priority_weights.usage_saturation),
            };
            evaluate_one(&memory, components, age_days, &config.retention_policy, &mut report);
        }

        Ok(report)
    }

    async fn get_config(&self, tenant: &str) -> MindscapeResult<TenantConfig> {
        let key = tenant_config_key(tenant);
        match self.driver.read(&key).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(TenantConfig {
                tenant: tenant.to_string(),
                ..Default::default()
            }),
        }
    }

    async fn configure(&self, tenant: &str, config: TenantConfig) -> MindscapeResult<()> {
        let key = tenant_config_key(tenant);
        let value: Value = serde_json::to_value(&config)?;
        self.driver.write(&key, value, StorageMeta::new(tenant, "tenant_config")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindscape_core::errors::MindscapeResult as Result_;
    use mindscape_core::models::MemoryRecord;
    use mindscape_core::traits::Summariser as SummariserTrait;
    use mindscape_storage::MemoryStorageDriver;

    struct IdentitySummariser;

    impl SummariserTrait for IdentitySummariser {
        async fn summarize_chunk(&self, _tenant: &str, records: &[MemoryRecord], _ratio: f64) -> Result_<String> {
            Ok(records.iter().map(|r| r.content.as_str()).collect::<Vec<_>>().join(" "))
        }

        async fn summarize_delta(&self, _tenant: &str, records: &[MemoryRecord], prev: &str, _ratio: f64) -> Result_<String> {
            Ok(format!("{prev} {}", records.iter().map(|r| r.content.as_str()).collect::<Vec<_>>().join(" ")))
        }
    }

    fn layer() -> DriverAdaptiveLayer<MemoryStorageDriver, IdentitySummariser> {
        DriverAdaptiveLayer::new(
            Arc::new(MemoryStorageDriver::new()),
            Arc::new(IdentitySummariser),
            AtlasConfig::default(),
        )
    }

    #[tokio::test]
    async fn seeding_starts_in_hot_layer_uncompressed() {
        let layer = layer();
        let (score, components) = layer
            .score_surprise("acme", "agent-a", "mem-1", "content", 0, 0, 0.0, 0.0, None)
            .await
            .unwrap();
        let memory = layer
            .seed_adaptive_memory("acme", "agent-a", "mem-1", Vec::new(), score, components)
            .await
            .unwrap();
        assert_eq!(memory.layer, Layer::Hot);
        assert_eq!(memory.compression_level, 0);
        assert!(memory.compressed_payload.is_none());
    }

    #[tokio::test]
    async fn score_surprise_novelty_drops_for_content_overlapping_recent_memory() {
        let driver = Arc::new(MemoryStorageDriver::new());
        let layer = DriverAdaptiveLayer::new(driver.clone(), Arc::new(IdentitySummariser), AtlasConfig::default());

        let (_first_score, first) = layer
            .score_surprise("acme", "agent-a", "mem-1", "the market will grow quickly", 0, 0, 0.0, 0.0, None)
            .await
            .unwrap();
        assert_eq!(first.novelty, 1.0);

        driver
            .write(
                &mindscape_core::keys::memory("acme", "mem-1"),
                serde_json::to_value(&MemoryRecord {
                    id: "mem-1".into(),
                    tenant: "acme".into(),
                    agent: "agent-a".into(),
                    record_type: "observation".into(),
                    content: "the market will grow quickly".into(),
                    metadata: Default::default(),
                    parent_id: None,
                    created_at: Utc::now(),
                })
                .unwrap(),
                mindscape_core::traits::StorageMeta::new("acme", "memory"),
            )
            .await
            .unwrap();

        let (_second_score, second) = layer
            .score_surprise("acme", "agent-a", "mem-2", "the market will grow quickly", 0, 0, 0.0, 0.0, None)
            .await
            .unwrap();
        assert!(second.novelty < first.novelty);
    }

    #[tokio::test]
    async fn record_usage_increments_count_and_nudges_importance() {
        let layer = layer();
        let (score, components) = layer
            .score_surprise("acme", "agent-a", "mem-1", "content", 0, 0, 0.0, 0.0, None)
            .await
            .unwrap();
        let memory = layer
            .seed_adaptive_memory("acme", "agent-a", "mem-1", Vec::new(), score, components)
            .await
            .unwrap();

        let updated = layer.record_usage("acme", &memory.id, 1.0).await.unwrap();
        assert_eq!(updated.usage_count, 1);
        assert!(updated.importance >= memory.importance);
    }

    #[tokio::test]
    async fn promote_moves_up_exactly_one_layer() {
        let layer = layer();
        let (score, components) = layer
            .score_surprise("acme", "agent-a", "mem-1", "content", 0, 0, 0.0, 0.0, None)
            .await
            .unwrap();
        let memory = layer
            .seed_adaptive_memory("acme", "agent-a", "mem-1", Vec::new(), score, components)
            .await
            .unwrap();

        let mut forced = memory.clone();
        forced.layer = Layer::Frozen;
        layer.write_memory("acme", &forced).await.unwrap();

        let promoted = layer.promote("acme", &memory.id).await.unwrap();
        assert_eq!(promoted.layer, Layer::Cold);
    }

    #[tokio::test]
    async fn configure_then_get_config_round_trips() {
        let layer = layer();
        let mut config = TenantConfig {
            tenant: "acme".into(),
            ..Default::default()
        };
        config.diversity_factor = 0.9;
        layer.configure("acme", config).await.unwrap();

        let fetched = layer.get_config("acme").await.unwrap();
        assert_eq!(fetched.diversity_factor, 0.9);
    }

    #[tokio::test]
    async fn get_config_without_prior_configure_yields_tenant_defaults() {
        let layer = layer();
        let config = layer.get_config("acme").await.unwrap();
        assert_eq!(config.tenant, "acme");
        assert_eq!(config.diversity_factor, 0.3);
    }
}
