//! Classifies records into hot/warm/cold/frozen, triggers summarisation
//! jobs, and allocates the token budget when building layered context
//! (C5, §4.2).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use mindscape_core::config::{AtlasConfig, StratifyConfig};
use mindscape_core::errors::MindscapeResult;
use mindscape_core::keys;
use mindscape_core::models::{Job, JobStatus, JobType, Layer, LayerView, MemoryRecord};
use mindscape_core::token::estimate_tokens;
use mindscape_core::traits::{StorageDriver, StorageMeta, StorageQuery, Summariser, TemporalStratifier};

use crate::mdl::target_compression_ratio;
use crate::summariser::summarize_in_windows;

#[derive(Debug, Clone, Copy, Default)]
struct LayerCounter {
    count: u64,
    last_summary: Option<DateTime<Utc>>,
}

/// `TemporalStratifier` backed by any `StorageDriver`. Per-(tenant, agent,
/// layer) counters live in-process (not authoritative — a process restart
/// simply re-derives them from the next ingest's read-fixup).
pub struct DriverTemporalStratifier<D: StorageDriver> {
    driver: Arc<D>,
    config: StratifyConfig,
    counters: DashMap<(String, String, Layer), LayerCounter>,
}

impl<D: StorageDriver> DriverTemporalStratifier<D> {
    pub fn new(driver: Arc<D>, config: StratifyConfig) -> Self {
        Self {
            driver,
            config,
            counters: DashMap::new(),
        }
    }

    fn layer_windows(&self, age_secs: i64) -> Layer {
        if age_secs <= self.config.hot_max_age_secs {
            Layer::Hot
        } else if age_secs <= self.config.warm_max_age_secs {
            Layer::Warm
        } else if age_secs <= self.config.cold_max_age_secs {
            Layer::Cold
        } else {
            Layer::Frozen
        }
    }

    fn thresholds_for(&self, layer: Layer) -> Option<(u64, i64)> {
        match layer {
            Layer::Hot => Some((self.config.hot_count_threshold, self.config.hot_interval_secs)),
            Layer::Warm => Some((self.config.warm_count_threshold, self.config.warm_interval_secs)),
            Layer::Cold => Some((self.config.cold_count_threshold, self.config.cold_interval_secs)),
            Layer::Frozen => None,
        }
    }

    async fn substitute(&self, tenant: &str, layer: Layer, records: Vec<MemoryRecord>, budget: usize) -> LayerView {
        let summary_key = keys::summary(tenant, layer.as_str());
        if let Ok(Some(value)) = self.driver.read(&summary_key).await {
            if let Some(summary) = value.as_str() {
                return LayerView::Summarized(truncate_to_token_budget(summary, budget));
            }
        }

        let mut remaining = budget;
        let mut sample = Vec::new();
        for record in records.into_iter().take(self.config.sample_fallback_size) {
            let cost = estimate_tokens(&record.content);
            if cost > remaining {
                break;
            }
            remaining -= cost;
            sample.push(record);
        }
        LayerView::Sampled(sample)
    }

    /// Executes a pending `Summarize` job: re-reads `tenant`/`agent`'s
    /// records, buckets the ones currently in `layer` into L1/L2/L3-sized
    /// windows (§4.3) at C3's target ratio, and writes the chained result to
    /// the layer's summary key for `substitute` to pick up.
    pub async fn run_summarization_job<S: Summariser>(
        &self,
        summariser: &S,
        tenant: &str,
        agent: &str,
        layer: Layer,
        atlas_config: &AtlasConfig,
    ) -> MindscapeResult<()> {
        let level = match layer {
            Layer::Hot => return Ok(()),
            Layer::Warm => 1,
            Layer::Cold => 2,
            Layer::Frozen => 3,
        };

        let values = self
            .driver
            .query(StorageQuery {
                key_prefix: keys::memory_prefix(tenant),
                time_range: None,
                limit: None,
            })
            .await?;

        let now = Utc::now();
        let mut records: Vec<MemoryRecord> = values
            .into_iter()
            .filter_map(|v| serde_json::from_value::<MemoryRecord>(v).ok())
            .filter(|r| r.agent == agent && self.classify(r.effective_timestamp(), now) == layer)
            .collect();
        records.sort_by_key(|r| r.created_at);

        if records.is_empty() {
            return Ok(());
        }

        let joined = records.iter().map(|r| r.content.as_str()).collect::<Vec<_>>().join("\n");
        let ratio = target_compression_ratio(&joined);
        let summary = summarize_in_windows(summariser, tenant, &records, level, atlas_config, ratio).await?;

        self.driver
            .write(
                &keys::summary(tenant, layer.as_str()),
                serde_json::Value::String(summary),
                StorageMeta::new(tenant, "summary"),
            )
            .await
    }
}

/// Trims `text` to fit a token budget using the same bytes/4 estimator as
/// everywhere else, cutting on a char boundary so the output stays valid
/// UTF-8 (§4.2, §4.5).
fn truncate_to_token_budget(text: &str, budget: usize) -> String {
    let max_bytes = budget.saturating_mul(4);
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut cut = max_bytes;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text[..cut].to_string()
}

impl<D: StorageDriver> TemporalStratifier for DriverTemporalStratifier<D> {
    fn classify(&self, effective_timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Layer {
        let age_secs = (now - effective_timestamp).num_seconds().max(0);
        self.layer_windows(age_secs)
    }

    async fn check_and_trigger_summarization(
        &self,
        tenant: &str,
        agent: &str,
        layer: Layer,
    ) -> MindscapeResult<bool> {
        let Some((count_threshold, interval_secs)) = self.thresholds_for(layer) else {
            return Ok(false);
        };

        let now = Utc::now();
        let mut entry = self
            .counters
            .entry((tenant.to_string(), agent.to_string(), layer))
            .or_default();
        entry.count += 1;

        let count_triggered = entry.count >= count_threshold;
        let interval_triggered = entry
            .last_summary
            .map(|last| (now - last).num_seconds() >= interval_secs)
            .unwrap_or(true);

        if !(count_triggered || interval_triggered) {
            return Ok(false);
        }

        let marker_key = keys::stratify_counter(tenant, agent, layer.as_str());
        if let Some(existing) = self.driver.read(&marker_key).await? {
            if existing.get("status").and_then(|s| s.as_str()) == Some("pending") {
                return Ok(false);
            }
        }

        let job = Job {
            id: uuid::Uuid::new_v4().to_string(),
            tenant: tenant.to_string(),
            job_type: JobType::Summarize,
            status: JobStatus::Pending,
            attempts: 0,
            payload: serde_json::json!({ "agent": agent, "layer": layer.as_str() }),
            created_at: now,
            updated_at: now,
        };
        self.driver
            .write(&keys::job(&job.id), serde_json::to_value(&job)?, StorageMeta::new(tenant, "job"))
            .await?;
        self.driver
            .write(
                &marker_key,
                serde_json::json!({ "status": "pending", "job_id": job.id }),
                StorageMeta::new(tenant, "stratify_marker"),
            )
            .await?;

        entry.count = 0;
        entry.last_summary = Some(now);
        Ok(true)
    }

    async fn build_context(
        &self,
        tenant: &str,
        records: Vec<MemoryRecord>,
        max_tokens: usize,
    ) -> MindscapeResult<StratifiedContext> {
        let now = Utc::now();
        let mut by_layer: std::collections::HashMap<Layer, Vec<MemoryRecord>> =
            std::collections::HashMap::new();
        for record in records {
            let layer = self.classify(record.effective_timestamp(), now);
            by_layer.entry(layer).or_default().push(record);
        }

        let split = self.config.context_token_split;
        let budgets = [
            (max_tokens as f64 * split[0]) as usize,
            (max_tokens as f64 * split[1]) as usize,
            (max_tokens as f64 * split[2]) as usize,
            (max_tokens as f64 * split[3]) as usize,
        ];

        let hot_records = by_layer.remove(&Layer::Hot).unwrap_or_default();
        let mut hot = Vec::new();
        let mut budget = budgets[0];
        for record in hot_records {
            let cost = estimate_tokens(&record.content);
            if cost > budget {
                break;
            }
            budget -= cost;
            hot.push(record);
        }

        let warm_records = by_layer.remove(&Layer::Warm).unwrap_or_default();
        let cold_records = by_layer.remove(&Layer::Cold).unwrap_or_default();
        let frozen_records = by_layer.remove(&Layer::Frozen).unwrap_or_default();

        let warm = vec![self.substitute(tenant, Layer::Warm, warm_records, budgets[1]).await];
        let cold = vec![self.substitute(tenant, Layer::Cold, cold_records, budgets[2]).await];
        let frozen = vec![self.substitute(tenant, Layer::Frozen, frozen_records, budgets[3]).await];

        Ok(StratifiedContext { hot, warm, cold, frozen })
    }
}
