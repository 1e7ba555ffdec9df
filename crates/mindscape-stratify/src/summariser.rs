//! Hierarchical summary builder with a delta mode and an idempotent
//! per-process cache keyed on chunk membership (C6, §4.3).

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use mindscape_core::config::AtlasConfig;
use mindscape_core::errors::{MindscapeError, MindscapeResult};
use mindscape_core::models::MemoryRecord;
use mindscape_core::traits::{AiProvider, Summariser, SummarizeOptions};

/// Chunk size for a fixed summarisation window at `level` (1-3), from the
/// tenant's `AtlasConfig` (§4.3).
pub fn chunk_size_for_level(level: u8, config: &AtlasConfig) -> usize {
    match level {
        1 => config.chunk_size_l1,
        2 => config.chunk_size_l2,
        _ => config.chunk_size_l3,
    }
}

/// Splits timestamp-ordered `records` into fixed windows of `chunk_size`;
/// the final window holds the remainder (§4.3).
pub fn windowed_chunks(records: &[MemoryRecord], chunk_size: usize) -> Vec<&[MemoryRecord]> {
    if records.is_empty() {
        return Vec::new();
    }
    if chunk_size == 0 {
        return vec![records];
    }
    records.chunks(chunk_size).collect()
}

/// Summarises timestamp-ordered `records` one fixed window at a time at
/// `level`'s chunk size, chaining each window through the previous window's
/// summary via `summarize_delta` so the result reads as one continuous
/// summary rather than a concatenation of unrelated chunks (§4.3).
pub async fn summarize_in_windows<S: Summariser>(
    summariser: &S,
    tenant: &str,
    records: &[MemoryRecord],
    level: u8,
    config: &AtlasConfig,
    target_ratio: f64,
) -> MindscapeResult<String> {
    let chunk_size = chunk_size_for_level(level, config);
    let mut summary = String::new();
    for window in windowed_chunks(records, chunk_size) {
        summary = if summary.is_empty() {
            summariser.summarize_chunk(tenant, window, target_ratio).await?
        } else {
            summariser.summarize_delta(tenant, window, &summary, target_ratio).await?
        };
    }
    Ok(summary)
}

fn chunk_cache_key(record_ids: &[String]) -> String {
    let mut sorted = record_ids.to_vec();
    sorted.sort();
    let mut hasher = blake3::Hasher::new();
    for id in &sorted {
        hasher.update(id.as_bytes());
        hasher.update(b"\0");
    }
    hasher.finalize().to_hex().to_string()
}

/// `Summariser` over any `AiProvider`. Falls back to identity summarisation
/// (the joined content, untouched) when the provider is unavailable, per
/// §7's degrade-gracefully contract.
pub struct AiSummariser<A: AiProvider> {
    provider: Arc<A>,
    cache: Cache<String, String>,
}

impl<A: AiProvider> AiSummariser<A> {
    pub fn new(provider: Arc<A>) -> Self {
        Self {
            provider,
            cache: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(Duration::from_secs(3600))
                .build(),
        }
    }

    fn identity_summary(records: &[MemoryRecord]) -> String {
        records
            .iter()
            .map(|r| r.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<A: AiProvider> Summariser for AiSummariser<A> {
    async fn summarize_chunk(
        &self,
        _tenant: &str,
        records: &[MemoryRecord],
        target_ratio: f64,
    ) -> MindscapeResult<String> {
        let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        let cache_key = chunk_cache_key(&ids);
        if let Some(cached) = self.cache.get(&cache_key) {
            return Ok(cached);
        }

        let content = Self::identity_summary(records);
        let options = SummarizeOptions {
            level: 0,
            target_compression: target_ratio,
            delta_mode: false,
            previous_summary: None,
            preserve_contradictions: true,
            preserve_rejected_ideas: true,
            preserve_decisions: true,
        };

        let summary = match self.provider.summarize(&content, options).await {
            Ok(summary) => summary,
            Err(err) if err.is_ai_unavailable() => content,
            Err(err) => return Err(err),
        };

        self.cache.insert(cache_key, summary.clone());
        Ok(summary)
    }

    async fn summarize_delta(
        &self,
        _tenant: &str,
        records: &[MemoryRecord],
        previous_summary: &str,
        target_ratio: f64,
    ) -> MindscapeResult<String> {
        let content = Self::identity_summary(records);
        let options = SummarizeOptions {
            level: 0,
            target_compression: target_ratio,
            delta_mode: true,
            previous_summary: Some(previous_summary.to_string()),
            preserve_contradictions: true,
            preserve_rejected_ideas: true,
            preserve_decisions: true,
        };

        match self.provider.summarize(&content, options).await {
            Ok(summary) => Ok(summary),
            Err(err) if err.is_ai_unavailable() => {
                Ok(format!("{previous_summary}\n{content}"))
            }
            Err(err) => Err(err),
        }
    }
}
