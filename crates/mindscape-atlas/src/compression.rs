//! Hierarchical compressor: maps surprise to a compression level, drives the
//! `Summariser` at each level's target ratio, and zstd-packs the result
//! (C13, §4.11). High-surprise memories are left uncompressed — level 0 is
//! the identity level.

use mindscape_core::errors::MindscapeResult;
use mindscape_core::models::{AdaptiveMemory, CompressionStats, CompressionStrategy};
use mindscape_core::traits::Summariser;

const ZSTD_LEVEL: i32 = 3;

/// Surprise-to-level mapping (§4.11): the more surprising a memory is, the
/// less it gets compressed. `thresholds` are the lower bounds for levels
/// 0-3, highest first; anything below all four falls to level 4.
pub fn level_for_surprise(surprise_score: f64, thresholds: [f64; 4]) -> u8 {
    for (level, bound) in thresholds.iter().enumerate() {
        if surprise_score >= *bound {
            return level as u8;
        }
    }
    4
}

/// Target byte fraction for a level, from the tenant's `CompressionStrategy`.
pub fn target_ratio(level: u8, strategy: &CompressionStrategy) -> f64 {
    strategy
        .level_fractions
        .get(level as usize)
        .copied()
        .unwrap_or(1.0)
}

/// Compress one adaptive memory's payload at its assigned level: summarise
/// the joined underlying content at the level's target ratio, then zstd-pack
/// the bytes. Level 0 always stays uncompressed (`compressed_payload: None`).
pub async fn compress_one<S: Summariser>(
    summariser: &S,
    tenant: &str,
    memory: &mut AdaptiveMemory,
    content: &str,
    level: u8,
    strategy: &CompressionStrategy,
) -> MindscapeResult<u64> {
    let bytes_before = content.len() as u64;

    if level == 0 {
        memory.compression_level = 0;
        memory.compressed_payload = None;
        return Ok(bytes_before);
    }

    let ratio = target_ratio(level, strategy);
    let record = mindscape_core::models::MemoryRecord {
        id: memory.core_memory_id.clone(),
        tenant: tenant.to_string(),
        agent: memory.agent.clone(),
        record_type: "observation".to_string(),
        content: content.to_string(),
        metadata: Default::default(),
        parent_id: None,
        created_at: memory.last_access_ts,
    };
    let summary = summariser.summarize_chunk(tenant, &[record], ratio).await?;
    let packed = zstd::encode_all(summary.as_bytes(), ZSTD_LEVEL)
        .unwrap_or_else(|_| summary.into_bytes());

    let bytes_after = packed.len() as u64;
    memory.compression_level = level;
    memory.compressed_payload = Some(packed);
    Ok(bytes_after)
}

/// Decompress a level >0 payload back to text, for retrieval paths that need
/// the summarised content rather than raw bytes.
pub fn decompress(payload: &[u8]) -> MindscapeResult<String> {
    match zstd::decode_all(payload) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(_) => Ok(String::from_utf8_lossy(payload).into_owned()),
    }
}

/// One combined summary per populated compression level, plus the batch's
/// compression stats (§4.11's `createHierarchicalSummary`).
#[derive(Debug, Clone, Default)]
pub struct HierarchicalSummary {
    pub by_level: [Vec<String>; 5],
    pub stats: CompressionStats,
}

/// Groups `records` by the compression level their paired `surprise_scores`
/// assign them to, then produces one combined summary per level rather than
/// one per record — level 0 keeps each record's content unsummarised, levels
/// 1-4 run the group through `Summariser::summarize_chunk` at that level's
/// target ratio (§4.11).
pub async fn create_hierarchical_summary<S: Summariser>(
    summariser: &S,
    tenant: &str,
    records: &[mindscape_core::models::MemoryRecord],
    surprise_scores: &[f64],
    strategy: &CompressionStrategy,
    thresholds: [f64; 4],
) -> MindscapeResult<HierarchicalSummary> {
    let mut groups: [Vec<&mindscape_core::models::MemoryRecord>; 5] = Default::default();
    for (record, score) in records.iter().zip(surprise_scores.iter()) {
        let level = level_for_surprise(*score, thresholds);
        groups[level as usize].push(record);
    }

    let mut result = HierarchicalSummary::default();
    for (level, group) in groups.iter().enumerate() {
        if group.is_empty() {
            continue;
        }

        let bytes_before: u64 = group.iter().map(|r| r.content.len() as u64).sum();
        result.stats.records_by_level[level] = group.len() as u64;
        result.stats.bytes_before += bytes_before;

        if level == 0 {
            result.by_level[0].extend(group.iter().map(|r| r.content.clone()));
            result.stats.bytes_after += bytes_before;
            continue;
        }

        let ratio = target_ratio(level as u8, strategy);
        let owned: Vec<mindscape_core::models::MemoryRecord> = group.iter().map(|r| (*r).clone()).collect();
        let summary = summariser.summarize_chunk(tenant, &owned, ratio).await?;
        result.stats.bytes_after += summary.len() as u64;
        result.by_level[level].push(summary);
    }

    Ok(result)
}

/// Runs `compress_one` over a batch, accumulating `CompressionStats` (§4.11).
/// `items` pairs each memory with its current raw content.
pub async fn compress_batch<S: Summariser>(
    summariser: &S,
    tenant: &str,
    items: &mut [(AdaptiveMemory, String)],
    strategy: &CompressionStrategy,
    thresholds: [f64; 4],
) -> MindscapeResult<CompressionStats> {
    let mut stats = CompressionStats::default();

    for (memory, content) in items.iter_mut() {
        let level = level_for_surprise(memory.surprise_score, thresholds);
        let bytes_before = content.len() as u64;
        let bytes_after =
            compress_one(summariser, tenant, memory, content, level, strategy).await?;
        stats.records_by_level[level as usize] += 1;
        stats.bytes_before += bytes_before;
        stats.bytes_after += bytes_after;
    }

    Ok(stats)
}
