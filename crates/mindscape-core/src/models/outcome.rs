//! Return-value shapes for orchestration and compression/retention reporting
//! (§3.1, §4.11, §4.12, §4.13).

use serde::{Deserialize, Serialize};

use super::adaptive_memory::AdaptiveMemory;
use super::audit::DegradationReason;
use super::belief::Belief;
use super::contradiction::Contradiction;
use super::memory_record::MemoryRecord;

/// Result of the orchestrator's `store_memory` (§4.13). Every field after
/// `memory_id` is optional/empty on partial failure — never silent loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOutcome {
    pub memory_id: String,
    pub adaptive_id: Option<String>,
    pub belief_ids: Vec<String>,
    pub surprise_score: Option<f64>,
    pub degraded: Vec<DegradationReason>,
}

/// How a non-hot layer's contribution to a context snapshot is represented,
/// per §4.2's substitution rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LayerView {
    Full(MemoryRecord),
    Summarized(String),
    Sampled(Vec<MemoryRecord>),
}

/// A single record's retention score annotated with the decision buckets it
/// falls into, returned alongside `RetentionReport` (§4.12).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionRecommendation {
    pub adaptive_id: String,
    pub score: f64,
}

/// Pure recommendation output of the retention evaluator. Never mutates
/// layer or content; callers act via explicit promote/compress endpoints
/// (§4.12).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetentionReport {
    pub compress: Vec<RetentionRecommendation>,
    pub promote: Vec<RetentionRecommendation>,
}

/// Aggregate counters describing a hierarchical compression pass (§4.11).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompressionStats {
    pub records_by_level: [u64; 5],
    pub bytes_before: u64,
    pub bytes_after: u64,
}

/// Return type of the orchestrator's `build_context` (§3.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub hot: Vec<MemoryRecord>,
    pub warm: Vec<LayerView>,
    pub cold: Vec<LayerView>,
    pub frozen: Vec<LayerView>,
    pub beliefs: Vec<Belief>,
    pub active_contradictions: Vec<Contradiction>,
    pub retention: RetentionReport,
    pub high_surprise: Vec<AdaptiveMemory>,
    pub compression_stats: CompressionStats,
    pub estimated_tokens: usize,
}
