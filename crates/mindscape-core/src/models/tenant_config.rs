//! Per-tenant tunables for surprise, priority, compression, and retention
//! (§3, §4.9, §4.10, §4.11, §4.12). Defaults live here, never as magic
//! numbers scattered through the logic that consumes them.

use serde::{Deserialize, Serialize};

/// Weights for the surprise score (§4.9). Renormalised to sum to 1 before use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SurpriseWeights {
    pub novelty: f64,
    pub contradiction: f64,
    pub evidence: f64,
    pub confidence_shift: f64,
    pub disagreement: f64,
}

impl Default for SurpriseWeights {
    fn default() -> Self {
        Self {
            novelty: 0.35,
            contradiction: 0.25,
            evidence: 0.15,
            confidence_shift: 0.15,
            disagreement: 0.10,
        }
    }
}

/// Weights for the ATLAS importance function (§4.10).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    pub relevance: f64,
    pub recency: f64,
    pub surprise: f64,
    pub usage: f64,
    pub context_fit: f64,
    /// Recency half-life in days.
    pub half_life_days: f64,
    /// Saturation constant `K` for `usage = min(1, usage_count / K)`.
    pub usage_saturation: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            relevance: 0.30,
            recency: 0.20,
            surprise: 0.25,
            usage: 0.15,
            context_fit: 0.10,
            half_life_days: 7.0,
            usage_saturation: 10.0,
        }
    }
}

/// Weights for the retention score `R` (§4.12).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionWeights {
    pub surprise: f64,
    pub contradiction: f64,
    pub temporal: f64,
    pub evidence: f64,
    pub usage: f64,
}

impl Default for RetentionWeights {
    fn default() -> Self {
        Self {
            surprise: 0.35,
            contradiction: 0.20,
            temporal: 0.20,
            evidence: 0.15,
            usage: 0.10,
        }
    }
}

/// Thresholds gating the retention evaluator's compress/promote
/// recommendation buckets (§4.12).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicy {
    pub weights: RetentionWeights,
    pub compression_threshold: f64,
    pub compression_age_days: i64,
    pub promotion_threshold: f64,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            weights: RetentionWeights::default(),
            compression_threshold: 0.35,
            compression_age_days: 30,
            promotion_threshold: 0.75,
        }
    }
}

/// Fixed target byte fractions per compression level (§4.11). Not
/// tenant-configurable today but kept as its own type so a future tenant
/// override has a natural home.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionStrategy {
    pub level_fractions: [f64; 5],
}

impl Default for CompressionStrategy {
    fn default() -> Self {
        Self {
            level_fractions: [1.00, 0.70, 0.40, 0.20, 0.10],
        }
    }
}

/// The full set of per-tenant tunables, deserializable from TOML with
/// `#[serde(default)]` on every sub-struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TenantConfig {
    pub tenant: String,
    pub surprise_weights: SurpriseWeights,
    pub priority_weights: PriorityWeights,
    pub retention_policy: RetentionPolicy,
    pub compression_strategy: CompressionStrategy,
    /// Greedy diversity penalty `λ` in the ATLAS MMR-style reranker (§4.10).
    pub diversity_factor: f64,
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            tenant: String::new(),
            surprise_weights: SurpriseWeights::default(),
            priority_weights: PriorityWeights::default(),
            retention_policy: RetentionPolicy::default(),
            compression_strategy: CompressionStrategy::default(),
            diversity_factor: 0.3,
        }
    }
}
