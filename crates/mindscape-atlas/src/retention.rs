//! Retention evaluator: a pure retention score and the compress/promote
//! recommendation buckets derived from it (C14, §4.12). Never mutates
//! state — callers act on the recommendations via explicit endpoints.

use mindscape_core::models::{
    AdaptiveMemory, Layer, RetentionPolicy, RetentionRecommendation, RetentionReport,
};

/// The raw inputs behind a retention score, independent of any particular
/// storage shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetentionComponents {
    pub surprise: f64,
    pub contradiction_involvement: f64,
    pub temporal_decay: f64,
    pub evidence_strength: f64,
    pub usage: f64,
}

/// `R = w_s*surprise + w_c*contradiction + w_t*temporal + w_e*evidence +
/// w_u*usage` (§4.12).
pub fn retention_score(components: RetentionComponents, policy: &RetentionPolicy) -> f64 {
    let w = policy.weights;
    (w.surprise * components.surprise
        + w.contradiction * components.contradiction_involvement
        + w.temporal * components.temporal_decay
        + w.evidence * components.evidence_strength
        + w.usage * components.usage)
        .clamp(0.0, 1.0)
}

/// `temporal_decay = 1 / (1 + age_days)`, so the component falls toward 0 as
/// a memory ages rather than needing a separate half-life knob (§4.12).
pub fn temporal_decay_from_age(age_days: f64) -> f64 {
    1.0 / (1.0 + age_days.max(0.0))
}

/// Evaluates one memory's score and, if applicable, appends it to the
/// report's `compress` and/or `promote` buckets. Age is supplied in days
/// since the caller owns the clock (§5.2 keeps time out of pure functions).
pub fn evaluate_one(
    memory: &AdaptiveMemory,
    components: RetentionComponents,
    age_days: i64,
    policy: &RetentionPolicy,
    report: &mut RetentionReport,
) {
    let score = retention_score(components, policy);
    let recommendation = RetentionRecommendation {
        adaptive_id: memory.id.clone(),
        score,
    };

    if score < policy.compression_threshold && age_days >= policy.compression_age_days {
        report.compress.push(recommendation.clone());
    }
    if score >= policy.promotion_threshold && memory.layer != Layer::Hot {
        report.promote.push(recommendation);
    }
}

/// Evaluates a full batch in one pass.
pub fn evaluate_batch(
    items: &[(AdaptiveMemory, RetentionComponents, i64)],
    policy: &RetentionPolicy,
) -> RetentionReport {
    let mut report = RetentionReport::default();
    for (memory, components, age_days) in items {
        evaluate_one(memory, *components, *age_days, policy, &mut report);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn memory(layer: Layer) -> AdaptiveMemory {
        AdaptiveMemory {
            id: "mem-1".into(),
            tenant: "acme".into(),
            agent: "agent-a".into(),
            core_memory_id: "core-1".into(),
            belief_ids: Vec::new(),
            surprise_score: 0.2,
            surprise_components: Default::default(),
            layer,
            importance: 0.5,
            usage_count: 0,
            last_access_ts: Utc::now(),
            compression_level: 0,
            compressed_payload: None,
        }
    }

    #[test]
    fn retention_score_stays_within_unit_interval() {
        let components = RetentionComponents {
            surprise: 1.0,
            contradiction_involvement: 1.0,
            temporal_decay: 1.0,
            evidence_strength: 1.0,
            usage: 1.0,
        };
        let score = retention_score(components, &RetentionPolicy::default());
        assert!((0.0..=1.0).contains(&score));
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn low_score_old_memory_is_recommended_for_compression() {
        let policy = RetentionPolicy::default();
        let memory = memory(Layer::Warm);
        let mut report = RetentionReport::default();
        evaluate_one(&memory, RetentionComponents::default(), 60, &policy, &mut report);
        assert_eq!(report.compress.len(), 1);
        assert!(report.promote.is_empty());
    }

    #[test]
    fn low_score_young_memory_is_not_recommended_for_compression() {
        let policy = RetentionPolicy::default();
        let memory = memory(Layer::Warm);
        let mut report = RetentionReport::default();
        evaluate_one(&memory, RetentionComponents::default(), 5, &policy, &mut report);
        assert!(report.compress.is_empty());
    }

    #[test]
    fn high_score_non_hot_memory_is_recommended_for_promotion() {
        let policy = RetentionPolicy::default();
        let memory = memory(Layer::Cold);
        let components = RetentionComponents {
            surprise: 1.0,
            contradiction_involvement: 1.0,
            temporal_decay: 1.0,
            evidence_strength: 1.0,
            usage: 1.0,
        };
        let mut report = RetentionReport::default();
        evaluate_one(&memory, components, 60, &policy, &mut report);
        assert_eq!(report.promote.len(), 1);
    }

    #[test]
    fn hot_memories_are_never_recommended_for_promotion() {
        let policy = RetentionPolicy::default();
        let memory = memory(Layer::Hot);
        let components = RetentionComponents {
            surprise: 1.0,
            contradiction_involvement: 1.0,
            temporal_decay: 1.0,
            evidence_strength: 1.0,
            usage: 1.0,
        };
        let mut report = RetentionReport::default();
        evaluate_one(&memory, components, 60, &policy, &mut report);
        assert!(report.promote.is_empty());
    }

    #[test]
    fn temporal_decay_falls_toward_zero_with_age() {
        assert_eq!(temporal_decay_from_age(0.0), 1.0);
        assert!(temporal_decay_from_age(30.0) < temporal_decay_from_age(1.0));
    }

    /// Low-surprise, old-enough memory under a tightened policy is listed
    /// for compression but left entirely unmutated — evaluation only ever
    /// recommends, callers act through `compress`.
    #[test]
    fn low_surprise_old_memory_is_listed_not_mutated() {
        let policy = RetentionPolicy {
            compression_threshold: 0.35,
            compression_age_days: 30,
            ..RetentionPolicy::default()
        };
        let memory = memory(Layer::Warm);
        let components = RetentionComponents {
            surprise: 0.2,
            ..Default::default()
        };
        let mut report = RetentionReport::default();
        evaluate_one(&memory, components, 40, &policy, &mut report);

        assert_eq!(report.compress.len(), 1);
        assert_eq!(report.compress[0].adaptive_id, memory.id);
        assert_eq!(memory.compression_level, 0);
    }
}
