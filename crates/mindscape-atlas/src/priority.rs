//! ATLAS importance function and the diversity-aware token-budget reranker
//! (C12, §4.10). Pure, no I/O.

use std::collections::HashSet;

use mindscape_core::models::PriorityWeights;
use mindscape_core::token::estimate_tokens;

/// `recency = 2^(-age_days/half_life)`.
pub fn recency(age_days: f64, half_life_days: f64) -> f64 {
    2.0_f64.powf(-age_days / half_life_days.max(f64::EPSILON))
}

/// `usage = min(1, usage_count / K)`.
pub fn usage_factor(usage_count: u64, saturation: f64) -> f64 {
    (usage_count as f64 / saturation.max(f64::EPSILON)).min(1.0)
}

/// Token-overlap relevance against `query_context`, the fallback used when
/// no vector engine is wired in (§4.10).
pub fn token_overlap_relevance(content: &str, query_context: &str) -> f64 {
    let content_tokens: HashSet<&str> = content.split_whitespace().collect();
    let query_tokens: HashSet<&str> = query_context.split_whitespace().collect();
    if query_tokens.is_empty() {
        return 0.0;
    }
    let overlap = content_tokens.intersection(&query_tokens).count();
    overlap as f64 / query_tokens.len() as f64
}

/// `I = alpha*relevance + beta*recency + gamma*surprise + delta*usage +
/// epsilon*context_fit`.
#[allow(clippy::too_many_arguments)]
pub fn importance(
    relevance: f64,
    recency: f64,
    surprise: f64,
    usage: f64,
    context_fit: f64,
    weights: PriorityWeights,
) -> f64 {
    (weights.relevance * relevance
        + weights.recency * recency
        + weights.surprise * surprise
        + weights.usage * usage
        + weights.context_fit * context_fit)
        .clamp(0.0, 1.0)
}

/// Usage feedback: `I_new = (1-eta)*I_old + eta*utility` (§4.10).
pub fn update_from_usage(old_importance: f64, utility: f64, eta: f64) -> f64 {
    ((1.0 - eta) * old_importance + eta * utility).clamp(0.0, 1.0)
}

/// A candidate for the diversity-aware reranker: just enough to drive the
/// greedy MMR pick without coupling `mindscape-atlas` to the full
/// `AdaptiveMemory`/`MemoryRecord` shape.
#[derive(Debug, Clone)]
pub struct RerankCandidate {
    pub id: String,
    pub importance: f64,
    pub content: String,
    pub token_cost: usize,
}

fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let a_tokens: HashSet<&str> = a.split_whitespace().collect();
    let b_tokens: HashSet<&str> = b.split_whitespace().collect();
    if a_tokens.is_empty() && b_tokens.is_empty() {
        return 0.0;
    }
    let intersection = a_tokens.intersection(&b_tokens).count() as f64;
    let union = a_tokens.union(&b_tokens).count() as f64;
    if union == 0.0 {
        0.0
    } else {
        intersection / union
    }
}

/// Greedy maximum-marginal-relevance-style pick: take the highest
/// importance, then iteratively take `importance - lambda *
/// max_similarity(already_picked)`, until `token_budget` is exhausted
/// (§4.10).
pub fn rerank_by_importance(
    mut candidates: Vec<RerankCandidate>,
    token_budget: usize,
    diversity_factor: f64,
) -> Vec<RerankCandidate> {
    let mut picked: Vec<RerankCandidate> = Vec::new();
    let mut remaining_budget = token_budget;

    while !candidates.is_empty() {
        let mut best_index = 0;
        let mut best_score = f64::MIN;
        for (index, candidate) in candidates.iter().enumerate() {
            let max_similarity = picked
                .iter()
                .map(|p| jaccard_similarity(&candidate.content, &p.content))
                .fold(0.0_f64, f64::max);
            let score = candidate.importance - diversity_factor * max_similarity;
            if score > best_score {
                best_score = score;
                best_index = index;
            }
        }

        let candidate = candidates.remove(best_index);
        if candidate.token_cost > remaining_budget {
            continue;
        }
        remaining_budget -= candidate.token_cost;
        picked.push(candidate);
    }

    picked
}

/// Token cost of a candidate's content, for callers building
/// `RerankCandidate`s from `MemoryRecord`/`AdaptiveMemory` content.
pub fn candidate_token_cost(content: &str) -> usize {
    estimate_tokens(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recency_decays_with_age() {
        assert_eq!(recency(0.0, 7.0), 1.0);
        assert!(recency(7.0, 7.0) < 1.0);
        assert!(recency(14.0, 7.0) < recency(7.0, 7.0));
    }

    #[test]
    fn usage_factor_saturates_at_one() {
        assert_eq!(usage_factor(100, 10.0), 1.0);
        assert!(usage_factor(5, 10.0) < 1.0);
    }

    #[test]
    fn rerank_returns_highest_importance_first() {
        let candidates = vec![
            RerankCandidate { id: "a".into(), importance: 0.9, content: "alpha beta".into(), token_cost: 10 },
            RerankCandidate { id: "b".into(), importance: 0.5, content: "gamma delta".into(), token_cost: 10 },
        ];
        let picked = rerank_by_importance(candidates, 100, 0.3);
        assert_eq!(picked[0].id, "a");
    }

    #[test]
    fn rerank_respects_token_budget() {
        let candidates = vec![
            RerankCandidate { id: "a".into(), importance: 0.9, content: "alpha".into(), token_cost: 60 },
            RerankCandidate { id: "b".into(), importance: 0.8, content: "beta".into(), token_cost: 60 },
        ];
        let picked = rerank_by_importance(candidates, 100, 0.3);
        let total: usize = picked.iter().map(|c| c.token_cost).sum();
        assert!(total <= 100);
    }

    #[test]
    fn rerank_penalizes_near_duplicate_content() {
        let candidates = vec![
            RerankCandidate { id: "a".into(), importance: 0.9, content: "the market will grow fast".into(), token_cost: 5 },
            RerankCandidate { id: "b".into(), importance: 0.85, content: "the market will grow fast".into(), token_cost: 5 },
            RerankCandidate { id: "c".into(), importance: 0.7, content: "prices fell sharply today".into(), token_cost: 5 },
        ];
        let picked = rerank_by_importance(candidates, 15, 0.9);
        assert_eq!(picked[0].id, "a");
        assert_eq!(picked[1].id, "c");
    }

    /// 100 distinct candidates under a 4000-token budget: the pick stays
    /// within budget and leads with the globally highest importance.
    #[test]
    fn rerank_over_one_hundred_candidates_respects_budget_and_orders_by_importance() {
        let candidates: Vec<RerankCandidate> = (0..100)
            .map(|i| RerankCandidate {
                id: format!("mem-{i}"),
                importance: (i as f64) / 100.0,
                content: format!("distinct content token set number {i}"),
                token_cost: 80,
            })
            .collect();

        let picked = rerank_by_importance(candidates, 4000, 0.3);
        let total: usize = picked.iter().map(|c| c.token_cost).sum();
        assert!(total <= 4000);
        assert_eq!(picked[0].id, "mem-99");
    }
}
