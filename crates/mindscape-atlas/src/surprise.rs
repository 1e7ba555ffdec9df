//! Surprise scoring: novelty, contradiction, evidence, confidence-shift, and
//! disagreement combined into `[0, 1]` (C11, §4.9). Pure, no I/O.

use mindscape_core::models::{SurpriseComponents, SurpriseSignal, SurpriseWeights};

/// Weighted, clamped combination of the surprise components. Weights are
/// renormalised so they sum to 1 regardless of how the tenant configured
/// them (§4.9).
pub fn combine(components: SurpriseComponents, weights: SurpriseWeights) -> f64 {
    let sum = weights.novelty + weights.contradiction + weights.evidence
        + weights.confidence_shift + weights.disagreement;
    let w = if sum > 0.0 { weights } else { SurpriseWeights::default() };
    let sum = if sum > 0.0 {
        sum
    } else {
        w.novelty + w.contradiction + w.evidence + w.confidence_shift + w.disagreement
    };

    let raw = (w.novelty * components.novelty
        + w.contradiction * components.contradiction
        + w.evidence * components.evidence
        + w.confidence_shift * components.confidence_shift
        + w.disagreement * components.disagreement)
        / sum;

    raw.clamp(0.0, 1.0)
}

/// `novelty = 1 - max_similarity_to_recent`; `similarities` are the
/// token-overlap similarities against the last N memories of the same
/// agent (§4.9).
pub fn novelty_from_similarities(similarities: &[f64]) -> f64 {
    let max_similarity = similarities.iter().cloned().fold(0.0_f64, f64::max);
    (1.0 - max_similarity).clamp(0.0, 1.0)
}

/// Final score per §4.9: when an external signal is supplied, internal
/// components act only as a ceiling check — `max(external, internal)`.
/// `internal` is always computed so it can serve as that floor.
pub fn final_score(internal: f64, external: Option<SurpriseSignal>) -> f64 {
    match external {
        Some(signal) => internal.max(signal.magnitude).clamp(0.0, 1.0),
        None => internal.clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn combine_stays_within_unit_interval() {
        let components = SurpriseComponents {
            novelty: 1.0,
            contradiction: 1.0,
            evidence: 1.0,
            confidence_shift: 1.0,
            disagreement: 1.0,
        };
        let score = combine(components, SurpriseWeights::default());
        assert!((0.0..=1.0).contains(&score));
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_components_yield_zero_score() {
        let score = combine(SurpriseComponents::default(), SurpriseWeights::default());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn external_signal_acts_as_a_ceiling_not_a_floor() {
        assert_eq!(final_score(0.2, Some(SurpriseSignal { magnitude: 0.9 })), 0.9);
        assert_eq!(final_score(0.9, Some(SurpriseSignal { magnitude: 0.2 })), 0.9);
    }

    #[test]
    fn novelty_is_inverse_of_max_similarity() {
        assert_eq!(novelty_from_similarities(&[0.3, 0.7, 0.1]), 0.3);
        assert_eq!(novelty_from_similarities(&[]), 1.0);
    }

    proptest::proptest! {
        /// I4: `combine` and `final_score` never leave `[0, 1]`, for any
        /// component values and any external signal.
        #[test]
        fn combined_score_always_stays_in_unit_interval(
            novelty in 0.0_f64..=1.0,
            contradiction in 0.0_f64..=1.0,
            evidence in 0.0_f64..=1.0,
            confidence_shift in 0.0_f64..=1.0,
            disagreement in 0.0_f64..=1.0,
            external in proptest::option::of(0.0_f64..=1.0),
        ) {
            let components = SurpriseComponents { novelty, contradiction, evidence, confidence_shift, disagreement };
            let internal = combine(components, SurpriseWeights::default());
            prop_assert!((0.0..=1.0).contains(&internal));
            let score = final_score(internal, external.map(|magnitude| SurpriseSignal { magnitude }));
            prop_assert!((0.0..=1.0).contains(&score));
            if let Some(magnitude) = external {
                prop_assert!(score >= magnitude - 1e-9);
            }
            prop_assert!(score >= internal - 1e-9);
        }
    }
}
