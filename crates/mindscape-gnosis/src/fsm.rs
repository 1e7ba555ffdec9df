//! The belief lifecycle transition table (C7, §4.7). Pure, no I/O.

use mindscape_core::models::BeliefState;

/// Whether `from -> to` is a member of the fixed transition table. Only
/// these edges are valid; any other attempt is `InvalidTransition`.
pub fn allowed_transition(from: BeliefState, to: BeliefState) -> bool {
    use BeliefState::*;
    matches!(
        (from, to),
        (Hypothesis, Accepted)
            | (Hypothesis, Contested)
            | (Hypothesis, Rejected)
            | (Accepted, Contested)
            | (Accepted, Deprecated)
            | (Contested, Accepted)
            | (Contested, Rejected)
            | (Contested, Deprecated)
            | (Deprecated, Contested)
            | (Rejected, Hypothesis)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use BeliefState::*;

    #[test]
    fn hypothesis_may_advance_to_three_states() {
        assert!(allowed_transition(Hypothesis, Accepted));
        assert!(allowed_transition(Hypothesis, Contested));
        assert!(allowed_transition(Hypothesis, Rejected));
        assert!(!allowed_transition(Hypothesis, Deprecated));
    }

    #[test]
    fn deprecated_only_returns_to_contested() {
        assert!(allowed_transition(Deprecated, Contested));
        assert!(!allowed_transition(Deprecated, Accepted));
        assert!(!allowed_transition(Deprecated, Rejected));
        assert!(!allowed_transition(Deprecated, Hypothesis));
    }

    #[test]
    fn rejected_can_only_restart_as_hypothesis() {
        assert!(allowed_transition(Rejected, Hypothesis));
        assert!(!allowed_transition(Rejected, Accepted));
    }

    #[test]
    fn no_state_transitions_to_itself() {
        for state in [Hypothesis, Accepted, Contested, Deprecated, Rejected] {
            assert!(!allowed_transition(state, state));
        }
    }
}
