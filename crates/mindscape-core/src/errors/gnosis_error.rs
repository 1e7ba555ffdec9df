/// Errors from the epistemic belief graph subsystem (C7-C10).
#[derive(Debug, thiserror::Error)]
pub enum GnosisError {
    #[error("belief not found: {id}")]
    BeliefNotFound { id: String },

    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("concurrent version conflict on belief {id}: expected version {expected}, found {found}")]
    VersionConflict {
        id: String,
        expected: u64,
        found: u64,
    },

    #[error("contradiction not found: {id}")]
    ContradictionNotFound { id: String },
}
