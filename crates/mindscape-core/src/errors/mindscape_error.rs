use super::{AtlasError, GnosisError, StorageError, StratifyError};

/// Top-level error type for the mindscape memory substrate.
/// All subsystem errors convert into this via `From` impls; it also carries
/// the cross-cutting taxonomy entries from §7 that aren't owned by any one
/// subsystem (`InvalidInput`, `Conflict`, `Cancelled`, `AIUnavailable`).
#[derive(Debug, thiserror::Error)]
pub enum MindscapeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    #[error("AI provider unavailable: {0}")]
    AiUnavailable(String),

    #[error("concurrency conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("stratification error: {0}")]
    Stratify(#[from] StratifyError),

    #[error("epistemic graph error: {0}")]
    Gnosis(#[from] GnosisError),

    #[error("adaptive layer error: {0}")]
    Atlas(#[from] AtlasError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Convenience type alias, mirroring the teacher's `CortexResult`.
pub type MindscapeResult<T> = Result<T, MindscapeError>;

impl MindscapeError {
    /// True for errors the orchestrator recovers from locally per §7's
    /// propagation policy (AIUnavailable always; StorageUnavailable only on
    /// the caller's first retry attempt — this just identifies the class).
    pub fn is_ai_unavailable(&self) -> bool {
        matches!(self, MindscapeError::AiUnavailable(_))
    }

    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, MindscapeError::StorageUnavailable(_))
    }
}
