/// Errors from the narrative/temporal stratification subsystem (C2-C6).
#[derive(Debug, thiserror::Error)]
pub enum StratifyError {
    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("memory not found: {id}")]
    MemoryNotFound { id: String },

    #[error("summarization failed: {0}")]
    SummarizationFailed(String),

    #[error("invalid layer: {layer}")]
    InvalidLayer { layer: String },
}
