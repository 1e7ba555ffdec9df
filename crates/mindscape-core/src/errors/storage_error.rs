/// Errors surfaced by a `StorageDriver` implementation (§6, §7).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("driver failed: {0}")]
    DriverFailed(String),

    #[error("key not found: {key}")]
    NotFound { key: String },

    #[error("attempted overwrite of immutable key: {key}")]
    ImmutableViolation { key: String },

    #[error("driver does not support this capability: {capability}")]
    UnsupportedCapability { capability: String },
}
