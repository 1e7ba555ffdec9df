/// Errors from the adaptive layer (C11-C14: surprise, priority, compression,
/// retention).
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("adaptive memory not found: {id}")]
    AdaptiveMemoryNotFound { id: String },

    #[error("invalid compression level: {level}")]
    InvalidCompressionLevel { level: u8 },

    #[error("invalid policy weights for tenant {tenant}: {reason}")]
    InvalidPolicyWeights { tenant: String, reason: String },
}
