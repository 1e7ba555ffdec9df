mod atlas_error;
mod gnosis_error;
mod mindscape_error;
mod storage_error;
mod stratify_error;

pub use atlas_error::AtlasError;
pub use gnosis_error::GnosisError;
pub use mindscape_error::{MindscapeError, MindscapeResult};
pub use storage_error::StorageError;
pub use stratify_error::StratifyError;
