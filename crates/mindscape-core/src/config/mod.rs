//! Subsystem configuration, aggregated into one `EngineConfig` that mirrors
//! the teacher's `CortexConfig::from_toml` loading pattern.

mod atlas_config;
mod dispatcher_config;
mod gnosis_config;
mod stratify_config;

pub use atlas_config::AtlasConfig;
pub use dispatcher_config::DispatcherConfig;
pub use gnosis_config::GnosisConfig;
pub use stratify_config::StratifyConfig;

use serde::{Deserialize, Serialize};

use crate::errors::MindscapeResult;

/// Top-level engine configuration, deserializable from TOML with
/// `#[serde(default)]` on every subsystem sub-struct so a host may supply
/// only the fields it wants to override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub stratify: StratifyConfig,
    pub gnosis: GnosisConfig,
    pub atlas: AtlasConfig,
    pub dispatcher: DispatcherConfig,
}

impl EngineConfig {
    pub fn from_toml(raw: &str) -> MindscapeResult<Self> {
        Ok(toml::from_str(raw)?)
    }
}
