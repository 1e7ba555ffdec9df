//! # test-fixtures
//!
//! Builders and test doubles shared by every crate's integration suite: a
//! pre-seeded `MemoryStorageDriver` harness, a deterministic `NullAiProvider`
//! that always reports unavailable (so degraded paths are exercised by
//! default), a `ScriptedAiProvider` for tests that need specific answers, and
//! builders for `MemoryRecord`/`Belief`/`TenantConfig`.

pub mod ai_provider;
pub mod belief;
pub mod memory_record;
pub mod tenant_config;

pub use ai_provider::{NullAiProvider, ScriptedAiProvider};
pub use belief::BeliefBuilder;
pub use memory_record::MemoryInputBuilder;
pub use tenant_config::tenant_config_with_tenant;

use std::sync::Arc;

use mindscape_storage::MemoryStorageDriver;

/// A freshly constructed, empty driver wrapped in the `Arc` every component
/// trait expects. Most tests start here and seed whatever records they need
/// through the leaf-crate stores directly, rather than writing raw JSON.
pub fn empty_driver() -> Arc<MemoryStorageDriver> {
    Arc::new(MemoryStorageDriver::new())
}
