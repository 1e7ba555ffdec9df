//! Per-tenant dashboard counters (§6.1 `get_metrics`). Built entirely from
//! `StorageDriver::count` over the stable key prefixes in `keys`, so any
//! driver gets metrics for free without tracking its own counters.

use serde::{Deserialize, Serialize};

use mindscape_core::errors::MindscapeResult;
use mindscape_core::keys;
use mindscape_core::traits::StorageDriver;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EngineMetrics {
    pub memory_count: u64,
    pub belief_count: u64,
    pub adaptive_memory_count: u64,
    pub contradiction_count: u64,
    pub pending_job_count: u64,
}

impl EngineMetrics {
    pub async fn collect<D: StorageDriver>(driver: &D, tenant: &str) -> MindscapeResult<Self> {
        let contradiction_count = driver
            .get_set_members(&keys::active_contradictions_set(tenant))
            .await?
            .len() as u64;
        Ok(Self {
            memory_count: driver.count(&keys::memory_prefix(tenant)).await?,
            belief_count: driver.count(&keys::belief_prefix(tenant)).await?,
            adaptive_memory_count: driver.count(&keys::adaptive_memory_prefix(tenant)).await?,
            contradiction_count,
            pending_job_count: driver.count(&keys::job_prefix()).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindscape_core::traits::StorageMeta;
    use mindscape_storage::MemoryStorageDriver;

    #[tokio::test]
    async fn collect_reflects_written_records() {
        let driver = MemoryStorageDriver::new();
        driver
            .write(&keys::memory("acme", "m1"), serde_json::json!({}), StorageMeta::new("acme", "memory"))
            .await
            .unwrap();
        driver
            .write(&keys::belief("acme", "b1"), serde_json::json!({}), StorageMeta::new("acme", "belief"))
            .await
            .unwrap();

        let metrics = EngineMetrics::collect(&driver, "acme").await.unwrap();
        assert_eq!(metrics.memory_count, 1);
        assert_eq!(metrics.belief_count, 1);
        assert_eq!(metrics.adaptive_memory_count, 0);
        assert_eq!(metrics.contradiction_count, 0);
    }
}
