//! The key/value driver contract (C1, §6). Implementable over Redis, SQL,
//! or filesystem; `mindscape-storage::MemoryStorageDriver` is the reference
//! in-process implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::MindscapeResult;

/// Metadata attached to a write. `immutable: true` means the driver must
/// reject any subsequent overwrite of the same key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageMeta {
    pub tenant: String,
    pub value_type: String,
    pub immutable: bool,
}

impl StorageMeta {
    pub fn new(tenant: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            value_type: value_type.into(),
            immutable: false,
        }
    }

    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }
}

/// Filters accepted by `StorageDriver::query` (§6). A prefix scan combined
/// with an optional timestamp range and result cap.
#[derive(Debug, Clone, Default)]
pub struct StorageQuery {
    pub key_prefix: String,
    pub time_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub limit: Option<usize>,
}

/// Namespaced write/read/query/count driver contract, with optional
/// batch and set-membership operations a driver may decline to support
/// (see `mindscape_storage::capability` for emulation helpers).
#[allow(async_fn_in_trait)]
pub trait StorageDriver: Send + Sync {
    async fn write(&self, key: &str, value: Value, meta: StorageMeta) -> MindscapeResult<()>;

    async fn write_multi(&self, items: Vec<(String, Value, StorageMeta)>) -> MindscapeResult<()> {
        for (key, value, meta) in items {
            self.write(&key, value, meta).await?;
        }
        Ok(())
    }

    async fn read(&self, key: &str) -> MindscapeResult<Option<Value>>;

    async fn read_multi(&self, keys: &[String]) -> MindscapeResult<Vec<Option<Value>>> {
        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            out.push(self.read(key).await?);
        }
        Ok(out)
    }

    async fn query(&self, query: StorageQuery) -> MindscapeResult<Vec<Value>>;

    async fn count(&self, key_prefix: &str) -> MindscapeResult<u64>;

    async fn exists(&self, key: &str) -> MindscapeResult<bool>;

    async fn get_metadata(&self, key: &str) -> MindscapeResult<Option<StorageMeta>>;

    async fn add_to_set(&self, set_key: &str, member: &str) -> MindscapeResult<()> {
        let _ = (set_key, member);
        Err(crate::errors::StorageError::UnsupportedCapability {
            capability: "set".into(),
        }
        .into())
    }

    async fn remove_from_set(&self, set_key: &str, member: &str) -> MindscapeResult<()> {
        let _ = (set_key, member);
        Err(crate::errors::StorageError::UnsupportedCapability {
            capability: "set".into(),
        }
        .into())
    }

    async fn get_set_members(&self, set_key: &str) -> MindscapeResult<Vec<String>> {
        let _ = set_key;
        Ok(Vec::new())
    }

    async fn is_set_member(&self, set_key: &str, member: &str) -> MindscapeResult<bool> {
        Ok(self.get_set_members(set_key).await?.iter().any(|m| m == member))
    }
}
