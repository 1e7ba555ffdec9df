//! `dashmap`-backed reference `StorageDriver` (C1) used by tests and
//! single-process deployments.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::Value;

use mindscape_core::errors::{MindscapeError, MindscapeResult, StorageError};
use mindscape_core::traits::{StorageDriver, StorageMeta, StorageQuery};

use crate::time_index::TimeIndex;

fn extract_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let obj = value.as_object()?;
    let raw = obj
        .get("created_at")
        .or_else(|| obj.get("timestamp"))?
        .as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// An in-process, namespace-agnostic key/value store. Values are opaque
/// JSON; the driver extracts a `created_at`/`timestamp` field on write (if
/// present) to feed the time index used by range queries.
#[derive(Debug, Default)]
pub struct MemoryStorageDriver {
    entries: DashMap<String, (Value, StorageMeta)>,
    sets: DashMap<String, Vec<String>>,
    time_index: TimeIndex,
}

impl MemoryStorageDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageDriver for MemoryStorageDriver {
    async fn write(&self, key: &str, value: Value, meta: StorageMeta) -> MindscapeResult<()> {
        if let Some(existing) = self.entries.get(key) {
            if existing.1.immutable {
                return Err(StorageError::ImmutableViolation { key: key.to_string() }.into());
            }
        }
        if let Some(ts) = extract_timestamp(&value) {
            self.time_index.insert(key, ts);
        }
        self.entries.insert(key.to_string(), (value, meta));
        Ok(())
    }

    async fn read(&self, key: &str) -> MindscapeResult<Option<Value>> {
        Ok(self.entries.get(key).map(|entry| entry.0.clone()))
    }

    async fn query(&self, query: StorageQuery) -> MindscapeResult<Vec<Value>> {
        let mut keys: Vec<String> = if let Some(range) = query.time_range {
            self.time_index
                .query(range.0, range.1)
                .into_iter()
                .filter(|key| key.starts_with(&query.key_prefix))
                .collect()
        } else {
            self.entries
                .iter()
                .map(|entry| entry.key().clone())
                .filter(|key| key.starts_with(&query.key_prefix))
                .collect()
        };

        if let Some(limit) = query.limit {
            keys.truncate(limit);
        }

        Ok(keys
            .into_iter()
            .filter_map(|key| self.entries.get(&key).map(|entry| entry.0.clone()))
            .collect())
    }

    async fn count(&self, key_prefix: &str) -> MindscapeResult<u64> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(key_prefix))
            .count() as u64)
    }

    async fn exists(&self, key: &str) -> MindscapeResult<bool> {
        Ok(self.entries.contains_key(key))
    }

    async fn get_metadata(&self, key: &str) -> MindscapeResult<Option<StorageMeta>> {
        Ok(self.entries.get(key).map(|entry| entry.1.clone()))
    }

    async fn add_to_set(&self, set_key: &str, member: &str) -> MindscapeResult<()> {
        let mut members = self.sets.entry(set_key.to_string()).or_default();
        if !members.iter().any(|m| m == member) {
            members.push(member.to_string());
        }
        Ok(())
    }

    async fn remove_from_set(&self, set_key: &str, member: &str) -> MindscapeResult<()> {
        if let Some(mut members) = self.sets.get_mut(set_key) {
            members.retain(|m| m != member);
        }
        Ok(())
    }

    async fn get_set_members(&self, set_key: &str) -> MindscapeResult<Vec<String>> {
        Ok(self
            .sets
            .get(set_key)
            .map(|members| members.clone())
            .unwrap_or_default())
    }

    async fn is_set_member(&self, set_key: &str, member: &str) -> MindscapeResult<bool> {
        Ok(self
            .sets
            .get(set_key)
            .is_some_and(|members| members.iter().any(|m| m == member)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let driver = MemoryStorageDriver::new();
        driver
            .write("mindscape:acme:memory:1", json!({"content": "hello"}), StorageMeta::new("acme", "memory"))
            .await
            .unwrap();

        let read = driver.read("mindscape:acme:memory:1").await.unwrap();
        assert_eq!(read, Some(json!({"content": "hello"})));
    }

    #[tokio::test]
    async fn immutable_key_rejects_overwrite() {
        let driver = MemoryStorageDriver::new();
        driver
            .write(
                "gnosis:acme:belief:1:version:1",
                json!({"state": "hypothesis"}),
                StorageMeta::new("acme", "belief_version").immutable(),
            )
            .await
            .unwrap();

        let err = driver
            .write(
                "gnosis:acme:belief:1:version:1",
                json!({"state": "accepted"}),
                StorageMeta::new("acme", "belief_version").immutable(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MindscapeError::StorageUnavailable(StorageError::ImmutableViolation { .. })
        ));
    }

    #[tokio::test]
    async fn query_filters_by_prefix() {
        let driver = MemoryStorageDriver::new();
        driver
            .write("mindscape:acme:memory:1", json!({"content": "a"}), StorageMeta::new("acme", "memory"))
            .await
            .unwrap();
        driver
            .write("mindscape:other:memory:1", json!({"content": "b"}), StorageMeta::new("other", "memory"))
            .await
            .unwrap();

        let results = driver
            .query(StorageQuery {
                key_prefix: "mindscape:acme:".into(),
                time_range: None,
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn set_membership_add_remove() {
        let driver = MemoryStorageDriver::new();
        driver.add_to_set("contradictions:acme:active", "c1").await.unwrap();
        assert!(driver.is_set_member("contradictions:acme:active", "c1").await.unwrap());

        driver.remove_from_set("contradictions:acme:active", "c1").await.unwrap();
        assert!(!driver.is_set_member("contradictions:acme:active", "c1").await.unwrap());
    }
}
