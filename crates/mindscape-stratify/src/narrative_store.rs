//! Append-only storage of memory records with lineage via parent links
//! (C4, §4.1).

use std::sync::Arc;

use mindscape_core::errors::{MindscapeError, MindscapeResult, StratifyError};
use mindscape_core::keys;
use mindscape_core::models::{MemoryQuery, MemoryRecord};
use mindscape_core::token::estimate_tokens;
use mindscape_core::traits::{MemoryInput, NarrativeStore, StorageDriver, StorageMeta, StorageQuery};

/// `NarrativeStore` backed by any `StorageDriver`. Writes are immutable —
/// a superseding observation links back via `parent_id` instead of
/// overwriting (§4.1).
pub struct DriverNarrativeStore<D: StorageDriver> {
    driver: Arc<D>,
}

impl<D: StorageDriver> DriverNarrativeStore<D> {
    pub fn new(driver: Arc<D>) -> Self {
        Self { driver }
    }
}

impl<D: StorageDriver> NarrativeStore for DriverNarrativeStore<D> {
    async fn store(&self, tenant: &str, agent: &str, input: MemoryInput) -> MindscapeResult<MemoryRecord> {
        if input.content.is_empty() {
            return Err(StratifyError::MissingField { field: "content".into() }.into());
        }

        let record = MemoryRecord {
            id: uuid::Uuid::new_v4().to_string(),
            tenant: tenant.to_string(),
            agent: agent.to_string(),
            record_type: input.record_type,
            content: input.content,
            metadata: input.metadata,
            parent_id: input.parent_id,
            created_at: chrono::Utc::now(),
        };

        let key = keys::memory(tenant, &record.id);
        let value = serde_json::to_value(&record)?;
        self.driver
            .write(&key, value, StorageMeta::new(tenant, "memory").immutable())
            .await?;

        Ok(record)
    }

    async fn retrieve(&self, tenant: &str, query: &MemoryQuery) -> MindscapeResult<Vec<MemoryRecord>> {
        let storage_query = StorageQuery {
            key_prefix: keys::memory_prefix(tenant),
            time_range: query.time_range,
            limit: None,
        };

        let values = self.driver.query(storage_query).await?;
        let mut records: Vec<MemoryRecord> = values
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .filter(|r: &MemoryRecord| {
                query.agent.as_deref().map_or(true, |a| a == r.agent)
                    && query.record_type.as_deref().map_or(true, |t| t == r.record_type)
            })
            .collect();

        records.sort_by_key(|r| r.effective_timestamp());

        if let Some(max_tokens) = query.max_tokens {
            let mut budget = max_tokens;
            let mut bounded = Vec::new();
            for record in records {
                let cost = estimate_tokens(&record.content);
                if cost > budget {
                    break;
                }
                budget -= cost;
                bounded.push(record);
            }
            records = bounded;
        }

        Ok(records)
    }

    async fn get_memory_lineage(&self, tenant: &str, id: &str) -> MindscapeResult<Vec<MemoryRecord>> {
        let mut chain = Vec::new();
        let mut current_id = Some(id.to_string());

        while let Some(id) = current_id {
            let key = keys::memory(tenant, &id);
            let value = self
                .driver
                .read(&key)
                .await?
                .ok_or_else(|| MindscapeError::NotFound(format!("memory {id}")))?;
            let record: MemoryRecord = serde_json::from_value(value)?;
            current_id = record.parent_id.clone();
            chain.push(record);
        }

        chain.reverse();
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindscape_storage::MemoryStorageDriver;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn store() -> DriverNarrativeStore<MemoryStorageDriver> {
        DriverNarrativeStore::new(Arc::new(MemoryStorageDriver::new()))
    }

    #[tokio::test]
    async fn store_rejects_empty_content() {
        let store = store();
        let err = store
            .store(
                "acme",
                "agent-a",
                MemoryInput {
                    record_type: "observation".into(),
                    content: String::new(),
                    metadata: BTreeMap::new(),
                    parent_id: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MindscapeError::Stratify(StratifyError::MissingField { .. })));
    }

    #[tokio::test]
    async fn store_then_retrieve_round_trips() {
        let store = store();
        let record = store
            .store(
                "acme",
                "agent-a",
                MemoryInput {
                    record_type: "observation".into(),
                    content: "the sky is blue".into(),
                    metadata: BTreeMap::new(),
                    parent_id: None,
                },
            )
            .await
            .unwrap();

        let results = store
            .retrieve("acme", &MemoryQuery { agent: Some("agent-a".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, record.id);
    }

    #[tokio::test]
    async fn lineage_walks_parent_chain_oldest_first() {
        let store = store();
        let root = store
            .store(
                "acme",
                "agent-a",
                MemoryInput {
                    record_type: "observation".into(),
                    content: "v1".into(),
                    metadata: BTreeMap::new(),
                    parent_id: None,
                },
            )
            .await
            .unwrap();

        let child = store
            .store(
                "acme",
                "agent-a",
                MemoryInput {
                    record_type: "observation".into(),
                    content: "v2".into(),
                    metadata: BTreeMap::new(),
                    parent_id: Some(root.id.clone()),
                },
            )
            .await
            .unwrap();

        let lineage = store.get_memory_lineage("acme", &child.id).await.unwrap();
        assert_eq!(lineage.len(), 2);
        assert_eq!(lineage[0].id, root.id);
        assert_eq!(lineage[1].id, child.id);
    }

    proptest::proptest! {
        /// I1: any non-empty content survives a store/retrieve round trip
        /// byte-for-byte.
        #[test]
        fn stored_content_round_trips_bytewise(content in "\\PC{1,200}") {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let store = store();
                let record = store
                    .store(
                        "acme",
                        "agent-a",
                        MemoryInput {
                            record_type: "observation".into(),
                            content: content.clone(),
                            metadata: BTreeMap::new(),
                            parent_id: None,
                        },
                    )
                    .await
                    .unwrap();
                prop_assert_eq!(record.content, content);

                let lineage = store.get_memory_lineage("acme", &record.id).await.unwrap();
                prop_assert_eq!(lineage.len(), 1);
                prop_assert_eq!(&lineage[0].content, &record.content);
                Ok(())
            })?;
        }
    }
}
