//! Builder for `MemoryInput`, the payload `NarrativeStore::store` accepts.

use std::collections::BTreeMap;

use serde_json::Value;

use mindscape_core::traits::MemoryInput;

#[derive(Debug, Clone)]
pub struct MemoryInputBuilder {
    record_type: String,
    content: String,
    metadata: BTreeMap<String, Value>,
    parent_id: Option<String>,
}

impl Default for MemoryInputBuilder {
    fn default() -> Self {
        Self {
            record_type: "episodic".to_string(),
            content: "a test memory".to_string(),
            metadata: BTreeMap::new(),
            parent_id: None,
        }
    }
}

impl MemoryInputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = record_type.into();
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn parent_id(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn build(self) -> MemoryInput {
        MemoryInput {
            record_type: self.record_type,
            content: self.content,
            metadata: self.metadata,
            parent_id: self.parent_id,
        }
    }
}
