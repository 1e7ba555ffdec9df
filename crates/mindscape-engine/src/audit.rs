//! In-process reference `AuditSink` (C17). Real hosts chain/hash entries in
//! durable storage; this one keeps a per-tenant ordered `Vec` in memory, for
//! tests and single-process deployments (§4.15).

use chrono::Utc;
use dashmap::DashMap;
use serde_json::Value;

use mindscape_core::errors::MindscapeResult;
use mindscape_core::models::{AuditEntry, AuditMeta, DegradationReason};
use mindscape_core::traits::AuditSink;

/// Appends every entry to a per-tenant `Vec`, preserving emission order.
/// Never trims — callers that need bounded memory should swap in a durable
/// sink instead.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    entries: DashMap<String, Vec<AuditEntry>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries_for(&self, tenant: &str) -> Vec<AuditEntry> {
        self.entries.get(tenant).map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for InMemoryAuditSink {
    async fn record(&self, entry: AuditEntry) -> MindscapeResult<()> {
        self.entries.entry(entry.tenant.clone()).or_default().push(entry);
        Ok(())
    }
}

/// Builds and records an `AuditEntry` for `component`/`action` in one call,
/// the shape every orchestrator mutation emits through (§4.15).
pub async fn emit<U: AuditSink>(
    sink: &U,
    tenant: &str,
    component: &str,
    action: &str,
    data: Value,
) -> MindscapeResult<()> {
    sink.record(AuditEntry {
        tenant: tenant.to_string(),
        action: action.to_string(),
        data,
        meta: AuditMeta {
            component: component.to_string(),
            timestamp: Utc::now(),
        },
    })
    .await
}

/// Convenience wrapper for the degraded-path audit emission every component
/// makes when it falls back instead of failing outright (§7).
pub async fn emit_degradation<U: AuditSink>(
    sink: &U,
    tenant: &str,
    component: &str,
    reason: DegradationReason,
) -> MindscapeResult<()> {
    emit(
        sink,
        tenant,
        component,
        "degraded",
        serde_json::json!({ "reason": reason.as_str() }),
    )
    .await
}
