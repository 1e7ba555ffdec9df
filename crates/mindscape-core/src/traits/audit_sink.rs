//! The external audit sink contract (§4.15, §6). The core emits events in
//! the same task that performed the mutation; the sink owns hash-chaining.

use crate::errors::MindscapeResult;
use crate::models::AuditEntry;

#[allow(async_fn_in_trait)]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> MindscapeResult<()>;
}
