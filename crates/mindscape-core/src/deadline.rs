//! The one place cancellation is implemented (§5.1): every public operation
//! accepts a deadline, and every suspension point across `StorageDriver`,
//! `AiProvider`, and `AuditSink` calls is wrapped through this helper,
//! mirroring the way the teacher's connection pools wrap blocking work
//! behind a single async seam.

use tokio::time::Instant;

use crate::errors::{MindscapeError, MindscapeResult};

/// Races `fut` against `deadline`. On timeout, returns `Cancelled`; already
/// durable side effects up to that point remain, since append-only
/// semantics make abandoning the in-flight call safe. No rollback is
/// attempted.
pub async fn with_deadline<F, T>(fut: F, deadline: Option<Instant>) -> MindscapeResult<T>
where
    F: std::future::Future<Output = MindscapeResult<T>>,
{
    match deadline {
        None => fut.await,
        Some(deadline) => match tokio::time::timeout_at(deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(MindscapeError::Cancelled),
        },
    }
}
