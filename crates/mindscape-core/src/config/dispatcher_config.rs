//! Tunables for the job dispatcher and worker loop (§4.14).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// A job failing this many times is marked `failed` terminally.
    pub max_attempts: u32,
    /// Bounded worker concurrency per tenant; jobs beyond this queue in
    /// storage (§5 Backpressure).
    pub worker_concurrency_per_tenant: usize,
    /// Poll interval for drivers without a native queue primitive.
    pub poll_interval_ms: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            worker_concurrency_per_tenant: 4,
            poll_interval_ms: 250,
        }
    }
}
