//! Background work items for the dispatcher/worker loop (§4.14).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of background work a `Job` represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Summarize,
    EvaluateRetention,
}

/// A job's lifecycle status. Transitions: `pending -> running -> {done,
/// failed}`, with `running -> pending` on a lost claim (§4.14).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Done,
    Failed,
}

/// One unit of background work, stored under `job:{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub tenant: String,
    pub job_type: JobType,
    pub status: JobStatus,
    pub attempts: u32,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// A job failing this many times is marked `failed` terminally (§4.14).
    pub const MAX_ATTEMPTS: u32 = 5;
}
