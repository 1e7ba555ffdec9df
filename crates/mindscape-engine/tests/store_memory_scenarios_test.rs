//! Scenario coverage for the orchestrator's `store_memory`/`build_context`/
//! `update_belief`: FSM happy path, heuristic contradiction detection, and
//! mid-ingest cancellation.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use mindscape_core::config::{EngineConfig, StratifyConfig};
use mindscape_core::errors::{MindscapeError, MindscapeResult};
use mindscape_core::models::{BeliefState, Claim, Confidence, JobType, Layer};
use mindscape_core::traits::{MemoryInput, StorageDriver, StorageMeta, StorageQuery};
use mindscape_engine::{Engine, InMemoryAuditSink};
use mindscape_storage::MemoryStorageDriver;
use test_fixtures::NullAiProvider;

fn claim(text: &str, confidence: Confidence) -> Claim {
    Claim { text: text.to_string(), confidence: Some(confidence) }
}

fn engine(driver: Arc<MemoryStorageDriver>) -> Engine<MemoryStorageDriver, NullAiProvider, InMemoryAuditSink> {
    Engine::new(driver, Arc::new(NullAiProvider), Arc::new(InMemoryAuditSink::new()), EngineConfig::default())
}

/// S1 — FSM happy path: hypothesis -> accepted is a valid transition and
/// bumps the version; hypothesis -> hypothesis directly is not.
#[tokio::test]
async fn s1_fsm_happy_path_and_rejected_direct_transition() {
    let engine = engine(Arc::new(MemoryStorageDriver::new()));
    let outcome = engine
        .store_memory(
            "acme",
            "agent-a",
            MemoryInput { record_type: "episodic".into(), content: "observation".into(), metadata: Default::default(), parent_id: None },
            vec![claim("Pattern X contradicts theory Y", Confidence::new(0.8, 0.95, 0.9).unwrap())],
            None,
            None,
        )
        .await
        .unwrap();

    assert_eq!(outcome.belief_ids.len(), 1);
    let belief_id = &outcome.belief_ids[0];

    engine
        .update_belief("acme", belief_id, BeliefState::Accepted, Some("peer reviewed".into()))
        .await
        .unwrap();

    let err = engine.update_belief("acme", belief_id, BeliefState::Hypothesis, None).await.unwrap_err();
    assert!(matches!(err, MindscapeError::Gnosis(_)));
}

/// S3 — two contradictory claims ingested separately are heuristically
/// detected (no AI provider configured) and surface as one active
/// contradiction in the next context build.
#[tokio::test]
async fn s3_heuristic_contradiction_surfaces_in_context() {
    let engine = engine(Arc::new(MemoryStorageDriver::new()));

    engine
        .store_memory(
            "acme",
            "agent-a",
            MemoryInput { record_type: "episodic".into(), content: "claim a".into(), metadata: Default::default(), parent_id: None },
            vec![claim("The market will grow", Confidence::new(0.6, 0.9, 0.75).unwrap())],
            None,
            None,
        )
        .await
        .unwrap();
    engine
        .store_memory(
            "acme",
            "agent-a",
            MemoryInput { record_type: "episodic".into(), content: "claim b".into(), metadata: Default::default(), parent_id: None },
            vec![claim("The market will not grow", Confidence::new(0.6, 0.9, 0.75).unwrap())],
            None,
            None,
        )
        .await
        .unwrap();

    let context = engine.build_context("acme", "agent-a", 10_000, "market", None).await.unwrap();
    assert_eq!(context.active_contradictions.len(), 1);
}

/// A `StorageDriver` that delays writes whose key targets the belief
/// namespace, so a caller can race a deadline against the belief-recording
/// sub-step specifically while the memory-append sub-step stays instant.
#[derive(Debug, Default)]
struct SlowBeliefDriver {
    inner: MemoryStorageDriver,
}

impl StorageDriver for SlowBeliefDriver {
    async fn write(&self, key: &str, value: Value, meta: StorageMeta) -> MindscapeResult<()> {
        if key.contains(":belief:") {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        self.inner.write(key, value, meta).await
    }

    async fn read(&self, key: &str) -> MindscapeResult<Option<Value>> {
        self.inner.read(key).await
    }

    async fn query(&self, query: StorageQuery) -> MindscapeResult<Vec<Value>> {
        self.inner.query(query).await
    }

    async fn count(&self, key_prefix: &str) -> MindscapeResult<u64> {
        self.inner.count(key_prefix).await
    }

    async fn exists(&self, key: &str) -> MindscapeResult<bool> {
        self.inner.exists(key).await
    }

    async fn get_metadata(&self, key: &str) -> MindscapeResult<Option<StorageMeta>> {
        self.inner.get_metadata(key).await
    }
}

/// S6 — cancellation between the memory append and belief recording yields
/// a partial outcome: the memory record exists, no belief was recorded, and
/// `degraded` names the cancellation.
#[tokio::test]
async fn s6_cancellation_between_append_and_belief_recording() {
    let driver = Arc::new(SlowBeliefDriver::default());
    let engine = Engine::new(driver.clone(), Arc::new(NullAiProvider), Arc::new(InMemoryAuditSink::new()), EngineConfig::default());

    let deadline = tokio::time::Instant::now() + Duration::from_millis(30);
    let outcome = engine
        .store_memory(
            "acme",
            "agent-a",
            MemoryInput { record_type: "episodic".into(), content: "observation".into(), metadata: Default::default(), parent_id: None },
            vec![claim("a claim", Confidence::fallback())],
            None,
            Some(deadline),
        )
        .await
        .unwrap();

    assert!(outcome.belief_ids.is_empty());
    assert_eq!(outcome.surprise_score, None);
    assert_eq!(outcome.degraded, vec![mindscape_core::models::DegradationReason::BeliefRecordingCancelled]);

    let stored = driver.read(&mindscape_core::keys::memory("acme", &outcome.memory_id)).await.unwrap();
    assert!(stored.is_some());

    let beliefs = driver.query(StorageQuery { key_prefix: mindscape_core::keys::belief_prefix("acme"), time_range: None, limit: None }).await.unwrap();
    assert!(beliefs.is_empty());
}

/// Ingesting a warm-aged record crosses `warm_count_threshold`, dispatching
/// a `Summarize` job; running it through `Engine::run_job` writes a stored
/// summary that a subsequent `build_context` picks up for that layer.
#[tokio::test]
async fn summarize_job_dispatched_on_ingest_is_executed_by_run_job() {
    let driver = Arc::new(MemoryStorageDriver::new());
    let config = EngineConfig {
        stratify: StratifyConfig { warm_count_threshold: 1, ..StratifyConfig::default() },
        ..EngineConfig::default()
    };
    let engine = Engine::new(driver.clone(), Arc::new(NullAiProvider), Arc::new(InMemoryAuditSink::new()), config);

    let warm_timestamp = (chrono::Utc::now() - chrono::Duration::days(2)).to_rfc3339();
    let mut metadata = std::collections::BTreeMap::new();
    metadata.insert("timestamp".to_string(), serde_json::Value::String(warm_timestamp));

    engine
        .store_memory(
            "acme",
            "agent-a",
            MemoryInput { record_type: "episodic".into(), content: "an aging observation".into(), metadata, parent_id: None },
            vec![],
            None,
            None,
        )
        .await
        .unwrap();

    let processed = engine
        .dispatcher()
        .run_once("acme", |job| async {
            assert_eq!(job.job_type, JobType::Summarize);
            engine.run_job(job).await
        })
        .await
        .unwrap();
    assert_eq!(processed, 1);

    let stored = driver.read(&mindscape_core::keys::summary("acme", Layer::Warm.as_str())).await.unwrap();
    assert!(stored.is_some());
}
