mod adaptive_memory;
mod audit;
mod belief;
mod claim;
mod confidence_point;
mod contradiction;
mod job;
mod layer;
mod memory_record;
mod outcome;
mod tenant_config;

pub use adaptive_memory::{AdaptiveMemory, SurpriseComponents, SurpriseSignal};
pub use audit::{AuditEntry, AuditMeta, DegradationReason};
pub use belief::{Belief, BeliefState, BeliefVersion, Provenance};
pub use claim::{Claim, Confidence};
pub use confidence_point::ConfidencePoint;
pub use contradiction::{Contradiction, DetectionStrategy};
pub use job::{Job, JobStatus, JobType};
pub use layer::Layer;
pub use memory_record::{MemoryQuery, MemoryRecord};
pub use outcome::{
    CompressionStats, ContextSnapshot, IngestOutcome, LayerView, RetentionRecommendation,
    RetentionReport,
};
pub use tenant_config::{
    CompressionStrategy, PriorityWeights, RetentionPolicy, RetentionWeights, SurpriseWeights,
    TenantConfig,
};
