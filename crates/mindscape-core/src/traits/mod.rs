//! Trait interfaces external collaborators implement, plus the component
//! traits `mindscape-engine` composes over (§4.16).
//!
//! Every trait follows the teacher's `ITemporalEngine` shape: native
//! `async fn` in trait (`#[allow(async_fn_in_trait)]`), `Send + Sync`
//! bound, every fallible method returns `MindscapeResult<T>`.

mod adaptive_layer;
mod ai_provider;
mod audit_sink;
mod epistemic_store;
mod narrative_store;
mod storage_driver;
mod summariser;
mod temporal_stratifier;

pub use adaptive_layer::AdaptiveLayer;
pub use ai_provider::{AiProvider, ChatMessage, ExtractedEntity, SummarizeOptions};
pub use audit_sink::AuditSink;
pub use epistemic_store::EpistemicStore;
pub use narrative_store::{MemoryInput, NarrativeStore};
pub use storage_driver::{StorageDriver, StorageMeta, StorageQuery};
pub use summariser::Summariser;
pub use temporal_stratifier::{StratifiedContext, TemporalStratifier};
