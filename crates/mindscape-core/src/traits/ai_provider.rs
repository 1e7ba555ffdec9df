//! The external AI provider contract (§6). Every method is a pure function
//! from the core's perspective — no side effects on the substrate — and
//! every method may fail; the core is contractually required to degrade
//! (§7).

use serde::{Deserialize, Serialize};

use crate::errors::MindscapeResult;
use crate::models::Confidence;

/// Options accepted by `AiProvider::summarize`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizeOptions {
    pub level: u8,
    pub target_compression: f64,
    pub delta_mode: bool,
    pub previous_summary: Option<String>,
    pub preserve_contradictions: bool,
    pub preserve_rejected_ideas: bool,
    pub preserve_decisions: bool,
}

/// An extracted entity, returned by `AiProvider::extract_entities`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedEntity {
    pub entity: String,
    pub entity_type: String,
    pub attributes: serde_json::Value,
}

/// A single chat message for `AiProvider::chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[allow(async_fn_in_trait)]
pub trait AiProvider: Send + Sync {
    async fn summarize(&self, content: &str, options: SummarizeOptions) -> MindscapeResult<String>;

    async fn score_epistemic_confidence(
        &self,
        claim: &str,
        context: &str,
    ) -> MindscapeResult<Confidence>;

    /// Returns `Ok(None)` for a semantic "don't know", distinct from `Err`
    /// which signals a transport/provider failure (§4.8).
    async fn detect_contradiction(&self, a: &str, b: &str) -> MindscapeResult<Option<bool>>;

    async fn extract_entities(&self, text: &str) -> MindscapeResult<Vec<ExtractedEntity>>;

    async fn chat(
        &self,
        messages: &[ChatMessage],
        system: Option<&str>,
        temperature: f32,
    ) -> MindscapeResult<String>;
}
