//! Test doubles for `AiProvider`. `NullAiProvider` always reports
//! unavailable, so a test using it by default exercises every fallback path
//! (§7) without having to wire failure injection explicitly.
//! `ScriptedAiProvider` returns fixed answers for tests asserting on the
//! AI-preferred path.

use mindscape_core::errors::{MindscapeError, MindscapeResult};
use mindscape_core::models::Confidence;
use mindscape_core::traits::{AiProvider, ChatMessage, ExtractedEntity, SummarizeOptions};

#[derive(Debug, Default)]
pub struct NullAiProvider;

impl AiProvider for NullAiProvider {
    async fn summarize(&self, _content: &str, _options: SummarizeOptions) -> MindscapeResult<String> {
        Err(MindscapeError::AiUnavailable("no provider configured".into()))
    }

    async fn score_epistemic_confidence(&self, _claim: &str, _context: &str) -> MindscapeResult<Confidence> {
        Err(MindscapeError::AiUnavailable("no provider configured".into()))
    }

    async fn detect_contradiction(&self, _a: &str, _b: &str) -> MindscapeResult<Option<bool>> {
        Ok(None)
    }

    async fn extract_entities(&self, _text: &str) -> MindscapeResult<Vec<ExtractedEntity>> {
        Err(MindscapeError::AiUnavailable("no provider configured".into()))
    }

    async fn chat(&self, _messages: &[ChatMessage], _system: Option<&str>, _temperature: f32) -> MindscapeResult<String> {
        Err(MindscapeError::AiUnavailable("no provider configured".into()))
    }
}

/// Fixed answers, configured up front. Each field defaults to `None`, which
/// falls back to `NullAiProvider`'s unavailable behaviour for that method —
/// tests only need to script the calls they actually care about.
#[derive(Debug, Default)]
pub struct ScriptedAiProvider {
    pub summary: Option<String>,
    pub confidence: Option<Confidence>,
    pub contradiction: Option<Option<bool>>,
    pub entities: Option<Vec<ExtractedEntity>>,
    pub chat_reply: Option<String>,
}

impl ScriptedAiProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_contradiction(mut self, contradiction: Option<bool>) -> Self {
        self.contradiction = Some(contradiction);
        self
    }

    pub fn with_chat_reply(mut self, reply: impl Into<String>) -> Self {
        self.chat_reply = Some(reply.into());
        self
    }
}

impl AiProvider for ScriptedAiProvider {
    async fn summarize(&self, content: &str, _options: SummarizeOptions) -> MindscapeResult<String> {
        Ok(self.summary.clone().unwrap_or_else(|| content.to_string()))
    }

    async fn score_epistemic_confidence(&self, _claim: &str, _context: &str) -> MindscapeResult<Confidence> {
        self.confidence
            .ok_or_else(|| MindscapeError::AiUnavailable("confidence not scripted".into()))
    }

    async fn detect_contradiction(&self, _a: &str, _b: &str) -> MindscapeResult<Option<bool>> {
        Ok(self.contradiction.flatten())
    }

    async fn extract_entities(&self, _text: &str) -> MindscapeResult<Vec<ExtractedEntity>> {
        Ok(self.entities.clone().unwrap_or_default())
    }

    async fn chat(&self, _messages: &[ChatMessage], _system: Option<&str>, _temperature: f32) -> MindscapeResult<String> {
        self.chat_reply
            .clone()
            .ok_or_else(|| MindscapeError::AiUnavailable("chat reply not scripted".into()))
    }
}
