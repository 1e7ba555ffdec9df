//! Builder for a standalone `Belief`, for tests that assert against a
//! belief's shape without going through `EpistemicStore::record_belief`.

use chrono::Utc;

use mindscape_core::models::{Belief, BeliefState, Confidence, Provenance};

#[derive(Debug, Clone)]
pub struct BeliefBuilder {
    id: String,
    tenant: String,
    claim_text: String,
    confidence: Confidence,
    state: BeliefState,
    provenance: Provenance,
    version: u64,
}

impl Default for BeliefBuilder {
    fn default() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tenant: "acme".to_string(),
            claim_text: "the sky is blue".to_string(),
            confidence: Confidence::fallback(),
            state: BeliefState::Hypothesis,
            provenance: Provenance {
                source: "fixture".to_string(),
                memory_id: uuid::Uuid::new_v4().to_string(),
                agent: "agent-1".to_string(),
            },
            version: 1,
        }
    }
}

impl BeliefBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = tenant.into();
        self
    }

    pub fn claim_text(mut self, claim_text: impl Into<String>) -> Self {
        self.claim_text = claim_text.into();
        self
    }

    pub fn confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn state(mut self, state: BeliefState) -> Self {
        self.state = state;
        self
    }

    pub fn agent(mut self, agent: impl Into<String>) -> Self {
        self.provenance.agent = agent.into();
        self
    }

    pub fn build(self) -> Belief {
        let now = Utc::now();
        Belief {
            id: self.id,
            tenant: self.tenant,
            claim_text: self.claim_text,
            confidence: self.confidence,
            state: self.state,
            provenance: self.provenance,
            version: self.version,
            created_at: now,
            updated_at: now,
        }
    }
}
