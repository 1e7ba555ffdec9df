//! Claim and confidence-interval types (§3).

use serde::{Deserialize, Serialize};

use crate::errors::MindscapeError;

/// A claim embedded in an ingest payload. Not stored as its own entity — it
/// becomes a `Belief` once recorded (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub text: String,
    /// Filled by the AI provider if omitted; defaults to `{0.3, 0.7, 0.5}`
    /// if the provider is unavailable (§3, §7).
    pub confidence: Option<Confidence>,
}

/// A confidence interval with an invariant `0 <= min <= mean <= max <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl Confidence {
    /// Construct a validated confidence interval.
    pub fn new(min: f64, max: f64, mean: f64) -> Result<Self, MindscapeError> {
        if !(0.0..=1.0).contains(&min)
            || !(0.0..=1.0).contains(&max)
            || !(0.0..=1.0).contains(&mean)
        {
            return Err(MindscapeError::InvalidInput(
                "confidence values must be within [0, 1]".into(),
            ));
        }
        if !(min <= mean && mean <= max) {
            return Err(MindscapeError::InvalidInput(
                "confidence must satisfy min <= mean <= max".into(),
            ));
        }
        Ok(Self { min, max, mean })
    }

    /// The default confidence used when the AI provider is unavailable (§3, §7).
    pub fn fallback() -> Self {
        Self {
            min: 0.3,
            max: 0.7,
            mean: 0.5,
        }
    }
}
