//! Temporal layer classification (§3, §4.2).

use serde::{Deserialize, Serialize};

/// Age-derived classification controlling summarisation and token budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Hot,
    Warm,
    Cold,
    Frozen,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Hot => "hot",
            Layer::Warm => "warm",
            Layer::Cold => "cold",
            Layer::Frozen => "frozen",
        }
    }

    pub const ALL: [Layer; 4] = [Layer::Hot, Layer::Warm, Layer::Cold, Layer::Frozen];
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hot" => Ok(Layer::Hot),
            "warm" => Ok(Layer::Warm),
            "cold" => Ok(Layer::Cold),
            "frozen" => Ok(Layer::Frozen),
            other => Err(format!("invalid layer: {other}")),
        }
    }
}
