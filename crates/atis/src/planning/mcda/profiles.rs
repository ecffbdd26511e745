use serde::{Deserialize, Serialize};

use super::weights::CriterionWeights;

/// Named weight presets for common kinds of traveller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightProfile {
    Commuter,
    Budget,
    Eco,
    Comfort,
    Reliable,
    #[default]
    Balanced,
}

impl WeightProfile {
    pub const ALL: [WeightProfile; 6] = [
        WeightProfile::Commuter,
        WeightProfile::Budget,
        WeightProfile::Eco,
        WeightProfile::Comfort,
        WeightProfile::Reliable,
        WeightProfile::Balanced,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "commuter" => Some(Self::Commuter),
            "budget" => Some(Self::Budget),
            "eco" => Some(Self::Eco),
            "comfort" => Some(Self::Comfort),
            "reliable" => Some(Self::Reliable),
            "balanced" => Some(Self::Balanced),
            _ => None,
        }
    }

    /// Unrecognised names resolve to [`WeightProfile::Balanced`].
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Commuter => "commuter",
            Self::Budget => "budget",
            Self::Eco => "eco",
            Self::Comfort => "comfort",
            Self::Reliable => "reliable",
            Self::Balanced => "balanced",
        }
    }

    pub const fn weights(self) -> CriterionWeights {
        match self {
            Self::Commuter => CriterionWeights::new(0.45, 0.15, 0.25, 0.15, 0.0),
            Self::Budget => CriterionWeights::new(0.20, 0.50, 0.10, 0.10, 0.10),
            Self::Eco => CriterionWeights::new(0.20, 0.10, 0.15, 0.15, 0.40),
            Self::Comfort => CriterionWeights::new(0.25, 0.15, 0.40, 0.15, 0.05),
            Self::Reliable => CriterionWeights::new(0.25, 0.15, 0.20, 0.35, 0.05),
            Self::Balanced => CriterionWeights::new(0.35, 0.20, 0.20, 0.15, 0.10),
        }
    }
}

pub fn profile_weights(name: &str) -> CriterionWeights {
    WeightProfile::from_name(name).weights()
}

/// Caller's choice of weights: explicit weights win over a profile name, and
/// the fallback profile applies when neither is given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightSelection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<CriterionWeights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

impl WeightSelection {
    pub fn profile(name: impl Into<String>) -> Self {
        Self {
            weights: None,
            profile: Some(name.into()),
        }
    }

    pub fn explicit(weights: CriterionWeights) -> Self {
        Self {
            weights: Some(weights),
            profile: None,
        }
    }

    pub fn resolve(&self, fallback: WeightProfile) -> CriterionWeights {
        match (&self.weights, &self.profile) {
            (Some(weights), _) => *weights,
            (None, Some(name)) => profile_weights(name),
            (None, None) => fallback.weights(),
        }
    }
}
