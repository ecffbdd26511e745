use serde::{Deserialize, Serialize};

use super::filter::TripConstraints;
use super::mcda::WeightSelection;

/// A planning request: where to, under which constraints, weighted how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    /// `[lat, lng]`
    pub origin: [f64; 2],
    /// `[lat, lng]`
    pub destination: [f64; 2],
    #[serde(default = "default_depart_at")]
    pub depart_at: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(flatten)]
    pub constraints: TripConstraints,
    #[serde(flatten)]
    pub weights: WeightSelection,
}

fn default_depart_at() -> String {
    "now".to_string()
}

impl TripRequest {
    pub fn new(origin: [f64; 2], destination: [f64; 2]) -> Self {
        Self {
            origin,
            destination,
            depart_at: default_depart_at(),
            user: None,
            constraints: TripConstraints::default(),
            weights: WeightSelection::default(),
        }
    }

    pub fn user_label(&self) -> &str {
        self.user.as_deref().unwrap_or("anonymous")
    }
}
