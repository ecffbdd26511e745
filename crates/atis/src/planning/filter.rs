use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{ItineraryCandidate, TransportMode};

/// Hard constraints a candidate must satisfy before it is scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripConstraints {
    pub max_walk_km: f64,
    pub avoid_stairs: bool,
    pub bike_ok: bool,
    /// Empty means every mode is acceptable.
    #[serde(alias = "modes")]
    pub allowed_modes: BTreeSet<TransportMode>,
}

impl Default for TripConstraints {
    fn default() -> Self {
        Self {
            max_walk_km: 1.2,
            avoid_stairs: false,
            bike_ok: false,
            allowed_modes: BTreeSet::new(),
        }
    }
}

impl TripConstraints {
    /// Constraints that keep every candidate.
    pub fn permissive() -> Self {
        Self {
            max_walk_km: f64::INFINITY,
            avoid_stairs: false,
            bike_ok: true,
            allowed_modes: BTreeSet::new(),
        }
    }

    pub fn admits(&self, candidate: &ItineraryCandidate) -> bool {
        if !self.allowed_modes.is_empty()
            && !candidate
                .modes
                .iter()
                .any(|mode| self.allowed_modes.contains(mode))
        {
            return false;
        }

        if candidate.walk_km > self.max_walk_km {
            return false;
        }

        if self.avoid_stairs && candidate.stairs {
            return false;
        }

        !(!self.bike_ok && candidate.uses(&TransportMode::Bike))
    }
}

/// Order-preserving filter; an empty result is a valid outcome.
pub fn filter_candidates(
    candidates: Vec<ItineraryCandidate>,
    constraints: &TripConstraints,
) -> Vec<ItineraryCandidate> {
    candidates
        .into_iter()
        .filter(|candidate| constraints.admits(candidate))
        .collect()
}
