use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::profiles::WeightProfile;

/// Weights may drift this far from 1.0 before they are renormalized.
pub const WEIGHT_TOLERANCE: f64 = 0.01;

/// The five criteria every itinerary is scored on, in chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Time,
    Cost,
    Comfort,
    Reliability,
    Environmental,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::Time,
        Criterion::Cost,
        Criterion::Comfort,
        Criterion::Reliability,
        Criterion::Environmental,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Criterion::Time => "time",
            Criterion::Cost => "cost",
            Criterion::Comfort => "comfort",
            Criterion::Reliability => "reliability",
            Criterion::Environmental => "environmental",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Criterion::Time => "Time",
            Criterion::Cost => "Cost",
            Criterion::Comfort => "Comfort",
            Criterion::Reliability => "Reliability",
            Criterion::Environmental => "Environmental",
        }
    }
}

/// Relative importance of each criterion; validated weights sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionWeights {
    pub time: f64,
    pub cost: f64,
    pub comfort: f64,
    pub reliability: f64,
    pub environmental: f64,
}

impl CriterionWeights {
    pub const fn new(time: f64, cost: f64, comfort: f64, reliability: f64, environmental: f64) -> Self {
        Self {
            time,
            cost,
            comfort,
            reliability,
            environmental,
        }
    }

    pub fn get(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Time => self.time,
            Criterion::Cost => self.cost,
            Criterion::Comfort => self.comfort,
            Criterion::Reliability => self.reliability,
            Criterion::Environmental => self.environmental,
        }
    }

    pub fn sum(&self) -> f64 {
        Criterion::ALL.iter().map(|criterion| self.get(*criterion)).sum()
    }

    fn map(self, f: impl Fn(Criterion, f64) -> f64) -> Self {
        Self {
            time: f(Criterion::Time, self.time),
            cost: f(Criterion::Cost, self.cost),
            comfort: f(Criterion::Comfort, self.comfort),
            reliability: f(Criterion::Reliability, self.reliability),
            environmental: f(Criterion::Environmental, self.environmental),
        }
    }

    /// Returns weights that sum to 1.0 within [`WEIGHT_TOLERANCE`].
    ///
    /// Negative or non-finite entries count as zero. Weights outside the
    /// tolerance are divided by their sum; a vector with nothing left to
    /// divide by falls back to the balanced profile.
    pub fn validated(self) -> Self {
        let sanitized = self.map(|criterion, weight| {
            if weight.is_finite() && weight >= 0.0 {
                weight
            } else {
                warn!(
                    criterion = criterion.key(),
                    weight, "invalid criterion weight treated as zero"
                );
                0.0
            }
        });

        // Huge finite entries can overflow the sum; rescale by the largest first.
        let sanitized = if sanitized.sum().is_finite() {
            sanitized
        } else {
            let largest = Criterion::ALL
                .iter()
                .map(|criterion| sanitized.get(*criterion))
                .fold(0.0, f64::max);
            sanitized.map(|_, weight| weight / largest)
        };

        let sum = sanitized.sum();
        if sum <= 0.0 {
            warn!("criterion weights sum to zero, using the balanced profile");
            return WeightProfile::Balanced.weights();
        }

        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            debug!(sum, "renormalizing criterion weights");
            sanitized.map(|_, weight| weight / sum)
        } else {
            sanitized
        }
    }
}

impl Default for CriterionWeights {
    fn default() -> Self {
        WeightProfile::Balanced.weights()
    }
}

/// Normalized per-criterion scores for one itinerary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CriterionScores {
    pub time: f64,
    pub cost: f64,
    pub comfort: f64,
    pub reliability: f64,
    pub environmental: f64,
}

impl CriterionScores {
    pub fn get(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Time => self.time,
            Criterion::Cost => self.cost,
            Criterion::Comfort => self.comfort,
            Criterion::Reliability => self.reliability,
            Criterion::Environmental => self.environmental,
        }
    }

    /// Scores in [`Criterion::ALL`] order.
    pub fn to_array(&self) -> [f64; 5] {
        Criterion::ALL.map(|criterion| self.get(criterion))
    }

    pub(crate) fn weighted_total(&self, weights: &CriterionWeights) -> f64 {
        Criterion::ALL
            .iter()
            .map(|criterion| self.get(*criterion) * weights.get(*criterion))
            .sum()
    }

    pub(crate) fn as_percentages(&self) -> Self {
        let percent = |value: f64| crate::planning::domain::round_to(value * 100.0, 1);
        Self {
            time: percent(self.time),
            cost: percent(self.cost),
            comfort: percent(self.comfort),
            reliability: percent(self.reliability),
            environmental: percent(self.environmental),
        }
    }
}
