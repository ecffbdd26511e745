//! Multi-criteria ranking of itinerary candidates.
//!
//! Each criterion is normalized against the candidate set being scored, so a
//! score only means something relative to the other options returned with it.

mod chart;
mod profiles;
mod weights;

pub use chart::{comparison_chart, ChartDataset, ComparisonChart};
pub use profiles::{profile_weights, WeightProfile, WeightSelection};
pub use weights::{Criterion, CriterionScores, CriterionWeights, WEIGHT_TOLERANCE};

use serde::{Deserialize, Serialize};

use super::domain::{round_to, EnvironmentalRecord, ItineraryCandidate};

const TRANSFER_SHARE: f64 = 0.6;
const WALK_SHARE: f64 = 0.4;

/// Rescales `value` into `[0, 1]` across `[min, max]`.
///
/// A degenerate range carries no information, so every value gets full
/// credit. With `inverse`, the minimum is the most favorable end.
pub fn normalize(value: f64, min: f64, max: f64, inverse: bool) -> f64 {
    if max == min {
        return 1.0;
    }

    let normalized = (value - min) / (max - min);
    let normalized = if inverse { 1.0 - normalized } else { normalized };
    normalized.clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy)]
struct Span {
    min: f64,
    max: f64,
}

impl Span {
    fn over(values: impl Iterator<Item = f64>) -> Self {
        values.fold(
            Span {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |span, value| Span {
                min: span.min.min(value),
                max: span.max.max(value),
            },
        )
    }

    fn lower_is_better(&self, value: f64) -> f64 {
        normalize(value, self.min, self.max, true)
    }
}

/// Normalization domain built from the candidate set of one scoring pass.
struct ScoringContext {
    durations: Span,
    costs: Span,
    transfers: Span,
    walks: Span,
}

impl ScoringContext {
    fn build(candidates: &[ItineraryCandidate]) -> Self {
        Self {
            durations: Span::over(candidates.iter().map(|c| c.duration_min)),
            costs: Span::over(candidates.iter().map(ItineraryCandidate::estimated_cost_nzd)),
            transfers: Span::over(candidates.iter().map(|c| f64::from(c.transfers))),
            walks: Span::over(candidates.iter().map(|c| c.walk_km)),
        }
    }

    fn score(&self, candidate: &ItineraryCandidate) -> CriterionScores {
        let comfort = TRANSFER_SHARE * self.transfers.lower_is_better(f64::from(candidate.transfers))
            + WALK_SHARE * self.walks.lower_is_better(candidate.walk_km);

        CriterionScores {
            time: self.durations.lower_is_better(candidate.duration_min),
            cost: self.costs.lower_is_better(candidate.estimated_cost_nzd()),
            comfort,
            reliability: candidate.reliability.clamp(0.0, 1.0),
            environmental: environmental_score(candidate.environmental.as_ref()),
        }
    }
}

/// Prefers the eco-score; records without one fall back to the saved share.
pub fn environmental_score(record: Option<&EnvironmentalRecord>) -> f64 {
    let score = match record {
        Some(EnvironmentalRecord {
            eco_score: Some(eco_score),
            ..
        }) => f64::from(*eco_score) / 100.0,
        Some(record) => (record.co2_saved_percent / 100.0).min(1.0),
        None => 0.0,
    };
    score.clamp(0.0, 1.0)
}

pub(crate) fn recommendation(total: f64, scores: &CriterionScores) -> String {
    if total >= 85.0 {
        let mut strengths: Vec<&str> = Criterion::ALL
            .iter()
            .filter(|criterion| scores.get(**criterion) >= 0.85)
            .map(|criterion| criterion.key())
            .collect();
        if strengths.is_empty() {
            // Weights inside the tolerance can lift the total past 85 alone.
            let strongest = Criterion::ALL
                .iter()
                .copied()
                .fold(Criterion::Time, |strongest, criterion| {
                    if scores.get(criterion) > scores.get(strongest) {
                        criterion
                    } else {
                        strongest
                    }
                });
            strengths.push(strongest.key());
        }
        format!("Excellent choice! Strong in {}.", strengths.join(", "))
    } else if total >= 70.0 {
        "Very good option with balanced performance.".to_string()
    } else if total >= 55.0 {
        let weakest = Criterion::ALL
            .iter()
            .copied()
            .fold(Criterion::Time, |weakest, criterion| {
                if scores.get(criterion) < scores.get(weakest) {
                    criterion
                } else {
                    weakest
                }
            });
        format!("Good option, though {} could be better.", weakest.key())
    } else {
        "Consider other options for better overall performance.".to_string()
    }
}

/// Score annotation attached to each ranked itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub mcda_score: f64,
    pub mcda_breakdown: CriterionScores,
    pub mcda_weights: CriterionWeights,
    pub mcda_recommendation: String,
    pub mcda_rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItinerary {
    #[serde(flatten)]
    pub itinerary: ItineraryCandidate,
    #[serde(flatten)]
    pub score: ScoreBreakdown,
}

/// Stateless weighted-sum ranker.
#[derive(Debug, Clone)]
pub struct McdaEngine {
    weights: CriterionWeights,
}

impl McdaEngine {
    pub fn new(weights: CriterionWeights) -> Self {
        Self {
            weights: weights.validated(),
        }
    }

    pub fn for_profile(profile: WeightProfile) -> Self {
        Self::new(profile.weights())
    }

    /// Weights actually applied, after validation.
    pub fn weights(&self) -> CriterionWeights {
        self.weights
    }

    /// Scores and ranks the candidate set.
    ///
    /// The result is sorted by descending score. Equal scores are ordered by
    /// candidate id, then by input position.
    pub fn score_all(&self, candidates: &[ItineraryCandidate]) -> Vec<ScoredItinerary> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let context = ScoringContext::build(candidates);
        let mut scored: Vec<ScoredItinerary> = candidates
            .iter()
            .map(|candidate| {
                let scores = context.score(candidate);
                let total = (scores.weighted_total(&self.weights) * 100.0).clamp(0.0, 100.0);
                ScoredItinerary {
                    itinerary: candidate.clone(),
                    score: ScoreBreakdown {
                        mcda_score: round_to(total, 1),
                        mcda_breakdown: scores.as_percentages(),
                        mcda_weights: self.weights,
                        mcda_recommendation: recommendation(total, &scores),
                        mcda_rank: 0,
                    },
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .mcda_score
                .total_cmp(&a.score.mcda_score)
                .then_with(|| a.itinerary.id.cmp(&b.itinerary.id))
        });

        for (index, itinerary) in scored.iter_mut().enumerate() {
            itinerary.score.mcda_rank = index + 1;
        }

        scored
    }
}

impl Default for McdaEngine {
    fn default() -> Self {
        Self::for_profile(WeightProfile::Balanced)
    }
}
