use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use super::domain::ItineraryCandidate;
use super::emissions::{EmissionsModel, ModalComparison};
use super::filter::filter_candidates;
use super::intake::{resolve_candidates, CandidateInput, FieldIssue};
use super::mcda::{
    comparison_chart, ComparisonChart, CriterionWeights, McdaEngine, ScoredItinerary,
    WeightProfile, WeightSelection,
};
use super::request::TripRequest;
use super::source::{CandidateItinerarySource, SourceError};
use crate::analytics::{AnalyticsError, AnalyticsStore, SearchRecord, TripRecord};

/// Ranked itineraries for one planning request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanOutcome {
    pub weights: CriterionWeights,
    pub candidates_considered: usize,
    pub filtered_out: usize,
    pub itineraries: Vec<ScoredItinerary>,
    pub chart: ComparisonChart,
    pub environmental: ModalComparison,
}

impl PlanOutcome {
    pub fn best(&self) -> Option<&ScoredItinerary> {
        self.itineraries.first()
    }
}

/// Scores for caller-supplied candidates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreOutcome {
    pub weights: CriterionWeights,
    pub results: Vec<ScoredItinerary>,
    pub chart: ComparisonChart,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<FieldIssue>,
}

/// Service composing the candidate source, the scoring pipeline, and analytics.
pub struct TripPlanningService<S, A> {
    source: Arc<S>,
    analytics: Arc<A>,
    emissions: EmissionsModel,
    default_profile: WeightProfile,
}

impl<S, A> TripPlanningService<S, A>
where
    S: CandidateItinerarySource + 'static,
    A: AnalyticsStore + 'static,
{
    pub fn new(source: Arc<S>, analytics: Arc<A>, default_profile: WeightProfile) -> Self {
        Self {
            source,
            analytics,
            emissions: EmissionsModel::new(),
            default_profile,
        }
    }

    pub fn analytics(&self) -> &Arc<A> {
        &self.analytics
    }

    pub fn default_profile(&self) -> WeightProfile {
        self.default_profile
    }

    /// Fetch, filter, annotate, and rank candidates; the top itinerary is
    /// recorded as the user's trip.
    pub fn plan(&self, request: &TripRequest) -> Result<PlanOutcome, PlanningError> {
        let fetched = self.source.candidates(request)?;
        let considered = fetched.len();

        let mut admitted = filter_candidates(fetched, &request.constraints);
        let filtered_out = considered - admitted.len();
        self.emissions.annotate(&mut admitted);

        let weights = request.weights.resolve(self.default_profile);
        let engine = McdaEngine::new(weights);
        let itineraries = engine.score_all(&admitted);

        let now = Utc::now();
        self.analytics.record_search(SearchRecord {
            timestamp: now,
            user: request.user_label().to_string(),
            query: format!(
                "{:.5},{:.5} -> {:.5},{:.5}",
                request.origin[0], request.origin[1], request.destination[0], request.destination[1]
            ),
            results_count: itineraries.len(),
        })?;

        if let Some(best) = itineraries.first() {
            self.analytics
                .record_trip(TripRecord::planned(request, best, now))?;
            info!(
                user = request.user_label(),
                itinerary = %best.itinerary.id,
                score = best.score.mcda_score,
                considered,
                filtered_out,
                "trip planned"
            );
        } else {
            info!(
                user = request.user_label(),
                considered, filtered_out, "no itinerary satisfied the constraints"
            );
        }

        Ok(PlanOutcome {
            weights: engine.weights(),
            candidates_considered: considered,
            filtered_out,
            chart: comparison_chart(&itineraries),
            environmental: self.emissions.compare_modal(&admitted),
            itineraries,
        })
    }

    /// Scores caller-supplied candidates without consulting the source.
    /// Candidates arriving without an environmental record get one computed.
    pub fn score(&self, inputs: Vec<CandidateInput>, selection: &WeightSelection) -> ScoreOutcome {
        let (mut candidates, issues) = resolve_candidates(inputs);
        self.annotate_missing(&mut candidates);

        let engine = McdaEngine::new(selection.resolve(self.default_profile));
        let results = engine.score_all(&candidates);
        debug!(candidates = results.len(), issues = issues.len(), "candidates scored");

        ScoreOutcome {
            weights: engine.weights(),
            chart: comparison_chart(&results),
            results,
            issues,
        }
    }

    pub fn compare(&self, inputs: Vec<CandidateInput>) -> ModalComparison {
        let (candidates, _) = resolve_candidates(inputs);
        self.emissions.compare_modal(&candidates)
    }

    fn annotate_missing(&self, candidates: &mut [ItineraryCandidate]) {
        for candidate in candidates.iter_mut() {
            if candidate.environmental.is_none() {
                candidate.environmental = Some(self.emissions.assess(candidate));
            }
        }
    }
}

/// Error raised by the planning service.
#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}
