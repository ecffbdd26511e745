use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::EnvironmentalRecord;
use super::emissions::{EmissionsModel, ImpactPeriod};
use super::intake::CandidateInput;
use super::mcda::{WeightProfile, WeightSelection};
use super::request::TripRequest;
use super::service::{PlanningError, TripPlanningService};
use super::source::{CandidateItinerarySource, SourceError};
use crate::analytics::AnalyticsStore;

/// Router builder exposing planning, scoring, and emissions endpoints.
pub fn planning_router<S, A>(service: Arc<TripPlanningService<S, A>>) -> Router
where
    S: CandidateItinerarySource + 'static,
    A: AnalyticsStore + 'static,
{
    Router::new()
        .route("/api/v1/plan", post(plan_handler::<S, A>))
        .route("/api/v1/mcda/score", post(score_handler::<S, A>))
        .route("/api/v1/mcda/profiles/:name", get(profile_handler))
        .route(
            "/api/v1/environmental/compare",
            post(compare_handler::<S, A>),
        )
        .route("/api/v1/environmental/impact", post(impact_handler))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    #[serde(default, alias = "candidates")]
    itineraries: Vec<CandidateInput>,
    #[serde(flatten)]
    selection: WeightSelection,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompareRequest {
    #[serde(default, alias = "candidates")]
    itineraries: Vec<CandidateInput>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImpactRequest {
    #[serde(default)]
    trips: Vec<EnvironmentalRecord>,
    #[serde(default)]
    period: Option<String>,
}

pub(crate) async fn plan_handler<S, A>(
    State(service): State<Arc<TripPlanningService<S, A>>>,
    axum::Json(request): axum::Json<TripRequest>,
) -> Response
where
    S: CandidateItinerarySource + 'static,
    A: AnalyticsStore + 'static,
{
    match service.plan(&request) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(PlanningError::Source(SourceError::Unavailable(reason))) => {
            let payload = json!({
                "error": format!("candidate source unavailable: {reason}"),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(PlanningError::Source(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn score_handler<S, A>(
    State(service): State<Arc<TripPlanningService<S, A>>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    S: CandidateItinerarySource + 'static,
    A: AnalyticsStore + 'static,
{
    let outcome = service.score(request.itineraries, &request.selection);
    (StatusCode::OK, axum::Json(outcome)).into_response()
}

/// Unknown profile names resolve to the balanced weights.
pub(crate) async fn profile_handler(Path(name): Path<String>) -> Response {
    let resolved = WeightProfile::from_name(&name);
    let payload = json!({
        "requested": name,
        "profile": resolved.name(),
        "weights": resolved.weights(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn compare_handler<S, A>(
    State(service): State<Arc<TripPlanningService<S, A>>>,
    axum::Json(request): axum::Json<CompareRequest>,
) -> Response
where
    S: CandidateItinerarySource + 'static,
    A: AnalyticsStore + 'static,
{
    let comparison = service.compare(request.itineraries);
    (StatusCode::OK, axum::Json(comparison)).into_response()
}

pub(crate) async fn impact_handler(axum::Json(request): axum::Json<ImpactRequest>) -> Response {
    let period = request
        .period
        .as_deref()
        .map(ImpactPeriod::from_name)
        .unwrap_or_default();
    let impact = EmissionsModel::new().cumulative_impact(&request.trips, period);
    (StatusCode::OK, axum::Json(impact)).into_response()
}
