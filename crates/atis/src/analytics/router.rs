use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::{AnalyticsReport, AnalyticsStore, LeaderboardMetric};
use crate::planning::emissions::ImpactPeriod;

const DEFAULT_LIMIT: usize = 10;

/// Read-only reporting endpoints over the injected analytics store.
pub fn analytics_router<A>(store: Arc<A>) -> Router
where
    A: AnalyticsStore + 'static,
{
    Router::new()
        .route("/api/v1/analytics/summary", get(summary_handler::<A>))
        .route("/api/v1/analytics/routes", get(routes_handler::<A>))
        .route("/api/v1/analytics/heatmap", get(heatmap_handler::<A>))
        .route("/api/v1/analytics/modes", get(modes_handler::<A>))
        .route(
            "/api/v1/analytics/environmental",
            get(environmental_handler::<A>),
        )
        .route("/api/v1/analytics/leaderboard", get(leaderboard_handler::<A>))
        .route("/api/v1/analytics/performance", get(performance_handler::<A>))
        .with_state(store)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LimitQuery {
    limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LeaderboardQuery {
    metric: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PeriodQuery {
    period: Option<String>,
}

fn with_report<A, F>(store: &A, render: F) -> Response
where
    A: AnalyticsStore,
    F: FnOnce(&AnalyticsReport<'_>) -> serde_json::Value,
{
    match store.snapshot() {
        Ok(data) => {
            let report = AnalyticsReport::new(&data, Utc::now());
            (StatusCode::OK, axum::Json(render(&report))).into_response()
        }
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn summary_handler<A>(State(store): State<Arc<A>>) -> Response
where
    A: AnalyticsStore + 'static,
{
    with_report(store.as_ref(), |report| json!(report.summary()))
}

pub(crate) async fn routes_handler<A>(
    State(store): State<Arc<A>>,
    Query(query): Query<LimitQuery>,
) -> Response
where
    A: AnalyticsStore + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    with_report(store.as_ref(), |report| {
        json!({ "routes": report.popular_routes(limit) })
    })
}

pub(crate) async fn heatmap_handler<A>(State(store): State<Arc<A>>) -> Response
where
    A: AnalyticsStore + 'static,
{
    with_report(store.as_ref(), |report| {
        json!({ "heatmap": report.hourly_heatmap() })
    })
}

pub(crate) async fn modes_handler<A>(State(store): State<Arc<A>>) -> Response
where
    A: AnalyticsStore + 'static,
{
    with_report(store.as_ref(), |report| json!(report.mode_popularity()))
}

pub(crate) async fn environmental_handler<A>(
    State(store): State<Arc<A>>,
    Query(query): Query<PeriodQuery>,
) -> Response
where
    A: AnalyticsStore + 'static,
{
    let period = query
        .period
        .as_deref()
        .map(ImpactPeriod::from_name)
        .unwrap_or_default();
    with_report(store.as_ref(), |report| {
        json!({
            "impact": report.environmental_impact(),
            "projection": report.cumulative_impact(period),
        })
    })
}

/// Unknown metrics yield an empty leaderboard.
pub(crate) async fn leaderboard_handler<A>(
    State(store): State<Arc<A>>,
    Query(query): Query<LeaderboardQuery>,
) -> Response
where
    A: AnalyticsStore + 'static,
{
    let metric = query.metric.as_deref().unwrap_or("trips");
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let parsed = LeaderboardMetric::parse(metric);

    with_report(store.as_ref(), |report| {
        let entries = parsed
            .map(|metric| report.leaderboard(metric, limit))
            .unwrap_or_default();
        json!({ "metric": metric, "leaderboard": entries })
    })
}

pub(crate) async fn performance_handler<A>(State(store): State<Arc<A>>) -> Response
where
    A: AnalyticsStore + 'static,
{
    with_report(store.as_ref(), |report| json!(report.performance()))
}
