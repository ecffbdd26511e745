use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use atis::analytics::{analytics_router, AnalyticsStore};
use atis::planning::{planning_router, CandidateItinerarySource, TripPlanningService};

pub(crate) fn with_planning_routes<S, A>(
    service: Arc<TripPlanningService<S, A>>,
    analytics: Arc<A>,
) -> axum::Router
where
    S: CandidateItinerarySource + 'static,
    A: AnalyticsStore + 'static,
{
    planning_router(service)
        .merge(analytics_router(analytics))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use atis::analytics::InMemoryAnalyticsStore;
    use atis::planning::{SampleItinerarySource, WeightProfile};
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let analytics = Arc::new(InMemoryAnalyticsStore::new());
        let service = Arc::new(TripPlanningService::new(
            Arc::new(SampleItinerarySource),
            analytics.clone(),
            WeightProfile::Balanced,
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };

        with_planning_routes(service, analytics).layer(Extension(state))
    }

    async fn status_of(router: axum::Router, uri: &str) -> StatusCode {
        router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .expect("route executes")
            .status()
    }

    #[tokio::test]
    async fn readiness_tracks_the_startup_flag() {
        assert_eq!(status_of(app(false), "/ready").await, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_of(app(true), "/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn health_metrics_and_domain_routes_are_mounted() {
        assert_eq!(status_of(app(true), "/health").await, StatusCode::OK);
        assert_eq!(status_of(app(true), "/metrics").await, StatusCode::OK);
        assert_eq!(
            status_of(app(true), "/api/v1/mcda/profiles/eco").await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(app(true), "/api/v1/analytics/summary").await,
            StatusCode::OK
        );
    }
}
