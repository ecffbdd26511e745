use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::analytics::{analytics_router, AnalyticsStore, InMemoryAnalyticsStore};
use crate::planning::mcda::WeightProfile;
use crate::planning::router::planning_router;
use crate::planning::{SampleItinerarySource, TripPlanningService};

fn post_json(uri: &str, payload: serde_json::Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&payload).unwrap(),
        ))
        .unwrap()
}

fn get(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::get(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

#[tokio::test]
async fn plan_route_returns_ranked_itineraries() {
    let (service, analytics) = build_service();
    let router = planning_router(Arc::new(service));

    let response = router
        .oneshot(post_json(
            "/api/v1/plan",
            json!({
                "origin": BRITOMART,
                "destination": NEWMARKET,
                "user": "tama",
                "avoid_stairs": true,
                "profile": "commuter",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let itineraries = payload["itineraries"].as_array().expect("itineraries");
    assert_eq!(itineraries.len(), 2);
    assert_eq!(itineraries[0]["mcda_rank"], 1);
    assert!(itineraries[0].get("mcda_breakdown").is_some());
    assert_eq!(payload["weights"]["time"], 0.45);
    assert_eq!(analytics.snapshot().expect("snapshot").trips.len(), 1);
}

#[tokio::test]
async fn plan_handler_returns_unavailable_when_source_is_offline() {
    let service = Arc::new(TripPlanningService::new(
        Arc::new(OfflineSource),
        Arc::new(InMemoryAnalyticsStore::new()),
        WeightProfile::Balanced,
    ));

    let response = crate::planning::router::plan_handler::<OfflineSource, InMemoryAnalyticsStore>(
        State(service),
        axum::Json(request()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("offline"));
}

#[tokio::test]
async fn plan_handler_returns_internal_error_on_analytics_failure() {
    let service = Arc::new(TripPlanningService::new(
        Arc::new(SampleItinerarySource),
        Arc::new(ReadOnlyAnalytics),
        WeightProfile::Balanced,
    ));

    let response = crate::planning::router::plan_handler::<
        SampleItinerarySource,
        ReadOnlyAnalytics,
    >(State(service), axum::Json(request()))
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn score_route_accepts_legacy_candidates() {
    let (service, _) = build_service();
    let router = planning_router(Arc::new(service));

    let response = router
        .oneshot(post_json(
            "/api/v1/mcda/score",
            json!({
                "itineraries": [
                    {"id": "A", "durationMin": 22, "transfers": 0, "walkKm": 0.4,
                     "legs": ["Bus NX1", "Walk"], "modes": ["bus", "walk"], "reliability": 0.84},
                    {"id": "B", "durationMin": 28, "transfers": 1, "walkKm": 0.9,
                     "legs": ["Bus 82", "Train"], "modes": ["bus", "train"], "reliability": 0.9},
                ],
                "profile": "eco",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["weights"]["environmental"], 0.4);
    assert_eq!(payload["results"].as_array().expect("results").len(), 2);
    assert_eq!(payload["chart"]["labels"][0], "Time");
}

#[tokio::test]
async fn score_route_accepts_an_empty_set() {
    let (service, _) = build_service();
    let router = planning_router(Arc::new(service));

    let response = router
        .oneshot(post_json("/api/v1/mcda/score", json!({ "itineraries": [] })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert!(payload["results"].as_array().expect("results").is_empty());
}

#[tokio::test]
async fn profile_route_resolves_unknown_names_to_balanced() {
    let (service, _) = build_service();
    let router = planning_router(Arc::new(service));

    let response = router
        .oneshot(get("/api/v1/mcda/profiles/scenic"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["requested"], "scenic");
    assert_eq!(payload["profile"], "balanced");
    assert_eq!(payload["weights"]["time"], 0.35);
}

#[tokio::test]
async fn compare_route_reports_the_cleanest_option() {
    let (service, _) = build_service();
    let router = planning_router(Arc::new(service));

    let response = router
        .oneshot(post_json(
            "/api/v1/environmental/compare",
            json!({
                "itineraries": [
                    {"id": "Drive", "legs": [{"mode": "car", "distance_km": 6.0}], "modes": ["car"]},
                    {"id": "Cycle", "legs": [{"mode": "bike", "distance_km": 6.0}], "modes": ["bike"]},
                ],
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["best_environmental"]["itinerary_id"], "Cycle");
    assert_eq!(payload["comparisons"].as_array().expect("comparisons").len(), 2);
}

#[tokio::test]
async fn impact_route_projects_savings() {
    let (service, _) = build_service();
    let router = planning_router(Arc::new(service));

    let response = router
        .oneshot(post_json(
            "/api/v1/environmental/impact",
            json!({
                "trips": [{"co2_saved_kg": 2.0, "total_co2_kg": 0.5, "total_distance_km": 10.0}],
                "period": "daily",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["period"], "daily");
    assert_eq!(payload["annual_projection"]["co2_saved_kg"], 730.0);
    assert_eq!(payload["impact_level"], "excellent");
}

#[tokio::test]
async fn analytics_routes_report_planned_trips() {
    let (service, analytics) = build_service();
    let service = Arc::new(service);
    let mut request = request();
    request.user = Some("aroha".to_string());
    service.plan(&request).expect("plan succeeds");
    service.plan(&request).expect("plan succeeds");

    let router = analytics_router(analytics);

    let summary = read_json_body(
        router
            .clone()
            .oneshot(get("/api/v1/analytics/summary"))
            .await
            .expect("route executes"),
    )
    .await;
    assert_eq!(summary["total_trips"], 2);
    assert_eq!(summary["total_users"], 1);

    let leaders = read_json_body(
        router
            .clone()
            .oneshot(get("/api/v1/analytics/leaderboard?metric=trips&limit=5"))
            .await
            .expect("route executes"),
    )
    .await;
    assert_eq!(leaders["leaderboard"][0]["username"], "aroha");
    assert_eq!(leaders["leaderboard"][0]["trip_count"], 2);

    let unknown = read_json_body(
        router
            .clone()
            .oneshot(get("/api/v1/analytics/leaderboard?metric=karma"))
            .await
            .expect("route executes"),
    )
    .await;
    assert!(unknown["leaderboard"].as_array().expect("list").is_empty());

    let heatmap = read_json_body(
        router
            .oneshot(get("/api/v1/analytics/heatmap"))
            .await
            .expect("route executes"),
    )
    .await;
    assert_eq!(heatmap["heatmap"].as_array().expect("cells").len(), 168);
}

#[tokio::test]
async fn analytics_routes_report_store_outages() {
    let router = analytics_router(Arc::new(ReadOnlyAnalytics));

    let response = router
        .oneshot(get("/api/v1/analytics/performance"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
