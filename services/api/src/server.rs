use crate::cli::ServeArgs;
use crate::infra::{AnalyticsBackend, AppState};
use crate::routes::with_planning_routes;
use atis::analytics::{AnalyticsStore, SystemEvent};
use atis::config::AppConfig;
use atis::error::AppError;
use atis::planning::{SampleItinerarySource, TripPlanningService};
use atis::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.analytics_path.take() {
        config.planning.analytics_path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let analytics = Arc::new(AnalyticsBackend::open(&config.planning)?);
    let planning_service = Arc::new(TripPlanningService::new(
        Arc::new(SampleItinerarySource),
        analytics.clone(),
        config.planning.default_profile,
    ));

    let app = with_planning_routes(planning_service, analytics.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    analytics.record_event(SystemEvent {
        timestamp: Utc::now(),
        event_type: "server_start".to_string(),
        details: json!({ "addr": addr.to_string() }),
    })?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        analytics = %analytics.describe(),
        default_profile = config.planning.default_profile.name(),
        "trip planner ready"
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    readiness_flag.store(false, Ordering::Release);
    let flushed = flush_analytics(analytics.as_ref());
    served?;
    flushed?;
    info!("analytics flushed, shutting down");
    Ok(())
}

/// Writes buffered analytics, whether the server stopped cleanly or not.
fn flush_analytics(analytics: &dyn AnalyticsStore) -> Result<(), AppError> {
    analytics.flush().map_err(|err| {
        error!(error = %err, "failed to flush analytics on shutdown");
        AppError::from(err)
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
