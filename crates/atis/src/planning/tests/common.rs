use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::analytics::{
    AnalyticsData, AnalyticsError, AnalyticsStore, InMemoryAnalyticsStore, SearchRecord,
    SystemEvent, TripRecord,
};
use crate::planning::domain::{ItineraryCandidate, Leg, LegSegment, TransportMode};
use crate::planning::mcda::WeightProfile;
use crate::planning::request::TripRequest;
use crate::planning::service::TripPlanningService;
use crate::planning::source::{CandidateItinerarySource, SampleItinerarySource, SourceError};

pub(super) const BRITOMART: [f64; 2] = [-36.8443, 174.7676];
pub(super) const NEWMARKET: [f64; 2] = [-36.8697, 174.7781];

pub(super) fn candidate(
    id: &str,
    duration_min: f64,
    transfers: u32,
    walk_km: f64,
    reliability: f64,
    modes: Vec<TransportMode>,
) -> ItineraryCandidate {
    ItineraryCandidate {
        id: id.to_string(),
        duration_min,
        transfers,
        walk_km,
        stairs: false,
        legs: modes
            .iter()
            .map(|mode| Leg::Label(mode.label().to_string()))
            .collect(),
        modes,
        reliability,
        environmental: None,
    }
}

/// Two bus options that differ only in time, comfort, and reliability.
pub(super) fn commute_pair() -> Vec<ItineraryCandidate> {
    vec![
        candidate("A", 22.0, 0, 0.4, 0.84, vec![TransportMode::Bus]),
        candidate("B", 28.0, 1, 0.9, 0.90, vec![TransportMode::Bus]),
    ]
}

pub(super) fn single_leg(id: &str, mode: TransportMode, distance_km: f64) -> ItineraryCandidate {
    ItineraryCandidate {
        id: id.to_string(),
        duration_min: 20.0,
        transfers: 0,
        walk_km: 0.0,
        stairs: false,
        legs: vec![Leg::Segment(LegSegment::with_distance(
            mode.clone(),
            distance_km,
        ))],
        modes: vec![mode],
        reliability: 0.9,
        environmental: None,
    }
}

pub(super) fn sample_candidates() -> Vec<ItineraryCandidate> {
    SampleItinerarySource
        .candidates(&request())
        .expect("sample source never fails")
}

pub(super) fn request() -> TripRequest {
    TripRequest::new(BRITOMART, NEWMARKET)
}

pub(super) fn build_service() -> (
    TripPlanningService<SampleItinerarySource, InMemoryAnalyticsStore>,
    Arc<InMemoryAnalyticsStore>,
) {
    let analytics = Arc::new(InMemoryAnalyticsStore::new());
    let service = TripPlanningService::new(
        Arc::new(SampleItinerarySource),
        analytics.clone(),
        WeightProfile::Balanced,
    );
    (service, analytics)
}

pub(super) struct OfflineSource;

impl CandidateItinerarySource for OfflineSource {
    fn candidates(&self, _request: &TripRequest) -> Result<Vec<ItineraryCandidate>, SourceError> {
        Err(SourceError::Unavailable("journey planner offline".to_string()))
    }
}

pub(super) struct ReadOnlyAnalytics;

impl AnalyticsStore for ReadOnlyAnalytics {
    fn record_trip(&self, _trip: TripRecord) -> Result<(), AnalyticsError> {
        Err(AnalyticsError::Unavailable("read only".to_string()))
    }

    fn record_search(&self, _search: SearchRecord) -> Result<(), AnalyticsError> {
        Err(AnalyticsError::Unavailable("read only".to_string()))
    }

    fn record_event(&self, _event: SystemEvent) -> Result<(), AnalyticsError> {
        Err(AnalyticsError::Unavailable("read only".to_string()))
    }

    fn snapshot(&self) -> Result<AnalyticsData, AnalyticsError> {
        Err(AnalyticsError::Unavailable("read only".to_string()))
    }

    fn flush(&self) -> Result<(), AnalyticsError> {
        Ok(())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn ids(candidates: &[ItineraryCandidate]) -> Vec<&str> {
    candidates
        .iter()
        .map(|candidate| candidate.id.as_str())
        .collect()
}
