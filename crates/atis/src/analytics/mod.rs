//! Usage analytics for planned trips and searches.
//!
//! Handlers never reach for a global tracker: an [`AnalyticsStore`] is built
//! at start-up and injected. File-backed stores only touch disk on
//! [`AnalyticsStore::flush`].

mod file_store;
mod memory;
mod report;
pub mod router;

pub use file_store::JsonFileAnalyticsStore;
pub use memory::InMemoryAnalyticsStore;
pub use report::{
    AnalyticsReport, EnvironmentalImpact, HeatmapCell, LeaderboardEntry, LeaderboardMetric,
    ModePopularity, PerformanceMetrics, PopularRoute, SummaryStats,
};
pub use router::analytics_router;

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::planning::domain::{EnvironmentalRecord, TransportMode};
use crate::planning::mcda::ScoredItinerary;
use crate::planning::request::TripRequest;

/// A trip the planner recommended, captured at planning time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub origin: [f64; 2],
    pub destination: [f64; 2],
    pub duration_min: f64,
    pub transfers: u32,
    pub modes: Vec<TransportMode>,
    pub walk_km: f64,
    #[serde(default)]
    pub environmental: Option<EnvironmentalRecord>,
    pub mcda_score: f64,
}

impl TripRecord {
    pub fn planned(request: &TripRequest, chosen: &ScoredItinerary, at: DateTime<Utc>) -> Self {
        Self {
            timestamp: at,
            user: request.user_label().to_string(),
            origin: request.origin,
            destination: request.destination,
            duration_min: chosen.itinerary.duration_min,
            transfers: chosen.itinerary.transfers,
            modes: chosen.itinerary.modes.clone(),
            walk_km: chosen.itinerary.walk_km,
            environmental: chosen.itinerary.environmental.clone(),
            mcda_score: chosen.score.mcda_score,
        }
    }

    pub(crate) fn co2_saved_kg(&self) -> f64 {
        self.environmental
            .as_ref()
            .map_or(0.0, |record| record.co2_saved_kg)
    }

    pub(crate) fn uses_car(&self) -> bool {
        self.modes.contains(&TransportMode::Car)
    }

    pub(crate) fn distance_km(&self) -> f64 {
        self.environmental
            .as_ref()
            .map_or(0.0, |record| record.total_distance_km)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub query: String,
    pub results_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub details: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub first_seen: DateTime<Utc>,
    pub trip_count: u64,
    pub search_count: u64,
    pub last_active: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserAction {
    Trip,
    Search,
}

/// Everything an analytics store keeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsData {
    #[serde(default)]
    pub trips: Vec<TripRecord>,
    #[serde(default)]
    pub searches: Vec<SearchRecord>,
    #[serde(default)]
    pub users: BTreeMap<String, UserStats>,
    #[serde(default)]
    pub system_events: Vec<SystemEvent>,
    pub started_at: DateTime<Utc>,
}

impl AnalyticsData {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            trips: Vec::new(),
            searches: Vec::new(),
            users: BTreeMap::new(),
            system_events: Vec::new(),
            started_at,
        }
    }

    pub fn push_trip(&mut self, trip: TripRecord) {
        self.touch_user(&trip.user, UserAction::Trip, trip.timestamp);
        self.trips.push(trip);
    }

    pub fn push_search(&mut self, search: SearchRecord) {
        self.touch_user(&search.user, UserAction::Search, search.timestamp);
        self.searches.push(search);
    }

    pub fn push_event(&mut self, event: SystemEvent) {
        self.system_events.push(event);
    }

    fn touch_user(&mut self, user: &str, action: UserAction, at: DateTime<Utc>) {
        let stats = self.users.entry(user.to_string()).or_insert(UserStats {
            first_seen: at,
            trip_count: 0,
            search_count: 0,
            last_active: at,
        });

        match action {
            UserAction::Trip => stats.trip_count += 1,
            UserAction::Search => stats.search_count += 1,
        }
        stats.last_active = stats.last_active.max(at);
    }
}

/// Storage abstraction so the planning service can be exercised in isolation.
pub trait AnalyticsStore: Send + Sync {
    fn record_trip(&self, trip: TripRecord) -> Result<(), AnalyticsError>;
    fn record_search(&self, search: SearchRecord) -> Result<(), AnalyticsError>;
    fn record_event(&self, event: SystemEvent) -> Result<(), AnalyticsError>;
    fn snapshot(&self) -> Result<AnalyticsData, AnalyticsError>;
    /// Persists buffered records; a no-op for stores without backing storage.
    fn flush(&self) -> Result<(), AnalyticsError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("failed to access analytics file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialise analytics data")]
    Serialise(#[from] serde_json::Error),
    #[error("analytics store unavailable: {0}")]
    Unavailable(String),
}
