use atis::analytics::{
    AnalyticsData, AnalyticsError, AnalyticsStore, InMemoryAnalyticsStore, JsonFileAnalyticsStore,
    SearchRecord, SystemEvent, TripRecord,
};
use atis::config::PlanningConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Analytics store chosen from configuration at start-up.
pub(crate) enum AnalyticsBackend {
    Memory(InMemoryAnalyticsStore),
    File(JsonFileAnalyticsStore),
}

impl AnalyticsBackend {
    pub(crate) fn open(config: &PlanningConfig) -> Result<Self, AnalyticsError> {
        match &config.analytics_path {
            Some(path) => JsonFileAnalyticsStore::open(path).map(Self::File),
            None => Ok(Self::Memory(InMemoryAnalyticsStore::new())),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Memory(_) => "memory".to_string(),
            Self::File(store) => store.path().display().to_string(),
        }
    }

    fn store(&self) -> &dyn AnalyticsStore {
        match self {
            Self::Memory(store) => store,
            Self::File(store) => store,
        }
    }
}

impl AnalyticsStore for AnalyticsBackend {
    fn record_trip(&self, trip: TripRecord) -> Result<(), AnalyticsError> {
        self.store().record_trip(trip)
    }

    fn record_search(&self, search: SearchRecord) -> Result<(), AnalyticsError> {
        self.store().record_search(search)
    }

    fn record_event(&self, event: SystemEvent) -> Result<(), AnalyticsError> {
        self.store().record_event(event)
    }

    fn snapshot(&self) -> Result<AnalyticsData, AnalyticsError> {
        self.store().snapshot()
    }

    fn flush(&self) -> Result<(), AnalyticsError> {
        self.store().flush()
    }
}

pub(crate) fn parse_profile(raw: &str) -> Result<String, String> {
    atis::planning::WeightProfile::parse(raw)
        .map(|profile| profile.name().to_string())
        .ok_or_else(|| {
            format!("unknown profile '{raw}' (expected commuter, budget, eco, comfort, reliable, or balanced)")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use atis::planning::WeightProfile;

    #[test]
    fn memory_backend_when_no_path_configured() {
        let config = PlanningConfig {
            analytics_path: None,
            default_profile: WeightProfile::Balanced,
        };

        let backend = AnalyticsBackend::open(&config).expect("backend opens");

        assert_eq!(backend.describe(), "memory");
        assert!(backend.flush().is_ok());
        assert!(backend.snapshot().expect("snapshot").trips.is_empty());
    }

    #[test]
    fn profile_argument_is_validated() {
        assert_eq!(parse_profile("ECO").as_deref(), Ok("eco"));
        assert!(parse_profile("scenic").is_err());
    }
}
