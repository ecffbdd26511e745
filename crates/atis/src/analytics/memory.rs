use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use super::{AnalyticsData, AnalyticsError, AnalyticsStore, SearchRecord, SystemEvent, TripRecord};

/// Process-local store; contents are lost on exit.
#[derive(Debug, Clone)]
pub struct InMemoryAnalyticsStore {
    data: Arc<Mutex<AnalyticsData>>,
}

impl InMemoryAnalyticsStore {
    pub fn new() -> Self {
        Self::with_data(AnalyticsData::new(Utc::now()))
    }

    pub fn with_data(data: AnalyticsData) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, AnalyticsData>, AnalyticsError> {
        self.data
            .lock()
            .map_err(|_| AnalyticsError::Unavailable("analytics mutex poisoned".to_string()))
    }
}

impl Default for InMemoryAnalyticsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsStore for InMemoryAnalyticsStore {
    fn record_trip(&self, trip: TripRecord) -> Result<(), AnalyticsError> {
        self.lock()?.push_trip(trip);
        Ok(())
    }

    fn record_search(&self, search: SearchRecord) -> Result<(), AnalyticsError> {
        self.lock()?.push_search(search);
        Ok(())
    }

    fn record_event(&self, event: SystemEvent) -> Result<(), AnalyticsError> {
        self.lock()?.push_event(event);
        Ok(())
    }

    fn snapshot(&self) -> Result<AnalyticsData, AnalyticsError> {
        Ok(self.lock()?.clone())
    }

    fn flush(&self) -> Result<(), AnalyticsError> {
        Ok(())
    }
}
