use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::{info, warn};

use super::{AnalyticsData, AnalyticsError, AnalyticsStore, SearchRecord, SystemEvent, TripRecord};

/// Analytics kept in memory and written to a pretty-printed JSON file.
///
/// Lifecycle is explicit: [`open`](Self::open) loads the file,
/// [`flush`](AnalyticsStore::flush) writes it, and [`close`](Self::close)
/// flushes one last time.
#[derive(Debug)]
pub struct JsonFileAnalyticsStore {
    path: PathBuf,
    data: Mutex<AnalyticsData>,
}

impl JsonFileAnalyticsStore {
    /// Loads existing analytics, starting fresh when the file is missing or
    /// cannot be parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AnalyticsError> {
        let path = path.into();
        let data = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| AnalyticsError::Io {
                path: path.clone(),
                source,
            })?;
            match serde_json::from_str::<AnalyticsData>(&raw) {
                Ok(data) => {
                    info!(path = %path.display(), trips = data.trips.len(), "analytics loaded");
                    data
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "analytics file unreadable, starting fresh");
                    AnalyticsData::new(Utc::now())
                }
            }
        } else {
            AnalyticsData::new(Utc::now())
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes and releases the store.
    pub fn close(self) -> Result<(), AnalyticsError> {
        self.flush()
    }

    fn lock(&self) -> Result<MutexGuard<'_, AnalyticsData>, AnalyticsError> {
        self.data
            .lock()
            .map_err(|_| AnalyticsError::Unavailable("analytics mutex poisoned".to_string()))
    }
}

impl AnalyticsStore for JsonFileAnalyticsStore {
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
        let payload = {
            let guard = self.lock()?;
            serde_json::to_string_pretty(&*guard)?
        };

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| AnalyticsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&self.path, payload).map_err(|source| AnalyticsError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
