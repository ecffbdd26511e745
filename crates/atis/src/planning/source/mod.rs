//! Where raw itinerary candidates come from.

mod csv_import;

pub use csv_import::{CsvImport, CsvItineraryImporter, CsvItinerarySource};

use super::domain::{ItineraryCandidate, Leg, LegSegment, TransportMode};
use super::request::TripRequest;

/// Yields unscored candidates for a planning request.
pub trait CandidateItinerarySource: Send + Sync {
    fn candidates(&self, request: &TripRequest) -> Result<Vec<ItineraryCandidate>, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read candidate export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid candidate CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("candidate source unavailable: {0}")]
    Unavailable(String),
}

/// Fixed demo options around the Auckland CBD.
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleItinerarySource;

impl CandidateItinerarySource for SampleItinerarySource {
    fn candidates(&self, _request: &TripRequest) -> Result<Vec<ItineraryCandidate>, SourceError> {
        Ok(vec![
            ItineraryCandidate {
                id: "A".to_string(),
                duration_min: 22.0,
                transfers: 0,
                walk_km: 0.4,
                stairs: false,
                legs: vec![
                    Leg::Label("Bus NX1".to_string()),
                    Leg::Label("Walk".to_string()),
                ],
                modes: vec![TransportMode::Bus, TransportMode::Walk],
                reliability: 0.84,
                environmental: None,
            },
            ItineraryCandidate {
                id: "B".to_string(),
                duration_min: 28.0,
                transfers: 1,
                walk_km: 0.9,
                stairs: false,
                legs: vec![
                    Leg::Label("Bus 82".to_string()),
                    Leg::Label("Train Western".to_string()),
                ],
                modes: vec![TransportMode::Bus, TransportMode::Train],
                reliability: 0.80,
                environmental: None,
            },
            ItineraryCandidate {
                id: "C".to_string(),
                duration_min: 24.0,
                transfers: 1,
                walk_km: 1.1,
                stairs: true,
                legs: vec![
                    Leg::Label("Walk".to_string()),
                    Leg::Label("Train Eastern".to_string()),
                ],
                modes: vec![TransportMode::Walk, TransportMode::Train],
                reliability: 0.88,
                environmental: None,
            },
            ItineraryCandidate {
                id: "D".to_string(),
                duration_min: 19.0,
                transfers: 0,
                walk_km: 0.1,
                stairs: false,
                legs: vec![Leg::Segment(LegSegment::with_distance(
                    TransportMode::Bike,
                    4.2,
                ))],
                modes: vec![TransportMode::Bike],
                reliability: 0.92,
                environmental: None,
            },
        ])
    }
}
