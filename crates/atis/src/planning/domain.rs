use std::fmt;

use serde::{Deserialize, Serialize};

/// Transport modes understood by the emissions and fare tables.
///
/// Anything outside the fixed enumeration is kept verbatim in `Other` so the
/// scoring core can fall back to default rates instead of rejecting input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransportMode {
    Car,
    Bus,
    Train,
    Ferry,
    Bike,
    Walk,
    EScooter,
    Other(String),
}

impl TransportMode {
    /// Case-insensitive parse that never fails.
    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "car" => Self::Car,
            "bus" => Self::Bus,
            "train" => Self::Train,
            "ferry" => Self::Ferry,
            "bike" => Self::Bike,
            "walk" => Self::Walk,
            "e-scooter" | "escooter" | "scooter" => Self::EScooter,
            _ => Self::Other(normalized),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Car => "car",
            Self::Bus => "bus",
            Self::Train => "train",
            Self::Ferry => "ferry",
            Self::Bike => "bike",
            Self::Walk => "walk",
            Self::EScooter => "e-scooter",
            Self::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Average door-to-door speed used to derive distance from duration.
    pub fn average_speed_kmh(&self) -> f64 {
        match self {
            Self::Walk => 5.0,
            Self::Bike => 15.0,
            Self::Bus => 25.0,
            Self::Train => 50.0,
            Self::Ferry => 30.0,
            Self::Car => 40.0,
            Self::EScooter | Self::Other(_) => 25.0,
        }
    }

    /// kg CO2 per passenger-km (New Zealand averages).
    pub fn emission_rate(&self) -> f64 {
        match self {
            Self::Car => 0.171,
            Self::Bus => 0.089,
            Self::Train => 0.041,
            Self::Ferry => 0.095,
            Self::Bike | Self::Walk | Self::EScooter => 0.0,
            Self::Other(_) => Self::Bus.emission_rate(),
        }
    }

    /// Flat adult fare in NZD; modes without a fare cost nothing.
    pub fn fare_nzd(&self) -> f64 {
        match self {
            Self::Bus => 3.50,
            Self::Train => 4.00,
            Self::Ferry => 6.00,
            _ => 0.0,
        }
    }
}

impl From<String> for TransportMode {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<TransportMode> for String {
    fn from(value: TransportMode) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One mode-homogeneous segment of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Leg {
    Segment(LegSegment),
    /// Display label such as `"Bus NX1"`; the mode comes from the itinerary.
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegSegment {
    #[serde(default = "default_leg_mode")]
    pub mode: TransportMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, alias = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<f64>,
}

fn default_leg_mode() -> TransportMode {
    TransportMode::Bus
}

impl LegSegment {
    pub fn with_distance(mode: TransportMode, distance_km: f64) -> Self {
        Self {
            mode,
            distance_km: Some(distance_km),
            duration_min: None,
        }
    }

    pub fn with_duration(mode: TransportMode, duration_min: f64) -> Self {
        Self {
            mode,
            distance_km: None,
            duration_min: Some(duration_min),
        }
    }
}

/// One proposed way to travel from origin to destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryCandidate {
    pub id: String,
    #[serde(alias = "durationMin")]
    pub duration_min: f64,
    pub transfers: u32,
    pub walk_km: f64,
    #[serde(default)]
    pub stairs: bool,
    #[serde(default)]
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub modes: Vec<TransportMode>,
    pub reliability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environmental: Option<EnvironmentalRecord>,
}

impl ItineraryCandidate {
    pub fn uses(&self, mode: &TransportMode) -> bool {
        self.modes.iter().any(|candidate| candidate == mode)
    }

    /// Sum of flat fares across the modes used.
    pub fn estimated_cost_nzd(&self) -> f64 {
        self.modes.iter().map(TransportMode::fare_nzd).sum()
    }
}

/// CO2 figures for a single leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegEmissions {
    pub mode: TransportMode,
    pub distance_km: f64,
    pub co2_kg: f64,
    pub emission_rate: f64,
}

/// Derived environmental impact of one itinerary, relative to driving.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentalRecord {
    pub total_distance_km: f64,
    pub total_co2_kg: f64,
    pub car_co2_kg: f64,
    /// Negative when the itinerary emits more than driving would.
    pub co2_saved_kg: f64,
    pub co2_saved_percent: f64,
    pub trees_equivalent: f64,
    pub legs: Vec<LegEmissions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eco_score: Option<u8>,
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}
