//! CO2 model for itineraries and batches of trips.
//!
//! All figures are kg CO2 per passenger, compared against driving the same
//! distance alone in an average petrol car.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{
    round_to, EnvironmentalRecord, ItineraryCandidate, Leg, LegEmissions, LegSegment,
    TransportMode,
};

/// Trees needed to absorb one tonne of CO2 over a year.
pub const TREES_PER_TONNE_CO2: f64 = 45.9;

const DEFAULT_LEG_DURATION_MIN: f64 = 10.0;

/// Stateless emissions calculator.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmissionsModel;

impl EmissionsModel {
    pub fn new() -> Self {
        Self
    }

    pub fn leg_emissions(&self, leg: &LegSegment) -> LegEmissions {
        let mode = leg.mode.clone();
        if !mode.is_known() {
            warn!(mode = %mode, "unknown transport mode, using default speed and bus emission rate");
        }

        let distance_km = match leg.distance_km {
            Some(distance) if distance > 0.0 => distance,
            _ => {
                let duration = leg
                    .duration_min
                    .filter(|duration| duration.is_finite() && *duration >= 0.0)
                    .unwrap_or(DEFAULT_LEG_DURATION_MIN);
                (duration / 60.0) * mode.average_speed_kmh()
            }
        };

        let emission_rate = mode.emission_rate();
        let co2_kg = distance_km * emission_rate;

        LegEmissions {
            mode,
            distance_km: round_to(distance_km, 2),
            co2_kg: round_to(co2_kg, 3),
            emission_rate,
        }
    }

    pub fn itinerary_emissions(&self, itinerary: &ItineraryCandidate) -> EnvironmentalRecord {
        let leg_count = itinerary.legs.len().max(1) as f64;
        let labelled_duration = itinerary.duration_min / leg_count;

        let legs: Vec<LegEmissions> = itinerary
            .legs
            .iter()
            .enumerate()
            .map(|(index, leg)| match leg {
                Leg::Segment(segment) => self.leg_emissions(segment),
                Leg::Label(_) => {
                    let mode = itinerary
                        .modes
                        .get(index)
                        .cloned()
                        .unwrap_or(TransportMode::Walk);
                    self.leg_emissions(&LegSegment::with_duration(mode, labelled_duration))
                }
            })
            .collect();

        let total_distance_km = round_to(legs.iter().map(|leg| leg.distance_km).sum(), 2);
        let total_co2_kg = round_to(legs.iter().map(|leg| leg.co2_kg).sum(), 3);
        let car_co2_kg = round_to(total_distance_km * TransportMode::Car.emission_rate(), 3);
        let co2_saved_kg = round_to(car_co2_kg - total_co2_kg, 3);
        let co2_saved_percent = if car_co2_kg > 0.0 {
            round_to(co2_saved_kg / car_co2_kg * 100.0, 2)
        } else {
            0.0
        };

        EnvironmentalRecord {
            total_distance_km,
            total_co2_kg,
            car_co2_kg,
            co2_saved_kg,
            co2_saved_percent,
            trees_equivalent: round_to(co2_saved_kg / 1000.0 * TREES_PER_TONNE_CO2, 2),
            legs,
            eco_score: None,
        }
    }

    /// Step rating of how much CO2 a trip saves versus driving.
    pub fn eco_score(&self, record: &EnvironmentalRecord) -> u8 {
        let saved = record.co2_saved_percent;
        if saved >= 80.0 {
            100
        } else if saved >= 60.0 {
            85
        } else if saved >= 40.0 {
            70
        } else if saved >= 20.0 {
            55
        } else if saved > 0.0 {
            40
        } else {
            20
        }
    }

    /// Emissions record with the eco-score filled in.
    pub fn assess(&self, itinerary: &ItineraryCandidate) -> EnvironmentalRecord {
        let mut record = self.itinerary_emissions(itinerary);
        record.eco_score = Some(self.eco_score(&record));
        record
    }

    /// Attaches a fresh environmental record to every candidate.
    pub fn annotate(&self, candidates: &mut [ItineraryCandidate]) {
        for candidate in candidates.iter_mut() {
            candidate.environmental = Some(self.assess(candidate));
        }
    }

    pub fn compare_modal(&self, itineraries: &[ItineraryCandidate]) -> ModalComparison {
        let comparisons: Vec<ModalComparisonEntry> = itineraries
            .iter()
            .enumerate()
            .map(|(index, itinerary)| {
                let environmental = self.assess(itinerary);
                let itinerary_id = if itinerary.id.trim().is_empty() {
                    format!("Option_{}", index + 1)
                } else {
                    itinerary.id.clone()
                };
                ModalComparisonEntry {
                    itinerary_id,
                    duration_min: itinerary.duration_min,
                    modes: itinerary.modes.clone(),
                    eco_score: environmental.eco_score.unwrap_or_default(),
                    environmental,
                }
            })
            .collect();

        let best_environmental = cleanest(&comparisons).cloned();
        let total_co2_saved_vs_car = round_to(
            comparisons
                .iter()
                .map(|entry| entry.environmental.co2_saved_kg)
                .sum(),
            3,
        );
        let recommendation = eco_recommendation(&comparisons);

        ModalComparison {
            comparisons,
            best_environmental,
            total_co2_saved_vs_car,
            recommendation,
        }
    }

    pub fn cumulative_impact(
        &self,
        trips: &[EnvironmentalRecord],
        period: ImpactPeriod,
    ) -> CumulativeImpact {
        let total_trips = trips.len() as u64;
        let total_co2: f64 = trips.iter().map(|trip| trip.total_co2_kg).sum();
        let total_co2_saved: f64 = trips.iter().map(|trip| trip.co2_saved_kg).sum();
        let total_distance: f64 = trips.iter().map(|trip| trip.total_distance_km).sum();

        let multiplier = period.annual_multiplier();
        let annual_co2_saved = total_co2_saved * multiplier as f64;
        let annual_trees = annual_co2_saved / 1000.0 * TREES_PER_TONNE_CO2;

        CumulativeImpact {
            period,
            total_trips,
            total_co2_kg: round_to(total_co2, 2),
            total_co2_saved_kg: round_to(total_co2_saved, 2),
            total_distance_km: round_to(total_distance, 2),
            avg_co2_per_trip: round_to(total_co2 / total_trips.max(1) as f64, 2),
            annual_projection: AnnualProjection {
                co2_saved_kg: round_to(annual_co2_saved, 2),
                trees_equivalent: round_to(annual_trees, 1),
                car_trips_avoided: total_trips * multiplier,
            },
            impact_level: ImpactLevel::from_annual_savings(annual_co2_saved),
        }
    }
}

fn cleanest(entries: &[ModalComparisonEntry]) -> Option<&ModalComparisonEntry> {
    entries.iter().fold(None, |best, entry| match best {
        Some(current) if current.environmental.total_co2_kg <= entry.environmental.total_co2_kg => {
            Some(current)
        }
        _ => Some(entry),
    })
}

fn dirtiest(entries: &[ModalComparisonEntry]) -> Option<&ModalComparisonEntry> {
    entries.iter().fold(None, |worst, entry| match worst {
        Some(current) if current.environmental.total_co2_kg >= entry.environmental.total_co2_kg => {
            Some(current)
        }
        _ => Some(entry),
    })
}

fn eco_recommendation(entries: &[ModalComparisonEntry]) -> String {
    let (Some(best), Some(worst)) = (cleanest(entries), dirtiest(entries)) else {
        return "No itineraries to compare.".to_string();
    };

    let best_co2 = best.environmental.total_co2_kg;
    let worst_co2 = worst.environmental.total_co2_kg;

    if best_co2 == 0.0 {
        format!(
            "Best choice: {} produces zero emissions! Perfect for the environment.",
            best.itinerary_id
        )
    } else if best.environmental.co2_saved_percent >= 70.0 {
        format!(
            "Best choice: {} saves {:.0}% CO2 compared to driving.",
            best.itinerary_id, best.environmental.co2_saved_percent
        )
    } else if worst_co2 - best_co2 > 0.5 {
        format!(
            "Consider {}: saves {:.2}kg CO2 compared to {}.",
            best.itinerary_id,
            worst_co2 - best_co2,
            worst.itinerary_id
        )
    } else {
        "All options are environmentally similar. Choose based on convenience.".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalComparisonEntry {
    pub itinerary_id: String,
    pub duration_min: f64,
    pub modes: Vec<TransportMode>,
    pub environmental: EnvironmentalRecord,
    pub eco_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalComparison {
    pub comparisons: Vec<ModalComparisonEntry>,
    pub best_environmental: Option<ModalComparisonEntry>,
    pub total_co2_saved_vs_car: f64,
    pub recommendation: String,
}

/// Reporting window a batch of trips was collected over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactPeriod {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl ImpactPeriod {
    /// Unknown names fall back to monthly.
    pub fn from_name(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "yearly" => Self::Yearly,
            _ => Self::Monthly,
        }
    }

    pub fn annual_multiplier(self) -> u64 {
        match self {
            Self::Daily => 365,
            Self::Weekly => 52,
            Self::Monthly => 12,
            Self::Yearly => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Outstanding,
    Excellent,
    VeryGood,
    Good,
    MakingADifference,
}

impl ImpactLevel {
    pub fn from_annual_savings(annual_co2_saved_kg: f64) -> Self {
        if annual_co2_saved_kg >= 1000.0 {
            Self::Outstanding
        } else if annual_co2_saved_kg >= 500.0 {
            Self::Excellent
        } else if annual_co2_saved_kg >= 200.0 {
            Self::VeryGood
        } else if annual_co2_saved_kg >= 50.0 {
            Self::Good
        } else {
            Self::MakingADifference
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Outstanding => "Outstanding",
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very good",
            Self::Good => "Good",
            Self::MakingADifference => "Making a difference",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualProjection {
    pub co2_saved_kg: f64,
    pub trees_equivalent: f64,
    pub car_trips_avoided: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeImpact {
    pub period: ImpactPeriod,
    pub total_trips: u64,
    pub total_co2_kg: f64,
    pub total_co2_saved_kg: f64,
    pub total_distance_km: f64,
    pub avg_co2_per_trip: f64,
    pub annual_projection: AnnualProjection,
    pub impact_level: ImpactLevel,
}
