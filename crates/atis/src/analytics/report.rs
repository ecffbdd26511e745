use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use serde::Serialize;

use super::{AnalyticsData, TripRecord};
use crate::planning::domain::{round_to, EnvironmentalRecord};
use crate::planning::emissions::{CumulativeImpact, EmissionsModel, ImpactPeriod, TREES_PER_TONNE_CO2};

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Route coordinates are grouped at roughly 10 m resolution.
const ROUTE_PRECISION: f64 = 10_000.0;
const SUCCESSFUL_TRIP_SCORE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_trips: usize,
    pub total_users: usize,
    pub total_searches: usize,
    pub active_users_7d: usize,
    pub total_co2_saved_kg: f64,
    pub total_distance_km: f64,
    pub avg_duration_min: f64,
    pub avg_transfers: f64,
    pub avg_mcda_score: f64,
    pub car_trips_avoided: usize,
    pub system_uptime_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularRoute {
    pub origin: [f64; 2],
    pub destination: [f64; 2],
    pub trip_count: usize,
    pub avg_duration_min: f64,
    pub common_modes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub day: &'static str,
    pub hour: u32,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModePopularity {
    pub counts: BTreeMap<String, u64>,
    pub percentages: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentalImpact {
    pub total_co2_saved_kg: f64,
    pub total_distance_km: f64,
    pub trees_equivalent: f64,
    pub car_trips_avoided: usize,
    pub avg_co2_saved_per_trip: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardMetric {
    Trips,
    Environmental,
}

impl LeaderboardMetric {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trips" => Some(Self::Trips),
            "environmental" => Some(Self::Environmental),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LeaderboardEntry {
    Trips {
        username: String,
        trip_count: u64,
        search_count: u64,
    },
    Environmental {
        username: String,
        co2_saved_kg: f64,
        trees_equivalent: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub total_evaluations: usize,
    pub avg_mcda_score: f64,
    /// Share of planned trips whose chosen itinerary scored at least 50.
    pub success_rate: f64,
    /// Average score rescaled to a 0..=5 rating.
    pub avg_satisfaction: f64,
    pub avg_results_per_search: f64,
}

/// Read-only views over an analytics snapshot, evaluated at `now`.
pub struct AnalyticsReport<'a> {
    data: &'a AnalyticsData,
    now: DateTime<Utc>,
}

impl<'a> AnalyticsReport<'a> {
    pub fn new(data: &'a AnalyticsData, now: DateTime<Utc>) -> Self {
        Self { data, now }
    }

    pub fn summary(&self) -> SummaryStats {
        let trips = &self.data.trips;
        let week_ago = self.now - Duration::days(7);

        SummaryStats {
            total_trips: trips.len(),
            total_users: self.data.users.len(),
            total_searches: self.data.searches.len(),
            active_users_7d: self
                .data
                .users
                .values()
                .filter(|stats| stats.last_active >= week_ago)
                .count(),
            total_co2_saved_kg: round_to(trips.iter().map(TripRecord::co2_saved_kg).sum(), 2),
            total_distance_km: round_to(trips.iter().map(TripRecord::distance_km).sum(), 2),
            avg_duration_min: round_to(mean(trips.iter().map(|trip| trip.duration_min)), 1),
            avg_transfers: round_to(mean(trips.iter().map(|trip| f64::from(trip.transfers))), 2),
            avg_mcda_score: round_to(mean(trips.iter().map(|trip| trip.mcda_score)), 1),
            car_trips_avoided: car_free_trips(trips),
            system_uptime_days: (self.now - self.data.started_at).num_days().max(0),
        }
    }

    /// Most requested origin/destination pairs; ties keep first-seen order.
    pub fn popular_routes(&self, limit: usize) -> Vec<PopularRoute> {
        struct RouteGroup<'t> {
            key: [i64; 4],
            trips: Vec<&'t TripRecord>,
        }

        let mut groups: Vec<RouteGroup<'_>> = Vec::new();
        for trip in &self.data.trips {
            let key = route_key(trip);
            match groups.iter_mut().find(|group| group.key == key) {
                Some(group) => group.trips.push(trip),
                None => groups.push(RouteGroup {
                    key,
                    trips: vec![trip],
                }),
            }
        }

        groups.sort_by(|a, b| b.trips.len().cmp(&a.trips.len()));

        groups
            .into_iter()
            .take(limit)
            .map(|group| {
                let first = group.trips[0];
                PopularRoute {
                    origin: first.origin,
                    destination: first.destination,
                    trip_count: group.trips.len(),
                    avg_duration_min: round_to(
                        mean(group.trips.iter().map(|trip| trip.duration_min)),
                        1,
                    ),
                    common_modes: common_modes(&group.trips, 3),
                }
            })
            .collect()
    }

    /// 7x24 trip counts by UTC weekday and hour, Monday first.
    pub fn hourly_heatmap(&self) -> Vec<HeatmapCell> {
        let mut counts = [[0u64; 24]; 7];
        for trip in &self.data.trips {
            let day = trip.timestamp.weekday().num_days_from_monday() as usize;
            let hour = trip.timestamp.hour() as usize;
            counts[day][hour] += 1;
        }

        WEEKDAYS
            .iter()
            .zip(counts.iter())
            .flat_map(|(day, hours)| {
                hours.iter().enumerate().map(move |(hour, count)| HeatmapCell {
                    day: *day,
                    hour: hour as u32,
                    count: *count,
                })
            })
            .collect()
    }

    pub fn mode_popularity(&self) -> ModePopularity {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for mode in self.data.trips.iter().flat_map(|trip| trip.modes.iter()) {
            *counts.entry(mode.label().to_string()).or_default() += 1;
        }

        let total: u64 = counts.values().sum();
        let percentages = counts
            .iter()
            .map(|(mode, count)| {
                let share = if total == 0 {
                    0.0
                } else {
                    *count as f64 / total as f64 * 100.0
                };
                (mode.clone(), round_to(share, 1))
            })
            .collect();

        ModePopularity {
            counts,
            percentages,
        }
    }

    pub fn environmental_impact(&self) -> EnvironmentalImpact {
        let trips = &self.data.trips;
        let saved: f64 = trips.iter().map(TripRecord::co2_saved_kg).sum();

        EnvironmentalImpact {
            total_co2_saved_kg: round_to(saved, 2),
            total_distance_km: round_to(trips.iter().map(TripRecord::distance_km).sum(), 2),
            trees_equivalent: round_to(saved / 1000.0 * TREES_PER_TONNE_CO2, 1),
            car_trips_avoided: car_free_trips(trips),
            avg_co2_saved_per_trip: round_to(saved / trips.len().max(1) as f64, 2),
        }
    }

    /// Projects the recorded trips over `period` with the emissions model.
    pub fn cumulative_impact(&self, period: ImpactPeriod) -> CumulativeImpact {
        let records: Vec<EnvironmentalRecord> = self
            .data
            .trips
            .iter()
            .filter_map(|trip| trip.environmental.clone())
            .collect();
        EmissionsModel::new().cumulative_impact(&records, period)
    }

    /// Top users by trip count or CO2 saved; ties keep username order.
    pub fn leaderboard(&self, metric: LeaderboardMetric, limit: usize) -> Vec<LeaderboardEntry> {
        match metric {
            LeaderboardMetric::Trips => {
                let mut users: Vec<_> = self.data.users.iter().collect();
                users.sort_by(|a, b| b.1.trip_count.cmp(&a.1.trip_count));
                users
                    .into_iter()
                    .take(limit)
                    .map(|(username, stats)| LeaderboardEntry::Trips {
                        username: username.clone(),
                        trip_count: stats.trip_count,
                        search_count: stats.search_count,
                    })
                    .collect()
            }
            LeaderboardMetric::Environmental => {
                let mut saved: BTreeMap<&str, f64> = BTreeMap::new();
                for trip in &self.data.trips {
                    *saved.entry(trip.user.as_str()).or_default() += trip.co2_saved_kg();
                }

                let mut users: Vec<_> = saved.into_iter().collect();
                users.sort_by(|a, b| b.1.total_cmp(&a.1));
                users
                    .into_iter()
                    .take(limit)
                    .map(|(username, co2)| LeaderboardEntry::Environmental {
                        username: username.to_string(),
                        co2_saved_kg: round_to(co2, 2),
                        trees_equivalent: round_to(co2 / 1000.0 * TREES_PER_TONNE_CO2, 2),
                    })
                    .collect()
            }
        }
    }

    /// Evaluation quality; an idle system reports full success.
    pub fn performance(&self) -> PerformanceMetrics {
        let trips = &self.data.trips;
        let searches = &self.data.searches;
        let avg_mcda_score = mean(trips.iter().map(|trip| trip.mcda_score));
        let successful = trips
            .iter()
            .filter(|trip| trip.mcda_score >= SUCCESSFUL_TRIP_SCORE)
            .count();
        let success_rate = if trips.is_empty() {
            100.0
        } else {
            successful as f64 / trips.len() as f64 * 100.0
        };

        PerformanceMetrics {
            total_evaluations: trips.len(),
            avg_mcda_score: round_to(avg_mcda_score, 1),
            success_rate: round_to(success_rate, 1),
            avg_satisfaction: round_to((avg_mcda_score / 20.0).min(5.0), 1),
            avg_results_per_search: round_to(
                mean(searches.iter().map(|search| search.results_count as f64)),
                1,
            ),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn car_free_trips(trips: &[TripRecord]) -> usize {
    trips
        .iter()
        .filter(|trip| !trip.uses_car())
        .count()
}

fn route_key(trip: &TripRecord) -> [i64; 4] {
    let scale = |value: f64| (value * ROUTE_PRECISION).round() as i64;
    [
        scale(trip.origin[0]),
        scale(trip.origin[1]),
        scale(trip.destination[0]),
        scale(trip.destination[1]),
    ]
}

fn common_modes(trips: &[&TripRecord], limit: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for mode in trips.iter().flat_map(|trip| trip.modes.iter()) {
        match counts.iter_mut().find(|(label, _)| label == mode.label()) {
            Some((_, count)) => *count += 1,
            None => counts.push((mode.label().to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(label, _)| label).collect()
}
