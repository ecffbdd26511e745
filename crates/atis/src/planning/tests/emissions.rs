use super::common::*;

use crate::planning::domain::{EnvironmentalRecord, LegSegment, TransportMode};
use crate::planning::emissions::{EmissionsModel, ImpactLevel, ImpactPeriod};

#[test]
fn ten_km_bus_leg_matches_published_rates() {
    let model = EmissionsModel::new();

    let leg = model.leg_emissions(&LegSegment::with_distance(TransportMode::Bus, 10.0));
    assert_eq!(leg.co2_kg, 0.89);
    assert_eq!(leg.distance_km, 10.0);

    let record = model.itinerary_emissions(&single_leg("bus", TransportMode::Bus, 10.0));
    assert_eq!(record.total_co2_kg, 0.89);
    assert_eq!(record.car_co2_kg, 1.71);
    assert_eq!(record.co2_saved_kg, 0.82);
    assert_eq!(record.co2_saved_percent, 47.95);
    assert_eq!(model.eco_score(&record), 70);
}

#[test]
fn zero_distance_falls_back_to_duration() {
    let model = EmissionsModel::new();
    let leg = LegSegment {
        mode: TransportMode::Bus,
        distance_km: Some(0.0),
        duration_min: Some(12.0),
    };

    assert_eq!(model.leg_emissions(&leg).distance_km, 5.0);
}

#[test]
fn unknown_mode_uses_bus_emission_rate() {
    let model = EmissionsModel::new();
    let leg = LegSegment::with_distance(TransportMode::parse("Gondola"), 10.0);

    let emissions = model.leg_emissions(&leg);

    assert_eq!(emissions.mode, TransportMode::Other("gondola".to_string()));
    assert_eq!(emissions.co2_kg, 0.89);
}

#[test]
fn labelled_legs_share_the_itinerary_duration() {
    let model = EmissionsModel::new();
    let itinerary = candidate(
        "T",
        30.0,
        0,
        0.2,
        0.9,
        vec![TransportMode::Train, TransportMode::Walk],
    );

    let record = model.itinerary_emissions(&itinerary);

    assert_eq!(record.legs.len(), 2);
    assert_eq!(record.legs[0].distance_km, 12.5);
    assert_eq!(record.legs[1].distance_km, 1.25);
    assert_eq!(record.legs[1].co2_kg, 0.0);
    assert_eq!(record.total_distance_km, 13.75);
}

#[test]
fn emissions_are_never_negative_and_can_exceed_driving() {
    let model = EmissionsModel::new();
    let ferry = model.itinerary_emissions(&single_leg("ferry", TransportMode::Ferry, 8.0));

    assert!(ferry.total_co2_kg >= 0.0);
    assert!(ferry.co2_saved_kg > 0.0);

    let car = model.itinerary_emissions(&single_leg("car", TransportMode::Car, 8.0));
    assert_eq!(car.co2_saved_kg, 0.0);
    assert_eq!(car.co2_saved_percent, 0.0);
    assert_eq!(model.eco_score(&car), 20);
}

#[test]
fn eco_score_is_a_step_function() {
    let model = EmissionsModel::new();
    let score = |percent: f64| {
        model.eco_score(&EnvironmentalRecord {
            co2_saved_percent: percent,
            ..EnvironmentalRecord::default()
        })
    };

    assert_eq!(score(100.0), 100);
    assert_eq!(score(80.0), 100);
    assert_eq!(score(79.99), 85);
    assert_eq!(score(60.0), 85);
    assert_eq!(score(40.0), 70);
    assert_eq!(score(20.0), 55);
    assert_eq!(score(0.01), 40);
    assert_eq!(score(0.0), 20);
    assert_eq!(score(-12.0), 20);
}

#[test]
fn annotate_attaches_scored_records() {
    let model = EmissionsModel::new();
    let mut candidates = sample_candidates();

    model.annotate(&mut candidates);

    assert!(candidates
        .iter()
        .all(|candidate| candidate.environmental.is_some()));
    let bike = candidates[3].environmental.as_ref().expect("annotated");
    assert_eq!(bike.total_co2_kg, 0.0);
    assert_eq!(bike.eco_score, Some(100));
}

#[test]
fn modal_comparison_prefers_zero_emission_options() {
    let model = EmissionsModel::new();
    let itineraries = vec![
        single_leg("Drive", TransportMode::Car, 6.0),
        single_leg("Cycle", TransportMode::Bike, 6.0),
    ];

    let comparison = model.compare_modal(&itineraries);

    assert_eq!(comparison.comparisons.len(), 2);
    let best = comparison.best_environmental.expect("best option");
    assert_eq!(best.itinerary_id, "Cycle");
    assert_eq!(
        comparison.recommendation,
        "Best choice: Cycle produces zero emissions! Perfect for the environment."
    );
}

#[test]
fn modal_comparison_of_nothing_has_no_best() {
    let comparison = EmissionsModel::new().compare_modal(&[]);

    assert!(comparison.comparisons.is_empty());
    assert!(comparison.best_environmental.is_none());
    assert_eq!(comparison.total_co2_saved_vs_car, 0.0);
    assert_eq!(comparison.recommendation, "No itineraries to compare.");
}

#[test]
fn a_clear_emissions_gap_names_both_options() {
    let model = EmissionsModel::new();
    let itineraries = vec![
        single_leg("Drive", TransportMode::Car, 10.0),
        single_leg("Bus", TransportMode::Bus, 10.0),
    ];

    let comparison = model.compare_modal(&itineraries);

    let best = comparison.best_environmental.expect("best option");
    assert_eq!(best.itinerary_id, "Bus");
    assert_eq!(best.environmental.co2_saved_percent, 47.95);
    assert_eq!(
        comparison.recommendation,
        "Consider Bus: saves 0.82kg CO2 compared to Drive."
    );
}

#[test]
fn similar_options_get_a_neutral_recommendation() {
    let model = EmissionsModel::new();
    let itineraries = vec![
        single_leg("X", TransportMode::Bus, 2.0),
        single_leg("Y", TransportMode::Bus, 2.5),
    ];

    let comparison = model.compare_modal(&itineraries);

    assert_eq!(
        comparison.recommendation,
        "All options are environmentally similar. Choose based on convenience."
    );
}

#[test]
fn cumulative_impact_projects_a_year() {
    let trips = vec![
        EnvironmentalRecord {
            total_co2_kg: 0.5,
            co2_saved_kg: 1.0,
            total_distance_km: 8.0,
            ..EnvironmentalRecord::default()
        },
        EnvironmentalRecord {
            total_co2_kg: 0.3,
            co2_saved_kg: 2.0,
            total_distance_km: 12.0,
            ..EnvironmentalRecord::default()
        },
    ];

    let impact = EmissionsModel::new().cumulative_impact(&trips, ImpactPeriod::Weekly);

    assert_eq!(impact.total_trips, 2);
    assert_eq!(impact.total_co2_saved_kg, 3.0);
    assert_eq!(impact.total_distance_km, 20.0);
    assert_eq!(impact.avg_co2_per_trip, 0.4);
    assert_eq!(impact.annual_projection.co2_saved_kg, 156.0);
    assert_eq!(impact.annual_projection.trees_equivalent, 7.2);
    assert_eq!(impact.annual_projection.car_trips_avoided, 104);
    assert_eq!(impact.impact_level, ImpactLevel::Good);
}

#[test]
fn unknown_period_names_default_to_monthly() {
    assert_eq!(ImpactPeriod::from_name("fortnightly"), ImpactPeriod::Monthly);
    assert_eq!(ImpactPeriod::from_name("Daily"), ImpactPeriod::Daily);
}
