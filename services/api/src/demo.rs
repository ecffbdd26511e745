use crate::infra::parse_profile;
use atis::analytics::{AnalyticsReport, AnalyticsStore, InMemoryAnalyticsStore};
use atis::config::AppConfig;
use atis::error::AppError;
use atis::planning::{
    comparison_chart, filter_candidates, CsvItineraryImporter, EmissionsModel, McdaEngine,
    ModalComparison, SampleItinerarySource, ScoredItinerary, TransportMode, TripConstraints,
    TripPlanningService, TripRequest, WeightProfile,
};
use atis::telemetry;
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// CSV export with id,duration_min,transfers,walk_km,stairs,modes,reliability
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Weight profile (commuter, budget, eco, comfort, reliable, balanced)
    #[arg(long, value_parser = parse_profile)]
    pub(crate) profile: Option<String>,
    /// Longest acceptable walk in kilometres
    #[arg(long, default_value_t = 1.2)]
    pub(crate) max_walk_km: f64,
    /// Drop itineraries that involve stairs
    #[arg(long)]
    pub(crate) avoid_stairs: bool,
    /// Allow itineraries that include cycling
    #[arg(long)]
    pub(crate) bike_ok: bool,
    /// Only keep itineraries using at least one of these modes (repeatable)
    #[arg(long = "mode")]
    pub(crate) modes: Vec<String>,
    /// Print the ranking as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Weight profile for the sample trip (defaults to APP_DEFAULT_PROFILE)
    #[arg(long, value_parser = parse_profile)]
    pub(crate) profile: Option<String>,
    /// Allow the cycling option in the sample trip
    #[arg(long)]
    pub(crate) bike_ok: bool,
}

impl ScoreArgs {
    fn constraints(&self) -> TripConstraints {
        TripConstraints {
            max_walk_km: self.max_walk_km,
            avoid_stairs: self.avoid_stairs,
            bike_ok: self.bike_ok,
            allowed_modes: self
                .modes
                .iter()
                .map(|mode| TransportMode::parse(mode))
                .collect(),
        }
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let import = CsvItineraryImporter::from_path(&args.csv)?;
    let total = import.candidates.len();
    let mut admitted = filter_candidates(import.candidates, &args.constraints());
    EmissionsModel::new().annotate(&mut admitted);

    let profile = args
        .profile
        .as_deref()
        .map(WeightProfile::from_name)
        .unwrap_or(config.planning.default_profile);
    let scored = McdaEngine::for_profile(profile).score_all(&admitted);

    if args.json {
        let payload = serde_json::json!({
            "profile": profile.name(),
            "results": scored,
            "chart": comparison_chart(&scored),
            "issues": import.issues,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
        );
        return Ok(());
    }

    println!(
        "Scored {} of {} candidates from {} ({} profile)",
        scored.len(),
        total,
        args.csv.display(),
        profile.name()
    );
    if !import.issues.is_empty() {
        println!("{} field(s) defaulted or corrected on import", import.issues.len());
    }
    render_ranking(&scored);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let analytics = Arc::new(InMemoryAnalyticsStore::new());
    let service = TripPlanningService::new(
        Arc::new(SampleItinerarySource),
        analytics.clone(),
        config.planning.default_profile,
    );

    let mut request = TripRequest::new([-36.8443, 174.7676], [-36.8697, 174.7781]);
    request.user = Some("demo".to_string());
    request.constraints.bike_ok = args.bike_ok;
    if let Some(profile) = args.profile {
        request.weights.profile = Some(profile);
    }

    println!("ATIS trip planning demo: Britomart -> Newmarket");
    let outcome = service.plan(&request)?;
    println!(
        "- {} candidates considered, {} removed by constraints",
        outcome.candidates_considered, outcome.filtered_out
    );
    println!(
        "- Weights: time {:.2} | cost {:.2} | comfort {:.2} | reliability {:.2} | environmental {:.2}",
        outcome.weights.time,
        outcome.weights.cost,
        outcome.weights.comfort,
        outcome.weights.reliability,
        outcome.weights.environmental
    );
    render_ranking(&outcome.itineraries);
    render_emissions(&outcome.environmental);

    let data = analytics.snapshot()?;
    let summary = AnalyticsReport::new(&data, Utc::now()).summary();
    println!("\nAnalytics snapshot");
    println!(
        "- {} trip(s) recorded for {} user(s) | {:.2} kg CO2 saved | avg score {:.1}",
        summary.total_trips,
        summary.total_users,
        summary.total_co2_saved_kg,
        summary.avg_mcda_score
    );

    Ok(())
}

fn render_ranking(scored: &[ScoredItinerary]) {
    if scored.is_empty() {
        println!("No itinerary satisfied the constraints.");
        return;
    }

    println!("Ranking:");
    for entry in scored {
        let modes: Vec<&str> = entry.itinerary.modes.iter().map(TransportMode::label).collect();
        println!(
            "  {}. {} [{}] {:.1} | {:.0} min, {} transfer(s), {:.1} km walk",
            entry.score.mcda_rank,
            entry.itinerary.id,
            modes.join(" + "),
            entry.score.mcda_score,
            entry.itinerary.duration_min,
            entry.itinerary.transfers,
            entry.itinerary.walk_km
        );
        println!("     {}", entry.score.mcda_recommendation);
    }
}

fn render_emissions(comparison: &ModalComparison) {
    println!("\nEmissions versus driving:");
    for entry in &comparison.comparisons {
        println!(
            "  - {}: {:.3} kg CO2 | saves {:.3} kg ({:.1}%) | eco score {}",
            entry.itinerary_id,
            entry.environmental.total_co2_kg,
            entry.environmental.co2_saved_kg,
            entry.environmental.co2_saved_percent,
            entry.eco_score
        );
    }
    println!("  {}", comparison.recommendation);
}
