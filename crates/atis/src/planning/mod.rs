//! Itinerary scoring pipeline: filter, annotate with emissions, rank.
//!
//! The pure core (`filter`, `emissions`, `mcda`) does no I/O and holds no
//! state between calls. [`TripPlanningService`] composes it with an injected
//! candidate source and analytics store.

pub mod domain;
pub mod emissions;
pub mod filter;
pub mod intake;
pub mod mcda;
pub mod request;
pub mod router;
pub mod service;
pub mod source;

#[cfg(test)]
mod tests;

pub use domain::{
    EnvironmentalRecord, ItineraryCandidate, Leg, LegEmissions, LegSegment, TransportMode,
};
pub use emissions::{
    CumulativeImpact, EmissionsModel, ImpactLevel, ImpactPeriod, ModalComparison,
    ModalComparisonEntry,
};
pub use filter::{filter_candidates, TripConstraints};
pub use intake::{
    resolve_candidates, CandidateInput, FieldCheck, FieldIssue, IssueKind, ResolvedCandidate,
};
pub use mcda::{
    comparison_chart, profile_weights, ComparisonChart, Criterion, CriterionWeights, McdaEngine,
    ScoreBreakdown, ScoredItinerary, WeightProfile, WeightSelection,
};
pub use request::TripRequest;
pub use router::planning_router;
pub use service::{PlanOutcome, PlanningError, ScoreOutcome, TripPlanningService};
pub use source::{
    CandidateItinerarySource, CsvImport, CsvItineraryImporter, CsvItinerarySource,
    SampleItinerarySource, SourceError,
};
