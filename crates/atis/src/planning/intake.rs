//! Permissive request input resolved into typed candidates.
//!
//! Missing or out-of-range attributes never reject a candidate. Each field
//! is classified so callers can tell "absent, default applied" apart from
//! "present but invalid"; the classification only feeds telemetry.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{EnvironmentalRecord, ItineraryCandidate, Leg, LegSegment, TransportMode};

pub const DEFAULT_RELIABILITY: f64 = 0.8;

/// Outcome of checking one raw field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldCheck<T> {
    Present(T),
    Defaulted(T),
    Invalid { value: T, reason: &'static str },
}

impl<T> FieldCheck<T> {
    pub fn value(&self) -> &T {
        match self {
            FieldCheck::Present(value)
            | FieldCheck::Defaulted(value)
            | FieldCheck::Invalid { value, .. } => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Defaulted,
    Invalid,
}

/// Telemetry entry describing a field the intake had to fill in or correct.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    pub candidate_id: String,
    pub field: &'static str,
    pub kind: IssueKind,
    pub detail: String,
}

/// Itinerary candidate as it arrives over the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateInput {
    pub id: Option<String>,
    #[serde(alias = "durationMin")]
    pub duration_min: Option<f64>,
    pub transfers: Option<i64>,
    #[serde(alias = "walkKm")]
    pub walk_km: Option<f64>,
    pub stairs: Option<bool>,
    pub legs: Vec<Leg>,
    pub modes: Vec<TransportMode>,
    pub reliability: Option<f64>,
    pub environmental: Option<EnvironmentalRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCandidate {
    pub candidate: ItineraryCandidate,
    pub issues: Vec<FieldIssue>,
}

fn check_non_negative(value: Option<f64>) -> FieldCheck<f64> {
    match value {
        None => FieldCheck::Defaulted(0.0),
        Some(value) if !value.is_finite() => FieldCheck::Invalid {
            value: 0.0,
            reason: "not a finite number",
        },
        Some(value) if value < 0.0 => FieldCheck::Invalid {
            value: 0.0,
            reason: "negative",
        },
        Some(value) => FieldCheck::Present(value),
    }
}

fn check_transfers(value: Option<i64>) -> FieldCheck<u32> {
    match value {
        None => FieldCheck::Defaulted(0),
        Some(value) if value < 0 => FieldCheck::Invalid {
            value: 0,
            reason: "negative",
        },
        Some(value) => match u32::try_from(value) {
            Ok(count) => FieldCheck::Present(count),
            Err(_) => FieldCheck::Invalid {
                value: u32::MAX,
                reason: "too large",
            },
        },
    }
}

fn check_reliability(value: Option<f64>) -> FieldCheck<f64> {
    match value {
        None => FieldCheck::Defaulted(DEFAULT_RELIABILITY),
        Some(value) if !value.is_finite() => FieldCheck::Invalid {
            value: DEFAULT_RELIABILITY,
            reason: "not a finite number",
        },
        Some(value) if !(0.0..=1.0).contains(&value) => FieldCheck::Invalid {
            value: value.clamp(0.0, 1.0),
            reason: "outside 0..=1",
        },
        Some(value) => FieldCheck::Present(value),
    }
}

/// Segments with a negative or non-finite distance or duration lose that
/// value, so emissions fall back to the mode speed and default leg duration.
fn check_legs(legs: Vec<Leg>) -> FieldCheck<Vec<Leg>> {
    let usable = |value: &f64| value.is_finite() && *value >= 0.0;
    let mut repaired = false;

    let legs = legs
        .into_iter()
        .map(|leg| match leg {
            Leg::Segment(segment) => {
                let distance_km = segment.distance_km.filter(usable);
                let duration_min = segment.duration_min.filter(usable);
                repaired |= distance_km != segment.distance_km
                    || duration_min != segment.duration_min;
                Leg::Segment(LegSegment {
                    mode: segment.mode,
                    distance_km,
                    duration_min,
                })
            }
            label => label,
        })
        .collect();

    if repaired {
        FieldCheck::Invalid {
            value: legs,
            reason: "negative or non-finite leg distance or duration",
        }
    } else {
        FieldCheck::Present(legs)
    }
}

struct IssueLog {
    candidate_id: String,
    issues: Vec<FieldIssue>,
}

impl IssueLog {
    fn take<T: std::fmt::Debug>(&mut self, field: &'static str, check: FieldCheck<T>) -> T {
        match check {
            FieldCheck::Present(value) => value,
            FieldCheck::Defaulted(value) => {
                debug!(candidate = %self.candidate_id, field, ?value, "candidate field defaulted");
                self.issues.push(FieldIssue {
                    candidate_id: self.candidate_id.clone(),
                    field,
                    kind: IssueKind::Defaulted,
                    detail: format!("missing, defaulted to {value:?}"),
                });
                value
            }
            FieldCheck::Invalid { value, reason } => {
                warn!(candidate = %self.candidate_id, field, reason, ?value, "candidate field invalid");
                self.issues.push(FieldIssue {
                    candidate_id: self.candidate_id.clone(),
                    field,
                    kind: IssueKind::Invalid,
                    detail: format!("{reason}, replaced with {value:?}"),
                });
                value
            }
        }
    }
}

impl CandidateInput {
    /// Resolves the input; `position` is the zero-based index used to name
    /// candidates that arrive without an id.
    pub fn resolve(self, position: usize) -> ResolvedCandidate {
        let id_check = match self.id {
            Some(id) if !id.trim().is_empty() => FieldCheck::Present(id),
            _ => FieldCheck::Defaulted(format!("Option_{}", position + 1)),
        };
        let mut log = IssueLog {
            candidate_id: id_check.value().clone(),
            issues: Vec::new(),
        };

        let id = log.take("id", id_check);
        let duration_min = log.take("duration_min", check_non_negative(self.duration_min));
        let transfers = log.take("transfers", check_transfers(self.transfers));
        let walk_km = log.take("walk_km", check_non_negative(self.walk_km));
        let reliability = log.take("reliability", check_reliability(self.reliability));
        let legs = log.take("legs", check_legs(self.legs));

        if self.modes.is_empty() {
            debug!(candidate = %id, "candidate lists no transport modes");
        }

        ResolvedCandidate {
            candidate: ItineraryCandidate {
                id,
                duration_min,
                transfers,
                walk_km,
                stairs: self.stairs.unwrap_or(false),
                legs,
                modes: self.modes,
                reliability,
                environmental: self.environmental,
            },
            issues: log.issues,
        }
    }
}

/// Resolves a batch, returning the typed candidates and every issue raised.
pub fn resolve_candidates(
    inputs: Vec<CandidateInput>,
) -> (Vec<ItineraryCandidate>, Vec<FieldIssue>) {
    let mut candidates = Vec::with_capacity(inputs.len());
    let mut issues = Vec::new();

    for (position, input) in inputs.into_iter().enumerate() {
        let resolved = input.resolve(position);
        candidates.push(resolved.candidate);
        issues.extend(resolved.issues);
    }

    (candidates, issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_are_defaulted_not_rejected() {
        let resolved = CandidateInput::default().resolve(2);

        assert_eq!(resolved.candidate.id, "Option_3");
        assert_eq!(resolved.candidate.duration_min, 0.0);
        assert_eq!(resolved.candidate.transfers, 0);
        assert_eq!(resolved.candidate.reliability, DEFAULT_RELIABILITY);
        assert!(resolved
            .issues
            .iter()
            .all(|issue| issue.kind == IssueKind::Defaulted));
        assert!(resolved
            .issues
            .iter()
            .any(|issue| issue.field == "reliability"));
    }

    #[test]
    fn out_of_range_values_are_clamped_and_flagged() {
        let input = CandidateInput {
            id: Some("X".to_string()),
            duration_min: Some(-5.0),
            transfers: Some(-1),
            walk_km: Some(0.3),
            reliability: Some(1.4),
            ..CandidateInput::default()
        };

        let resolved = input.resolve(0);

        assert_eq!(resolved.candidate.duration_min, 0.0);
        assert_eq!(resolved.candidate.transfers, 0);
        assert_eq!(resolved.candidate.walk_km, 0.3);
        assert_eq!(resolved.candidate.reliability, 1.0);
        let invalid: Vec<&str> = resolved
            .issues
            .iter()
            .filter(|issue| issue.kind == IssueKind::Invalid)
            .map(|issue| issue.field)
            .collect();
        assert_eq!(invalid, vec!["duration_min", "transfers", "reliability"]);
    }

    #[test]
    fn unusable_leg_measurements_are_dropped_and_flagged() {
        let input: CandidateInput = serde_json::from_str(
            r#"{"id":"Z","legs":[{"mode":"bus","duration_min":-60},{"mode":"train","distance_km":4.0},"Walk"],"modes":["bus","train","walk"],"reliability":0.9}"#,
        )
        .expect("payload parses");

        let resolved = input.resolve(0);

        assert_eq!(
            resolved.candidate.legs[0],
            Leg::Segment(LegSegment {
                mode: TransportMode::Bus,
                distance_km: None,
                duration_min: None,
            })
        );
        assert_eq!(
            resolved.candidate.legs[1],
            Leg::Segment(LegSegment::with_distance(TransportMode::Train, 4.0))
        );
        let invalid: Vec<&str> = resolved
            .issues
            .iter()
            .filter(|issue| issue.kind == IssueKind::Invalid)
            .map(|issue| issue.field)
            .collect();
        assert_eq!(invalid, vec!["legs"]);

        let record = crate::planning::EmissionsModel::new().itinerary_emissions(&resolved.candidate);
        assert!(record.total_co2_kg >= 0.0);
        assert!(record.legs.iter().all(|leg| leg.co2_kg >= 0.0));
    }

    #[test]
    fn accepts_legacy_field_names() {
        let input: CandidateInput = serde_json::from_str(
            r#"{"id":"A","durationMin":22,"transfers":0,"walkKm":0.4,"legs":["Bus NX1","Walk"],"modes":["bus","walk"]}"#,
        )
        .expect("legacy payload parses");

        let resolved = input.resolve(0);

        assert_eq!(resolved.candidate.duration_min, 22.0);
        assert_eq!(resolved.candidate.walk_km, 0.4);
        assert_eq!(resolved.candidate.legs.len(), 2);
        assert_eq!(
            resolved.candidate.modes,
            vec![TransportMode::Bus, TransportMode::Walk]
        );
        assert_eq!(resolved.issues.len(), 1);
        assert_eq!(resolved.issues[0].field, "reliability");
        assert_eq!(resolved.issues[0].kind, IssueKind::Defaulted);
    }
}
