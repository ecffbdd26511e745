use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::{CandidateItinerarySource, SourceError};
use crate::planning::domain::{ItineraryCandidate, Leg, TransportMode};
use crate::planning::intake::{resolve_candidates, CandidateInput, FieldIssue};
use crate::planning::request::TripRequest;

/// Candidates read from a CSV export, plus every intake issue raised.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvImport {
    pub candidates: Vec<ItineraryCandidate>,
    pub issues: Vec<FieldIssue>,
}

/// Reads candidates from CSV with the header
/// `id,duration_min,transfers,walk_km,stairs,modes,reliability`.
///
/// `modes` lists modes separated by `|` or `+`; each becomes one labelled leg.
/// Blank cells go through the usual intake defaults.
pub struct CsvItineraryImporter;

impl CsvItineraryImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CsvImport, SourceError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<CsvImport, SourceError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut inputs = Vec::new();
        for row in csv_reader.deserialize::<CandidateRow>() {
            inputs.push(row?.into_input());
        }

        let (candidates, issues) = resolve_candidates(inputs);
        Ok(CsvImport { candidates, issues })
    }
}

/// Serves the same imported candidates for every request.
#[derive(Debug, Clone)]
pub struct CsvItinerarySource {
    candidates: Vec<ItineraryCandidate>,
}

impl CsvItinerarySource {
    pub fn new(import: CsvImport) -> Self {
        Self {
            candidates: import.candidates,
        }
    }
}

impl CandidateItinerarySource for CsvItinerarySource {
    fn candidates(&self, _request: &TripRequest) -> Result<Vec<ItineraryCandidate>, SourceError> {
        Ok(self.candidates.clone())
    }
}

#[derive(Debug, Deserialize)]
struct CandidateRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(default, alias = "durationMin")]
    duration_min: Option<f64>,
    #[serde(default)]
    transfers: Option<i64>,
    #[serde(default)]
    walk_km: Option<f64>,
    #[serde(default, deserialize_with = "flag")]
    stairs: Option<bool>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    modes: Option<String>,
    #[serde(default)]
    reliability: Option<f64>,
}

impl CandidateRow {
    fn into_input(self) -> CandidateInput {
        let modes: Vec<TransportMode> = self
            .modes
            .as_deref()
            .map(split_modes)
            .unwrap_or_default();
        let legs = modes
            .iter()
            .map(|mode| Leg::Label(mode.label().to_string()))
            .collect();

        CandidateInput {
            id: self.id,
            duration_min: self.duration_min,
            transfers: self.transfers,
            walk_km: self.walk_km,
            stairs: self.stairs,
            legs,
            modes,
            reliability: self.reliability,
            environmental: None,
        }
    }
}

fn split_modes(raw: &str) -> Vec<TransportMode> {
    raw.split(['|', '+'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(TransportMode::parse)
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Ok(Some(true)),
            "false" | "no" | "n" | "0" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "'{other}' is not a yes/no flag"
            ))),
        },
    }
}
