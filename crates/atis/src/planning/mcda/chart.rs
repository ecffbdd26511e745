use serde::{Deserialize, Serialize};

use super::weights::Criterion;
use super::ScoredItinerary;

/// Radar-chart projection of ranked itineraries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonChart {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub label: String,
    /// Sub-scores ordered time, cost, comfort, reliability, environmental.
    pub data: [f64; 5],
}

pub fn comparison_chart(scored: &[ScoredItinerary]) -> ComparisonChart {
    ComparisonChart {
        labels: Criterion::ALL
            .iter()
            .map(|criterion| criterion.title().to_string())
            .collect(),
        datasets: scored
            .iter()
            .map(|entry| ChartDataset {
                label: format!("Option {}", entry.itinerary.id),
                data: entry.score.mcda_breakdown.to_array(),
            })
            .collect(),
    }
}
