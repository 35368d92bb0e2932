use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub day: usize,
    pub value: f64,
}

/// A decimated simulated trajectory, used for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationPath {
    pub name: String,
    pub data: Vec<PathPoint>,
}

/// Summary of the final-day value distribution across all simulations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub expected_value: f64,
    /// Share of simulations ending above `last_value`, in percent (0-100)
    pub probability_positive: f64,
    pub p5: f64,
    pub p95: f64,
    pub last_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_paths: Option<Vec<SimulationPath>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_path: Option<Vec<PathPoint>>,
}

/// Transport shape for a projection: either the result, or the message payload
/// used when there is not enough history to estimate the return distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonteCarloOutcome {
    Projection(MonteCarloResult),
    Unavailable { message: String },
}

impl MonteCarloOutcome {
    pub fn projection(&self) -> Option<&MonteCarloResult> {
        match self {
            MonteCarloOutcome::Projection(result) => Some(result),
            MonteCarloOutcome::Unavailable { .. } => None,
        }
    }
}
