use ndarray::Array2;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::errors::AnalyticsError;
use crate::models::{MonteCarloResult, PathPoint, ReturnSeries, SimulationPath};
use crate::services::statistics::{mean, percentile, sample_stdev};

/// Returns needed to estimate both the mean and the sample deviation.
pub const MIN_RETURNS: usize = 2;

pub const DEFAULT_SIMULATIONS: usize = 1000;
pub const DEFAULT_HORIZON_DAYS: usize = 252;
pub const DEFAULT_SAMPLE_PATHS: usize = 4;
pub const DEFAULT_PATH_STEP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationParams {
    pub num_simulations: usize,
    /// Columns of the value matrix; column 0 is the last observed value
    pub horizon_days: usize,
    /// How many individual paths to return for charting (0 disables them)
    pub sample_paths: usize,
    /// Decimation step for the emitted paths
    pub path_step: usize,
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if self.num_simulations == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "num_simulations must be greater than 0".to_string(),
            ));
        }
        if self.horizon_days == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "horizon_days must be greater than 0".to_string(),
            ));
        }
        if self.path_step == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "path_step must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            num_simulations: DEFAULT_SIMULATIONS,
            horizon_days: DEFAULT_HORIZON_DAYS,
            sample_paths: DEFAULT_SAMPLE_PATHS,
            path_step: DEFAULT_PATH_STEP,
        }
    }
}

/// Projects future values with a discrete multiplicative random walk.
///
/// Each day every simulation draws an i.i.d. Normal(mu, sigma) return and
/// compounds it: `v[s, t] = v[s, t-1] * (1 + draw)`. The random source is
/// supplied by the caller so runs can be made reproducible.
#[derive(Debug, Clone)]
pub struct MonteCarloSimulator {
    params: SimulationParams,
}

impl MonteCarloSimulator {
    pub fn new(params: SimulationParams) -> Result<Self, AnalyticsError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Estimate mu and sigma from historical returns, then simulate from `last_value`.
    pub fn run<R: Rng + ?Sized>(
        &self,
        returns: &ReturnSeries,
        last_value: f64,
        rng: &mut R,
    ) -> Result<MonteCarloResult, AnalyticsError> {
        let values = returns.values();
        let (Some(mu), Some(sigma)) = (mean(&values), sample_stdev(&values)) else {
            return Err(AnalyticsError::InsufficientData {
                operation: "monte carlo simulation",
                required: MIN_RETURNS,
                actual: values.len(),
            });
        };

        self.simulate(mu, sigma, last_value, rng)
    }

    /// Simulate with explicit daily return parameters.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        mu: f64,
        sigma: f64,
        last_value: f64,
        rng: &mut R,
    ) -> Result<MonteCarloResult, AnalyticsError> {
        if !last_value.is_finite() || last_value < 0.0 {
            return Err(AnalyticsError::InvalidParameter(format!(
                "last_value must be a finite non-negative number, got {}",
                last_value
            )));
        }
        let normal = Normal::new(mu, sigma).map_err(|e| {
            AnalyticsError::InvalidParameter(format!(
                "cannot sample returns with mu={} sigma={}: {}",
                mu, sigma, e
            ))
        })?;

        let n = self.params.num_simulations;
        let horizon = self.params.horizon_days;
        debug!(
            "Running {} simulations over {} days (mu={:.6}, sigma={:.6})",
            n, horizon, mu, sigma
        );

        let mut paths = Array2::<f64>::zeros((n, horizon));
        paths.column_mut(0).fill(last_value);

        // Day order matters; draws within a day are independent.
        for t in 1..horizon {
            for s in 0..n {
                let draw = normal.sample(rng);
                paths[[s, t]] = paths[[s, t - 1]] * (1.0 + draw);
            }
        }

        let finals = paths.column(horizon - 1).to_vec();
        let expected_value = mean(&finals).unwrap_or(last_value);
        let above = finals.iter().filter(|v| **v > last_value).count();
        let probability_positive = above as f64 / n as f64 * 100.0;
        let p5 = percentile(&finals, 5.0).unwrap_or(last_value);
        let p95 = percentile(&finals, 95.0).unwrap_or(last_value);

        let step = self.params.path_step;
        let sample_paths = (self.params.sample_paths > 0).then(|| {
            (0..self.params.sample_paths.min(n))
                .map(|i| SimulationPath {
                    name: format!("Simulation {}", i + 1),
                    data: (0..horizon)
                        .step_by(step)
                        .map(|day| PathPoint {
                            day,
                            value: paths[[i, day]],
                        })
                        .collect(),
                })
                .collect()
        });
        let mean_path = (0..horizon)
            .step_by(step)
            .map(|day| PathPoint {
                day,
                value: paths.column(day).mean().unwrap_or(last_value),
            })
            .collect();

        Ok(MonteCarloResult {
            expected_value,
            probability_positive,
            p5,
            p95,
            last_value,
            sample_paths,
            mean_path: Some(mean_path),
        })
    }
}

/// One-shot projection with the given parameters.
pub fn run_monte_carlo<R: Rng + ?Sized>(
    returns: &ReturnSeries,
    last_value: f64,
    params: SimulationParams,
    rng: &mut R,
) -> Result<MonteCarloResult, AnalyticsError> {
    MonteCarloSimulator::new(params)?.run(returns, last_value, rng)
}
