use std::str::FromStr;

use crate::errors::AnalyticsError;
use crate::services::monte_carlo_service::SimulationParams;
use crate::services::risk_service::RiskParams;

pub const DEFAULT_ROLLING_WINDOW: usize = 21;

/// Engine settings, read from the environment with the defaults the
/// dashboards have always used.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    pub risk: RiskParams,
    pub simulation: SimulationParams,
    /// Fixed seed for the simulation; `None` draws from OS entropy
    pub seed: Option<u64>,
    pub rolling_window: usize,
}

impl AnalyticsConfig {
    pub fn from_env() -> Result<Self, AnalyticsError> {
        let defaults = Self::default();

        let config = Self {
            risk: RiskParams {
                risk_free_rate: env_or("RISK_FREE_RATE", defaults.risk.risk_free_rate)?,
                trading_days_per_year: env_or(
                    "TRADING_DAYS_PER_YEAR",
                    defaults.risk.trading_days_per_year,
                )?,
            },
            simulation: SimulationParams {
                num_simulations: env_or(
                    "MONTE_CARLO_SIMULATIONS",
                    defaults.simulation.num_simulations,
                )?,
                horizon_days: env_or("MONTE_CARLO_HORIZON_DAYS", defaults.simulation.horizon_days)?,
                sample_paths: env_or("MONTE_CARLO_SAMPLE_PATHS", defaults.simulation.sample_paths)?,
                path_step: env_or("MONTE_CARLO_PATH_STEP", defaults.simulation.path_step)?,
            },
            seed: env_opt("MONTE_CARLO_SEED")?,
            rolling_window: env_or("ROLLING_VOLATILITY_WINDOW", defaults.rolling_window)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalyticsError> {
        self.risk
            .validate()
            .and_then(|_| self.simulation.validate())
            .map_err(|e| AnalyticsError::Config(e.to_string()))?;

        if self.rolling_window < 2 {
            return Err(AnalyticsError::Config(format!(
                "ROLLING_VOLATILITY_WINDOW must be at least 2, got {}",
                self.rolling_window
            )));
        }
        Ok(())
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            risk: RiskParams::default(),
            simulation: SimulationParams::default(),
            seed: None,
            rolling_window: DEFAULT_ROLLING_WINDOW,
        }
    }
}

fn env_opt<T: FromStr>(key: &str) -> Result<Option<T>, AnalyticsError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AnalyticsError::Config(format!("{} has an invalid value: {}", key, raw))),
        _ => Ok(None),
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, AnalyticsError> {
    Ok(env_opt(key)?.unwrap_or(default))
}
