use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::AnalyticsConfig;
use crate::errors::AnalyticsError;
use crate::models::{AnalyticsMeta, AssetAnalytics, CanonicalSeries, MonteCarloOutcome, ReturnSeries};
use crate::services::heatmap_service::{aggregate_by_month, monthly_performance};
use crate::services::history_service::build_history;
use crate::services::monte_carlo_service::MonteCarloSimulator;
use crate::services::normalizer::NormalizedSeries;
use crate::services::returns_service::compute_returns;
use crate::services::risk_service::{compute_risk, max_drawdown, rolling_volatility};

/// Random source for projections: seeded when configured, OS entropy otherwise.
pub fn simulation_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Run every single-asset computation over one normalized series.
pub fn analyze<R: Rng + ?Sized>(
    normalized: &NormalizedSeries,
    config: &AnalyticsConfig,
    rng: &mut R,
) -> Result<AssetAnalytics, AnalyticsError> {
    let series = &normalized.series;
    let returns = compute_returns(series);

    let meta = AnalyticsMeta {
        points: series.len(),
        start: series.start(),
        end: series.end(),
        dropped: normalized.dropped,
    };

    let analytics = AssetAnalytics {
        meta,
        history: build_history(series),
        heatmap: aggregate_by_month(&returns),
        monthly_performance: monthly_performance(series),
        risk: compute_risk(&returns, &config.risk),
        drawdown: max_drawdown(series),
        rolling_volatility: rolling_volatility(&returns, config.rolling_window, &config.risk)?,
        monte_carlo: project(series, &returns, config, rng)?,
    };

    info!(
        "Analyzed {} points ({} returns) from {:?} to {:?}",
        analytics.meta.points,
        returns.len(),
        analytics.meta.start,
        analytics.meta.end
    );

    Ok(analytics)
}

/// Monte Carlo projection from the series' last value, with "not enough
/// history" reported as a message payload instead of an error.
pub fn project<R: Rng + ?Sized>(
    series: &CanonicalSeries,
    returns: &ReturnSeries,
    config: &AnalyticsConfig,
    rng: &mut R,
) -> Result<MonteCarloOutcome, AnalyticsError> {
    let Some(last_value) = series.last_value() else {
        return Ok(MonteCarloOutcome::Unavailable {
            message: "No price data".to_string(),
        });
    };

    let simulator = MonteCarloSimulator::new(config.simulation)?;
    match simulator.run(returns, last_value, rng) {
        Ok(result) => Ok(MonteCarloOutcome::Projection(result)),
        Err(e) if e.is_insufficient_data() => {
            debug!("Skipping projection: {}", e);
            Ok(MonteCarloOutcome::Unavailable {
                message: "Insufficient data for Monte Carlo simulation".to_string(),
            })
        }
        Err(e) => Err(e),
    }
}
