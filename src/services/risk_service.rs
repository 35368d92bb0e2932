use tracing::debug;

use crate::errors::AnalyticsError;
use crate::models::{
    CanonicalSeries, DrawdownReport, ReturnSeries, RiskReport, RollingVolatilityPoint,
};
use crate::services::statistics::{mean, sample_stdev};

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.06;
pub const DEFAULT_TRADING_DAYS: u32 = 252;
/// Calendar-day annualization is the largest sensible convention.
pub const MAX_TRADING_DAYS: u32 = 366;

/// Annualization inputs for the risk metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskParams {
    /// Annual risk-free rate as a fraction (0.06 for 6%)
    pub risk_free_rate: f64,
    pub trading_days_per_year: u32,
}

impl RiskParams {
    pub fn new(risk_free_rate: f64, trading_days_per_year: u32) -> Result<Self, AnalyticsError> {
        let params = Self {
            risk_free_rate,
            trading_days_per_year,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if !self.risk_free_rate.is_finite() {
            return Err(AnalyticsError::InvalidParameter(format!(
                "risk_free_rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        if self.trading_days_per_year == 0 || self.trading_days_per_year > MAX_TRADING_DAYS {
            return Err(AnalyticsError::InvalidParameter(format!(
                "trading_days_per_year must be between 1 and {}, got {}",
                MAX_TRADING_DAYS, self.trading_days_per_year
            )));
        }
        Ok(())
    }

    fn annualization(&self) -> f64 {
        (self.trading_days_per_year as f64).sqrt()
    }
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            trading_days_per_year: DEFAULT_TRADING_DAYS,
        }
    }
}

/// Compute annualized volatility, annualized return and Sharpe ratio.
///
/// * volatility = sample stdev of returns × sqrt(trading days)
/// * return = (mean daily return + 1) ^ trading days − 1
/// * sharpe = (return − risk-free) / volatility, or 0.0 when volatility is 0
///
/// Fewer than two returns cannot support a sample deviation; that case yields
/// the all-zero "no data" report with an empty returns list.
pub fn compute_risk(returns: &ReturnSeries, params: &RiskParams) -> RiskReport {
    let values = returns.values();
    let (Some(mean_return), Some(daily_volatility)) = (mean(&values), sample_stdev(&values)) else {
        debug!("Risk requested on {} returns, reporting no data", values.len());
        return RiskReport::empty();
    };

    let annualized_volatility = daily_volatility * params.annualization();
    let periods = i32::try_from(params.trading_days_per_year).unwrap_or(i32::MAX);
    let annualized_return = (mean_return + 1.0).powi(periods) - 1.0;

    let sharpe_ratio = if annualized_volatility > 0.0 {
        (annualized_return - params.risk_free_rate) / annualized_volatility
    } else {
        0.0
    };

    debug!(
        "Risk over {} returns: volatility {:.4}, return {:.4}, sharpe {:.4}",
        values.len(),
        annualized_volatility,
        annualized_return,
        sharpe_ratio
    );

    RiskReport {
        annualized_volatility,
        annualized_return,
        sharpe_ratio,
        returns: returns.points().to_vec(),
    }
}

/// Deepest decline from a running peak: `min(value / running_max − 1)`.
pub fn max_drawdown(series: &CanonicalSeries) -> DrawdownReport {
    let mut report = DrawdownReport {
        max_drawdown: 0.0,
        peak_date: None,
        trough_date: None,
    };

    let Some(first) = series.first() else {
        return report;
    };

    let mut peak = *first;
    for point in series {
        if point.value > peak.value {
            peak = *point;
        }
        if peak.value <= 0.0 {
            continue;
        }
        let drawdown = point.value / peak.value - 1.0;
        if drawdown < report.max_drawdown {
            report.max_drawdown = drawdown;
            report.peak_date = Some(peak.date);
            report.trough_date = Some(point.date);
        }
    }

    report
}

/// Annualized sample volatility over each trailing window of `window` returns.
///
/// The first `window − 1` returns have an incomplete window and are not emitted.
pub fn rolling_volatility(
    returns: &ReturnSeries,
    window: usize,
    params: &RiskParams,
) -> Result<Vec<RollingVolatilityPoint>, AnalyticsError> {
    if window < 2 {
        return Err(AnalyticsError::InvalidParameter(format!(
            "rolling volatility window must be at least 2, got {}",
            window
        )));
    }

    let values = returns.values();
    let annualization = params.annualization();

    Ok(returns
        .points()
        .iter()
        .enumerate()
        .skip(window - 1)
        .filter_map(|(i, point)| {
            let stdev = sample_stdev(&values[i + 1 - window..=i])?;
            Some(RollingVolatilityPoint {
                date: point.date,
                rolling_volatility: stdev * annualization,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReturnPoint, TimePoint};
    use crate::services::returns_service::compute_returns;
    use chrono::{Days, NaiveDate};

    fn day(i: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(i)
    }

    fn series(values: &[f64]) -> CanonicalSeries {
        CanonicalSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| TimePoint::new(day(i as u64), *v))
                .collect(),
        )
        .unwrap()
    }

    fn returns(values: &[f64]) -> ReturnSeries {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| ReturnPoint { date: day(i as u64 + 1), value: *v })
            .collect()
    }

    #[test]
    fn test_empty_returns_give_no_data_report() {
        let report = compute_risk(&ReturnSeries::default(), &RiskParams::default());
        assert_eq!(report, RiskReport::empty());
    }

    #[test]
    fn test_single_return_gives_no_data_report() {
        let report = compute_risk(&returns(&[0.05]), &RiskParams::default());
        assert_eq!(report.annualized_volatility, 0.0);
        assert_eq!(report.annualized_return, 0.0);
        assert_eq!(report.sharpe_ratio, 0.0);
        assert!(report.returns.is_empty());
    }

    #[test]
    fn test_flat_prices_hit_sharpe_fallback() {
        let flat = series(&[100.0; 50]);
        let report = compute_risk(&compute_returns(&flat), &RiskParams::default());

        assert_eq!(report.annualized_volatility, 0.0);
        assert_eq!(report.sharpe_ratio, 0.0);
        assert_eq!(report.annualized_return, 0.0);
        assert_eq!(report.returns.len(), 49);
    }

    #[test]
    fn test_known_values() {
        let r = returns(&[0.01, -0.02, 0.03, 0.00]);
        let report = compute_risk(&r, &RiskParams::default());

        let mean = 0.005_f64;
        let var = ((0.005_f64).powi(2) + (0.025_f64).powi(2) + (0.025_f64).powi(2) + (0.005_f64).powi(2)) / 3.0;
        let vol = var.sqrt() * 252f64.sqrt();
        let ann = (1.0 + mean).powi(252) - 1.0;

        assert!((report.annualized_volatility - vol).abs() < 1e-9);
        assert!((report.annualized_return - ann).abs() < 1e-9);
        assert!((report.sharpe_ratio - (ann - 0.06) / vol).abs() < 1e-9);
        assert_eq!(report.returns, r.points().to_vec());
    }

    #[test]
    fn test_custom_risk_free_rate() {
        let r = returns(&[0.01, -0.01, 0.02]);
        let base = compute_risk(&r, &RiskParams::default());
        let zero_rf = compute_risk(&r, &RiskParams::new(0.0, 252).unwrap());

        assert_eq!(base.annualized_volatility, zero_rf.annualized_volatility);
        assert!(zero_rf.sharpe_ratio > base.sharpe_ratio);
    }

    #[test]
    fn test_params_validation() {
        assert!(RiskParams::new(f64::NAN, 252).is_err());
        assert!(RiskParams::new(0.05, 0).is_err());
        assert!(RiskParams::new(0.05, 366).is_ok());
        assert!(RiskParams::new(0.05, 367).is_err());
        assert!(RiskParams::new(0.05, u32::MAX).is_err());
    }

    #[test]
    fn test_max_drawdown_with_decline_and_recovery() {
        let dd = max_drawdown(&series(&[100.0, 120.0, 90.0, 130.0, 117.0]));

        assert!((dd.max_drawdown - (-0.25)).abs() < 1e-12);
        assert_eq!(dd.peak_date, Some(day(1)));
        assert_eq!(dd.trough_date, Some(day(2)));
    }

    #[test]
    fn test_max_drawdown_monotone_series() {
        let dd = max_drawdown(&series(&[1.0, 2.0, 3.0]));
        assert_eq!(dd.max_drawdown, 0.0);
        assert_eq!(dd.peak_date, None);

        let empty = max_drawdown(&CanonicalSeries::empty());
        assert_eq!(empty.max_drawdown, 0.0);
    }

    #[test]
    fn test_rolling_volatility_window() {
        let r = returns(&[0.01, -0.01, 0.01, -0.01, 0.01]);
        let rolling = rolling_volatility(&r, 3, &RiskParams::default()).unwrap();

        assert_eq!(rolling.len(), 3);
        assert_eq!(rolling[0].date, day(3));
        let expected = sample_stdev(&[0.01, -0.01, 0.01]).unwrap() * 252f64.sqrt();
        assert!((rolling[0].rolling_volatility - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rolling_volatility_rejects_tiny_window() {
        assert!(rolling_volatility(&returns(&[0.01]), 1, &RiskParams::default()).is_err());
    }

    #[test]
    fn test_rolling_volatility_short_series() {
        let rolling = rolling_volatility(&returns(&[0.01, 0.02]), 21, &RiskParams::default()).unwrap();
        assert!(rolling.is_empty());
    }
}
