use chrono::NaiveDate;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::models::ReturnPoint;

/// Decimal digits kept for each echoed return when a report is serialized.
pub const RETURN_DECIMALS: i32 = 8;

/// Annualized risk statistics for a return series.
///
/// All values are fractions (0.25 for 25%). The per-date returns are echoed
/// back unrounded; rounding happens only on serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    pub annualized_volatility: f64,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    #[serde(serialize_with = "serialize_rounded_returns")]
    pub returns: Vec<ReturnPoint>,
}

impl RiskReport {
    /// The canonical "no data" report.
    pub fn empty() -> Self {
        Self {
            annualized_volatility: 0.0,
            annualized_return: 0.0,
            sharpe_ratio: 0.0,
            returns: Vec::new(),
        }
    }
}

impl Default for RiskReport {
    fn default() -> Self {
        Self::empty()
    }
}

/// Deepest peak-to-trough decline of a value series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownReport {
    /// Negative fraction (-0.25 for a 25% decline), 0.0 when the series never fell
    pub max_drawdown: f64,
    pub peak_date: Option<NaiveDate>,
    pub trough_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingVolatilityPoint {
    pub date: NaiveDate,
    pub rolling_volatility: f64,
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn serialize_rounded_returns<S>(returns: &[ReturnPoint], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(returns.len()))?;
    for point in returns {
        seq.serialize_element(&ReturnPoint {
            date: point.date,
            value: round_to(point.value, RETURN_DECIMALS),
        })?;
    }
    seq.end()
}
