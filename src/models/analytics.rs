use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{DrawdownReport, MonteCarloOutcome, RiskReport, RollingVolatilityPoint};

/// Seasonal bucket: mean daily return of every observation in a calendar month,
/// across all years in the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapBucket {
    pub month: u32,
    pub aggregate_return: f64,
}

/// Per (year, month) change between the first and last value observed in the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPerformance {
    pub year: i32,
    pub month: u32,
    /// Percent change, e.g. 2.5 for +2.5%
    pub value: f64,
    /// Last value observed in the month
    pub nav: f64,
}

/// One row of a price history chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub date: NaiveDate,
    pub value: f64,
    #[serde(rename = "return")]
    pub daily_return: Option<f64>,
    pub ma20: Option<f64>,
    pub ma50: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsMeta {
    pub points: usize,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Raw records discarded during normalization
    pub dropped: usize,
}

/// Everything the engine derives from a single asset's series in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct AssetAnalytics {
    pub meta: AnalyticsMeta,
    pub history: Vec<HistoryRow>,
    pub heatmap: Vec<HeatmapBucket>,
    pub monthly_performance: Vec<MonthlyPerformance>,
    pub risk: RiskReport,
    pub drawdown: DrawdownReport,
    pub rolling_volatility: Vec<RollingVolatilityPoint>,
    pub monte_carlo: MonteCarloOutcome,
}
