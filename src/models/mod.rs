mod analytics;
mod comparison;
mod price_point;
mod returns;
pub mod risk;
mod simulation;

pub use analytics::{AnalyticsMeta, AssetAnalytics, HeatmapBucket, HistoryRow, MonthlyPerformance};
pub use comparison::{AlignedRow, AlignedTable};
pub use price_point::{CanonicalSeries, TimePoint};
pub use returns::{ReturnPoint, ReturnSeries};
pub use risk::{DrawdownReport, RiskReport, RollingVolatilityPoint};
pub use simulation::{MonteCarloOutcome, MonteCarloResult, PathPoint, SimulationPath};
