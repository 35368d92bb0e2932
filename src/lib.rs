//! Time-series analytics for market data.
//!
//! Provider payloads (crypto prices, fund NAVs, equity OHLCV rows) are
//! normalized into a `CanonicalSeries`, from which the services derive simple
//! returns, monthly heatmaps, annualized risk metrics, Monte Carlo projections
//! and multi-asset comparisons. Every computation is a pure function over
//! immutable inputs; fetching and transport live outside this crate.

pub mod config;
pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
pub mod services;

pub use config::AnalyticsConfig;
pub use errors::AnalyticsError;
pub use external::{load_payload, RawSeries};
pub use models::*;
pub use services::alignment_service::align;
pub use services::analytics_service::{analyze, project, simulation_rng};
pub use services::heatmap_service::{aggregate_by_month, monthly_performance};
pub use services::history_service::build_history;
pub use services::monte_carlo_service::{run_monte_carlo, MonteCarloSimulator, SimulationParams};
pub use services::normalizer::{normalize, NormalizedSeries};
pub use services::returns_service::compute_returns;
pub use services::risk_service::{compute_risk, max_drawdown, rolling_volatility, RiskParams};
