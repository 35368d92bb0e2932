pub mod alignment_service;
pub mod analytics_service;
pub mod heatmap_service;
pub mod history_service;
pub mod monte_carlo_service;
pub mod normalizer;
pub mod returns_service;
pub mod risk_service;
pub mod statistics;
