use std::path::Path;

use serde_json::json;
use tracing::{info, warn};

use rustfolio_analytics::logging::{init_logging, LoggingConfig};
use rustfolio_analytics::{
    align, analyze, load_payload, normalize, simulation_rng, AnalyticsConfig,
};

const USAGE: &str = "usage: rustfolio-analytics [id=]payload.json [[id=]payload.json ...]";

/// `id=path` or a bare path, in which case the file stem is the id.
fn parse_input(arg: &str) -> (String, String) {
    if let Some((id, path)) = arg.split_once('=') {
        if !id.is_empty() && !path.is_empty() {
            return (id.to_string(), path.to_string());
        }
    }
    let id = Path::new(arg)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(arg)
        .to_string();
    (id, arg.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = AnalyticsConfig::from_env()?;
    let inputs: Vec<(String, String)> = std::env::args().skip(1).map(|a| parse_input(&a)).collect();
    if inputs.is_empty() {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let mut rng = simulation_rng(config.seed);
    let mut series = Vec::with_capacity(inputs.len());
    let mut assets = serde_json::Map::new();

    for (id, path) in &inputs {
        let raw = load_payload(path).await?;
        info!(
            "Loaded {} payload '{}' with {} records from {}",
            raw.source_name(),
            id,
            raw.record_count(),
            path
        );

        let normalized = normalize(&raw);
        if normalized.series.is_empty() {
            warn!("Payload '{}' has no usable points", id);
        }

        let analytics = analyze(&normalized, &config, &mut rng)?;
        if analytics.monte_carlo.projection().is_none() {
            warn!("No Monte Carlo projection for '{}'", id);
        }
        assets.insert(id.clone(), serde_json::to_value(&analytics)?);
        series.push((id.clone(), normalized.series));
    }

    let comparison = (series.len() > 1).then(|| {
        align(series.iter().map(|(id, s)| (id.as_str(), s))).to_records()
    });

    let report = json!({
        "assets": assets,
        "comparison": comparison,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
