use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::AnalyticsError;
use crate::models::TimePoint;

/// `[epoch_ms, price]` pair as returned by the CoinGecko market chart endpoint.
/// The price may be `null` for gaps.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct CryptoPrice(pub f64, pub Option<f64>);

/// One NAV entry from mfapi; both fields arrive as strings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NavRecord {
    pub date: String,
    pub nav: String,
}

/// Daily OHLCV row keyed by date. Only the close feeds the analytics, so the
/// other columns tolerate junk values.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OhlcvRow {
    #[serde(alias = "Date", alias = "datetime")]
    pub date: String,
    #[serde(default, alias = "Open", deserialize_with = "lenient_number")]
    pub open: Option<f64>,
    #[serde(default, alias = "High", deserialize_with = "lenient_number")]
    pub high: Option<f64>,
    #[serde(default, alias = "Low", deserialize_with = "lenient_number")]
    pub low: Option<f64>,
    #[serde(default, alias = "Close", deserialize_with = "lenient_number")]
    pub close: Option<f64>,
    #[serde(default, alias = "Volume", deserialize_with = "lenient_number")]
    pub volume: Option<f64>,
}

/// Raw history as handed over by a provider adapter, tagged by payload shape.
///
/// Records are decoded one by one: a record that does not match its shape is
/// kept as `None` so normalization can count it as dropped.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum RawSeries {
    /// Ascending by time, possibly several points per day.
    Crypto {
        #[serde(deserialize_with = "lenient_records")]
        prices: Vec<Option<CryptoPrice>>,
    },
    /// Usually most-recent-first.
    Fund {
        #[serde(deserialize_with = "lenient_records")]
        data: Vec<Option<NavRecord>>,
    },
    /// Ascending by date.
    Equity {
        #[serde(deserialize_with = "lenient_records")]
        rows: Vec<Option<OhlcvRow>>,
    },
    /// Already dated and numeric, in any order.
    Canonical {
        #[serde(deserialize_with = "lenient_records")]
        points: Vec<Option<TimePoint>>,
    },
}

impl RawSeries {
    pub fn source_name(&self) -> &'static str {
        match self {
            RawSeries::Crypto { .. } => "crypto",
            RawSeries::Fund { .. } => "fund",
            RawSeries::Equity { .. } => "equity",
            RawSeries::Canonical { .. } => "canonical",
        }
    }

    pub fn record_count(&self) -> usize {
        match self {
            RawSeries::Crypto { prices } => prices.len(),
            RawSeries::Fund { data } => data.len(),
            RawSeries::Equity { rows } => rows.len(),
            RawSeries::Canonical { points } => points.len(),
        }
    }
}

/// Read and decode a payload file.
pub async fn load_payload(path: impl AsRef<Path>) -> Result<RawSeries, AnalyticsError> {
    let path = path.as_ref();
    let body = tokio::fs::read_to_string(path).await?;
    let raw: RawSeries = serde_json::from_str(&body)?;
    debug!("Decoded {} payload from {}", raw.source_name(), path.display());
    Ok(raw)
}

fn lenient_records<'de, D, T>(deserializer: D) -> Result<Vec<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let records = Vec::<Value>::deserialize(deserializer)?;
    Ok(records
        .into_iter()
        .map(|record| serde_json::from_value(record).ok())
        .collect())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_crypto_payload() {
        let json = r#"{"source":"crypto","prices":[[1704067200000,42000.5],[1704153600000,null]]}"#;
        let raw: RawSeries = serde_json::from_str(json).unwrap();

        match raw {
            RawSeries::Crypto { prices } => {
                assert_eq!(prices.len(), 2);
                assert_eq!(prices[0].map(|p| p.1), Some(Some(42000.5)));
                assert_eq!(prices[1].map(|p| p.1), Some(None));
            }
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_equity_payload_with_capitalised_keys() {
        let json = r#"{"source":"equity","rows":[{"Date":"2024-01-02","Open":1.0,"High":2.0,"Low":0.5,"Close":1.5,"Volume":1000}]}"#;
        let raw: RawSeries = serde_json::from_str(json).unwrap();

        assert_eq!(raw.source_name(), "equity");
        match raw {
            RawSeries::Equity { rows } => {
                assert_eq!(rows[0].as_ref().and_then(|r| r.close), Some(1.5))
            }
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_fund_payload() {
        let json = r#"{"source":"fund","data":[{"date":"02-01-2024","nav":"10.5"}]}"#;
        let raw: RawSeries = serde_json::from_str(json).unwrap();
        assert_eq!(raw.record_count(), 1);
    }

    #[test]
    fn test_malformed_records_do_not_fail_the_payload() {
        let fund = r#"{"source":"fund","data":[{"date":"01-01-2024","nav":"10"},{"date":"02-01-2024","nav":null}]}"#;
        let crypto = r#"{"source":"crypto","prices":[[1704067200000,1.0],[1704153600000,"bad"],null]}"#;
        let equity = r#"{"source":"equity","rows":[{"Close":1.0},{"Date":"2024-01-02","Close":2.0}]}"#;

        match serde_json::from_str::<RawSeries>(fund).unwrap() {
            RawSeries::Fund { data } => assert_eq!(data.iter().filter(|r| r.is_none()).count(), 1),
            other => panic!("unexpected variant {:?}", other),
        }
        match serde_json::from_str::<RawSeries>(crypto).unwrap() {
            RawSeries::Crypto { prices } => assert_eq!(prices.iter().filter(|r| r.is_none()).count(), 2),
            other => panic!("unexpected variant {:?}", other),
        }
        match serde_json::from_str::<RawSeries>(equity).unwrap() {
            RawSeries::Equity { rows } => {
                assert!(rows[0].is_none());
                assert!(rows[1].is_some());
            }
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn test_junk_ohlc_columns_keep_the_close() {
        let json = r#"{"source":"equity","rows":[{"Date":"2024-01-02","Open":"N/A","Close":"101.5","Volume":null}]}"#;
        let raw: RawSeries = serde_json::from_str(json).unwrap();

        match raw {
            RawSeries::Equity { rows } => {
                let row = rows[0].as_ref().unwrap();
                assert_eq!(row.open, None);
                assert_eq!(row.close, Some(101.5));
                assert_eq!(row.volume, None);
            }
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn test_payload_must_still_be_a_tagged_object() {
        assert!(serde_json::from_str::<RawSeries>(r#"{"source":"fund","data":{}}"#).is_err());
        assert!(serde_json::from_str::<RawSeries>(r#"{"source":"stocks","rows":[]}"#).is_err());
    }

    #[tokio::test]
    async fn test_load_payload_reports_io_and_json_errors() {
        let dir = std::env::temp_dir().join(format!("rustfolio-analytics-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let missing = load_payload(dir.join("missing.json")).await.unwrap_err();
        assert!(matches!(missing, AnalyticsError::Io(_)));

        let broken = dir.join("broken.json");
        tokio::fs::write(&broken, "{not json").await.unwrap();
        assert!(matches!(load_payload(&broken).await.unwrap_err(), AnalyticsError::Json(_)));

        let good = dir.join("good.json");
        tokio::fs::write(&good, r#"{"source":"canonical","points":[{"date":"2024-01-01","value":1.0}]}"#)
            .await
            .unwrap();
        assert_eq!(load_payload(&good).await.unwrap().record_count(), 1);

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
