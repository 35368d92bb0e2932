use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, warn};

use crate::external::payload::{CryptoPrice, NavRecord, OhlcvRow, RawSeries};
use crate::models::{CanonicalSeries, TimePoint};

const FUND_DATE_FORMAT: &str = "%d-%m-%Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// A canonical series plus diagnostics about what normalization discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub series: CanonicalSeries,
    /// Records whose date or value could not be parsed, or whose value was
    /// non-finite or negative
    pub dropped: usize,
    /// Valid records merged into a later observation on the same calendar date
    pub collapsed: usize,
}

#[derive(Debug, Clone, Copy)]
struct Observation {
    at: NaiveDateTime,
    value: f64,
}

/// Convert a provider payload into an ascending, de-duplicated series.
///
/// Invalid records are dropped, never zero-filled. Intraday observations are
/// reduced to the last one of each calendar date. Zero valid records yields an
/// empty series, which downstream stages treat as "no data".
pub fn normalize(raw: &RawSeries) -> NormalizedSeries {
    let source = raw.source_name();
    let candidates: Vec<Option<Observation>> = match raw {
        RawSeries::Crypto { prices } => prices.iter().map(|r| r.as_ref().and_then(parse_crypto)).collect(),
        RawSeries::Fund { data } => data.iter().map(|r| r.as_ref().and_then(parse_nav)).collect(),
        RawSeries::Equity { rows } => rows.iter().map(|r| r.as_ref().and_then(parse_ohlcv)).collect(),
        RawSeries::Canonical { points } => points
            .iter()
            .map(|p| {
                p.as_ref().map(|p| Observation {
                    at: p.date.and_time(NaiveTime::MIN),
                    value: p.value,
                })
            })
            .collect(),
    };

    let total = candidates.len();
    let mut observations: Vec<Observation> = candidates
        .into_iter()
        .flatten()
        .filter(|o| o.value.is_finite() && o.value >= 0.0)
        .collect();
    let dropped = total - observations.len();

    // Stable, so same-instant records keep their payload order.
    observations.sort_by_key(|o| o.at);

    let valid = observations.len();
    let mut points: Vec<TimePoint> = Vec::with_capacity(valid);
    for obs in observations {
        let point = TimePoint::new(obs.at.date(), obs.value);
        match points.last_mut() {
            Some(last) if last.date == point.date => *last = point,
            _ => points.push(point),
        }
    }
    let collapsed = valid - points.len();

    if dropped > 0 {
        warn!(
            "Dropped {} of {} {} records during normalization",
            dropped, total, source
        );
    }
    if points.is_empty() {
        warn!("No valid {} records out of {} after normalization", source, total);
    }
    debug!(
        "Normalized {} series: {} points ({} same-day records collapsed)",
        source,
        points.len(),
        collapsed
    );

    NormalizedSeries {
        series: CanonicalSeries::from_sorted(points),
        dropped,
        collapsed,
    }
}

fn parse_crypto(record: &CryptoPrice) -> Option<Observation> {
    let CryptoPrice(epoch_ms, price) = *record;
    if !epoch_ms.is_finite() {
        return None;
    }
    let at = DateTime::from_timestamp_millis(epoch_ms as i64)?.naive_utc();
    Some(Observation { at, value: price? })
}

fn parse_nav(record: &NavRecord) -> Option<Observation> {
    let date = NaiveDate::parse_from_str(record.date.trim(), FUND_DATE_FORMAT).ok()?;
    let value = record.nav.trim().parse::<f64>().ok()?;
    Some(Observation {
        at: date.and_time(NaiveTime::MIN),
        value,
    })
}

fn parse_ohlcv(row: &OhlcvRow) -> Option<Observation> {
    let at = parse_equity_date(&row.date)?;
    Some(Observation {
        at,
        value: row.close?,
    })
}

/// Accepts a plain ISO date, an RFC 3339 timestamp (the exchange-local
/// calendar date is kept), or `YYYY-MM-DD HH:MM:SS`.
fn parse_equity_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT) {
        return Some(date.and_time(NaiveTime::MIN));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok()
}
