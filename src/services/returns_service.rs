use tracing::debug;

use crate::models::{CanonicalSeries, ReturnPoint, ReturnSeries};

/// Simple day-over-day returns: `(v[i] - v[i-1]) / v[i-1]`, dated at `i`.
///
/// The first observation contributes no return. A zero previous value makes
/// the return undefined, so that point is skipped. Fewer than two points gives
/// an empty series.
pub fn compute_returns(series: &CanonicalSeries) -> ReturnSeries {
    let points = series.points();
    let returns: ReturnSeries = points
        .windows(2)
        .filter_map(|w| {
            let (prev, cur) = (w[0], w[1]);
            if prev.value == 0.0 {
                return None;
            }
            let value = (cur.value - prev.value) / prev.value;
            value.is_finite().then_some(ReturnPoint {
                date: cur.date,
                value,
            })
        })
        .collect();

    let skipped = points.len().saturating_sub(1) - returns.len();
    if skipped > 0 {
        debug!("Skipped {} returns with a zero previous value", skipped);
    }

    returns
}
