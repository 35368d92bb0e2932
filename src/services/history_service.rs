use crate::models::{CanonicalSeries, HistoryRow};

pub const SHORT_MA_WINDOW: usize = 20;
pub const LONG_MA_WINDOW: usize = 50;

/// Chart rows for a series: the value, its simple return against the previous
/// point, and trailing 20/50-point moving averages once enough points exist.
pub fn build_history(series: &CanonicalSeries) -> Vec<HistoryRow> {
    let values = series.values();
    let ma20 = moving_average(&values, SHORT_MA_WINDOW);
    let ma50 = moving_average(&values, LONG_MA_WINDOW);

    series
        .iter()
        .zip(ma20)
        .zip(ma50)
        .enumerate()
        .map(|(i, ((point, ma20), ma50))| HistoryRow {
            date: point.date,
            value: point.value,
            daily_return: i
                .checked_sub(1)
                .map(|prev| values[prev])
                .filter(|prev| *prev != 0.0)
                .map(|prev| (point.value - prev) / prev),
            ma20,
            ma50,
        })
        .collect()
}

/// Trailing simple moving average aligned with `values`; `None` until the
/// window is full.
fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 || window > values.len() {
        return vec![None; values.len()];
    }

    let mut averages = vec![None; window - 1];
    averages.extend(
        values
            .windows(window)
            .map(|w| Some(w.iter().sum::<f64>() / window as f64)),
    );
    averages
}
