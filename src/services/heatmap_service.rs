use std::collections::BTreeMap;

use chrono::Datelike;

use crate::models::{CanonicalSeries, HeatmapBucket, MonthlyPerformance, ReturnSeries};

/// Mean return per calendar month (1-12), pooling every year in the series.
///
/// Months without any return are omitted rather than reported as zero.
pub fn aggregate_by_month(returns: &ReturnSeries) -> Vec<HeatmapBucket> {
    let mut buckets: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for point in returns {
        let entry = buckets.entry(point.date.month()).or_insert((0.0, 0));
        entry.0 += point.value;
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(month, (sum, count))| HeatmapBucket {
            month,
            aggregate_return: sum / count as f64,
        })
        .collect()
}

/// Percent change between the first and last value observed within each
/// (year, month), alongside the month's last value.
///
/// A month whose first value is zero has no defined change and is skipped.
pub fn monthly_performance(series: &CanonicalSeries) -> Vec<MonthlyPerformance> {
    let mut months: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();
    for point in series {
        months
            .entry((point.date.year(), point.date.month()))
            .and_modify(|(_, last)| *last = point.value)
            .or_insert((point.value, point.value));
    }

    months
        .into_iter()
        .filter(|(_, (first, _))| *first != 0.0)
        .map(|((year, month), (first, last))| MonthlyPerformance {
            year,
            month,
            value: (last - first) / first * 100.0,
            nav: last,
        })
        .collect()
}
