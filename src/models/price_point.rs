use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AnalyticsError;

/// A single observation of a price or NAV on a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl TimePoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }

    /// Values must be finite and non-negative to take part in a series.
    pub fn is_valid(&self) -> bool {
        self.value.is_finite() && self.value >= 0.0
    }
}

/// Ascending, de-duplicated series of valid observations.
///
/// Every analytics stage assumes forward-time differencing, so the ordering is
/// checked on construction instead of being repaired downstream. Use
/// `services::normalizer` to build one from unordered provider data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TimePoint>", into = "Vec<TimePoint>")]
pub struct CanonicalSeries {
    points: Vec<TimePoint>,
}

impl CanonicalSeries {
    pub fn new(points: Vec<TimePoint>) -> Result<Self, AnalyticsError> {
        if let Some(bad) = points.iter().find(|p| !p.is_valid()) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "value {} on {} is not a finite non-negative number",
                bad.value, bad.date
            )));
        }

        if let Some(w) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "dates must be strictly increasing, found {} after {}",
                w[1].date, w[0].date
            )));
        }

        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Caller guarantees the invariants (sorted, unique, valid).
    pub(crate) fn from_sorted(points: Vec<TimePoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].date < w[1].date));
        Self { points }
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimePoint> {
        self.points.iter()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn first(&self) -> Option<&TimePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TimePoint> {
        self.points.last()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Value observed on `date`, if any.
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].value)
    }
}

impl TryFrom<Vec<TimePoint>> for CanonicalSeries {
    type Error = AnalyticsError;

    fn try_from(points: Vec<TimePoint>) -> Result<Self, Self::Error> {
        CanonicalSeries::new(points)
    }
}

impl From<CanonicalSeries> for Vec<TimePoint> {
    fn from(series: CanonicalSeries) -> Self {
        series.points
    }
}

impl<'a> IntoIterator for &'a CanonicalSeries {
    type Item = &'a TimePoint;
    type IntoIter = std::slice::Iter<'a, TimePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_new_accepts_ascending_points() {
        let series = CanonicalSeries::new(vec![
            TimePoint::new(d("2024-01-01"), 10.0),
            TimePoint::new(d("2024-01-02"), 11.0),
        ])
        .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.start(), Some(d("2024-01-01")));
        assert_eq!(series.last_value(), Some(11.0));
        assert_eq!(series.value_on(d("2024-01-02")), Some(11.0));
        assert_eq!(series.value_on(d("2024-01-03")), None);
    }

    #[test]
    fn test_new_rejects_duplicate_dates() {
        let result = CanonicalSeries::new(vec![
            TimePoint::new(d("2024-01-01"), 10.0),
            TimePoint::new(d("2024-01-01"), 11.0),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_nan() {
        let result = CanonicalSeries::new(vec![TimePoint::new(d("2024-01-01"), f64::NAN)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_enforces_order() {
        let json = r#"[{"date":"2024-01-02","value":1.0},{"date":"2024-01-01","value":2.0}]"#;
        let parsed: Result<CanonicalSeries, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }
}
