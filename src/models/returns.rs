use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Simple fractional return realised on `date` relative to the previous observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    #[serde(rename = "return")]
    pub value: f64,
}

/// Day-over-day returns derived from a `CanonicalSeries`, in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnSeries {
    points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    pub fn new(points: Vec<ReturnPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReturnPoint> {
        self.points.iter()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

impl FromIterator<ReturnPoint> for ReturnSeries {
    fn from_iter<I: IntoIterator<Item = ReturnPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ReturnSeries {
    type Item = &'a ReturnPoint;
    type IntoIter = std::slice::Iter<'a, ReturnPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
