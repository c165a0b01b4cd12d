use crate::enums::ReturnKind;
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::ops::Deref;

/// An ordered sequence of `(timestamp, value)` observations.
///
/// Timestamps are strictly increasing and every value is finite. The series is
/// immutable once constructed; every transformation produces a new series.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct TimeSeries {
    points: Vec<(DateTime<Utc>, f64)>,
}

impl TimeSeries {
    /// Validates and wraps the given observations.
    pub fn new(points: Vec<(DateTime<Utc>, f64)>) -> Result<Self, CoreError> {
        for (i, &(timestamp, value)) in points.iter().enumerate() {
            if !value.is_finite() {
                return Err(CoreError::invalid(
                    "value",
                    format!("non-finite value {value} at {timestamp}"),
                ));
            }
            if i > 0 && points[i - 1].0 >= timestamp {
                return Err(CoreError::invalid(
                    "timestamp",
                    format!(
                        "timestamps must be strictly increasing, {timestamp} follows {}",
                        points[i - 1].0
                    ),
                ));
            }
        }
        Ok(Self { points })
    }

    /// Wraps observations already known to satisfy the series invariants.
    pub(crate) fn from_validated(points: Vec<(DateTime<Utc>, f64)>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(DateTime<Utc>, f64)] {
        &self.points
    }

    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.points.iter().map(|(ts, _)| *ts)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, v)| *v)
    }

    pub fn first(&self) -> Option<(DateTime<Utc>, f64)> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<(DateTime<Utc>, f64)> {
        self.points.last().copied()
    }

    /// Looks up the value observed at exactly `timestamp`.
    pub fn get(&self, timestamp: DateTime<Utc>) -> Option<f64> {
        self.points
            .binary_search_by_key(&timestamp, |(ts, _)| *ts)
            .ok()
            .map(|i| self.points[i].1)
    }

    /// Returns the observations with `start <= timestamp <= end`.
    pub fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let lo = self.points.partition_point(|(ts, _)| *ts < start);
        let hi = self.points.partition_point(|(ts, _)| *ts <= end);
        let points = if lo < hi {
            self.points[lo..hi].to_vec()
        } else {
            Vec::new()
        };
        Self { points }
    }

    /// Keeps the last `n` observations.
    pub fn tail(&self, n: usize) -> Self {
        let start = self.points.len().saturating_sub(n);
        Self {
            points: self.points[start..].to_vec(),
        }
    }

    pub fn into_points(self) -> Vec<(DateTime<Utc>, f64)> {
        self.points
    }
}

/// A time series of strictly positive prices.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct PriceSeries(TimeSeries);

impl PriceSeries {
    pub fn new(points: Vec<(DateTime<Utc>, f64)>) -> Result<Self, CoreError> {
        Self::from_series(TimeSeries::new(points)?)
    }

    pub fn from_series(series: TimeSeries) -> Result<Self, CoreError> {
        if let Some((timestamp, price)) = series.points().iter().find(|(_, p)| *p <= 0.0) {
            return Err(CoreError::invalid(
                "price",
                format!("prices must be positive, got {price} at {timestamp}"),
            ));
        }
        Ok(Self(series))
    }

    pub(crate) fn from_validated(series: TimeSeries) -> Self {
        Self(series)
    }

    pub fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self(self.0.between(start, end))
    }

    pub fn series(&self) -> &TimeSeries {
        &self.0
    }
}

impl Deref for PriceSeries {
    type Target = TimeSeries;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A time series of per-period returns, tagged with how they were computed.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ReturnSeries {
    #[serde(rename = "points")]
    series: TimeSeries,
    kind: ReturnKind,
}

/// A return series of an index or reference asset.
pub type BenchmarkSeries = ReturnSeries;

impl ReturnSeries {
    /// Builds a series of simple (fractional change) returns.
    pub fn new(points: Vec<(DateTime<Utc>, f64)>) -> Result<Self, CoreError> {
        Self::with_kind(points, ReturnKind::Simple)
    }

    pub fn with_kind(points: Vec<(DateTime<Utc>, f64)>, kind: ReturnKind) -> Result<Self, CoreError> {
        Ok(Self::from_series(TimeSeries::new(points)?, kind))
    }

    pub fn from_series(series: TimeSeries, kind: ReturnKind) -> Self {
        Self { series, kind }
    }

    pub fn kind(&self) -> ReturnKind {
        self.kind
    }

    pub fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            series: self.series.between(start, end),
            kind: self.kind,
        }
    }

    pub fn tail(&self, n: usize) -> Self {
        Self {
            series: self.series.tail(n),
            kind: self.kind,
        }
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }
}

impl Deref for ReturnSeries {
    type Target = TimeSeries;

    fn deref(&self) -> &Self::Target {
        &self.series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    #[test]
    fn rejects_non_increasing_timestamps() {
        let err = TimeSeries::new(vec![(day(1), 1.0), (day(1), 2.0)]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(field, _) if field == "timestamp"));

        assert!(TimeSeries::new(vec![(day(2), 1.0), (day(1), 2.0)]).is_err());
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(TimeSeries::new(vec![(day(0), f64::NAN)]).is_err());
        assert!(ReturnSeries::new(vec![(day(0), f64::INFINITY)]).is_err());
    }

    #[test]
    fn rejects_non_positive_prices() {
        let err = PriceSeries::new(vec![(day(0), 100.0), (day(1), 0.0)]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(field, _) if field == "price"));
        assert!(PriceSeries::new(vec![(day(0), -3.0)]).is_err());
    }

    #[test]
    fn between_is_inclusive() {
        let series = TimeSeries::new((0..10).map(|i| (day(i), i as f64)).collect()).unwrap();
        let slice = series.between(day(2), day(4));
        assert_eq!(slice.values().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert!(series.between(day(5), day(4)).is_empty());
    }

    #[test]
    fn get_and_tail() {
        let series = ReturnSeries::new((0..5).map(|i| (day(i), i as f64 / 100.0)).collect()).unwrap();
        assert_eq!(series.get(day(3)), Some(0.03));
        assert_eq!(series.get(day(30)), None);

        let tail = series.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail.first().map(|(ts, _)| ts), Some(day(3)));
        assert_eq!(series.tail(50).len(), 5);
    }
}
