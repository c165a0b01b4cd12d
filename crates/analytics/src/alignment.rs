use crate::error::AnalyticsError;
use chrono::{DateTime, Utc};
use core_types::{AlignmentPolicy, TimeSeries};
use std::cmp::Ordering;

/// Two series reduced to a shared timestamp domain.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    pub timestamps: Vec<DateTime<Utc>>,
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

impl AlignedPair {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Aligns two series on their timestamps.
///
/// Under [`AlignmentPolicy::Intersect`] only the common timestamps are kept.
/// Under [`AlignmentPolicy::Strict`] the timestamps must match exactly. Either
/// way an empty overlap is an [`AnalyticsError::Alignment`].
pub fn align(left: &TimeSeries, right: &TimeSeries, policy: AlignmentPolicy) -> Result<AlignedPair, AnalyticsError> {
    if policy == AlignmentPolicy::Strict && !left.timestamps().eq(right.timestamps()) {
        return Err(AnalyticsError::Alignment(format!(
            "strict alignment requires identical timestamps ({} vs {} points)",
            left.len(),
            right.len()
        )));
    }

    let (a, b) = (left.points(), right.points());
    let mut aligned = AlignedPair {
        timestamps: Vec::with_capacity(a.len().min(b.len())),
        left: Vec::with_capacity(a.len().min(b.len())),
        right: Vec::with_capacity(a.len().min(b.len())),
    };

    // Both inputs are strictly increasing, so a single merge pass finds the overlap.
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                aligned.timestamps.push(a[i].0);
                aligned.left.push(a[i].1);
                aligned.right.push(b[j].1);
                i += 1;
                j += 1;
            }
        }
    }

    if aligned.is_empty() {
        return Err(AnalyticsError::Alignment(
            "no overlapping timestamps between the series".to_string(),
        ));
    }

    tracing::debug!(
        left = left.len(),
        right = right.len(),
        common = aligned.len(),
        "Aligned series pair"
    );

    Ok(aligned)
}

/// Aligns any number of series on the timestamps they all share.
///
/// Returns the common timestamps and, for every input in order, its values at
/// those timestamps.
pub fn align_many(
    series: &[&TimeSeries],
    policy: AlignmentPolicy,
) -> Result<(Vec<DateTime<Utc>>, Vec<Vec<f64>>), AnalyticsError> {
    let Some((first, rest)) = series.split_first() else {
        return Err(AnalyticsError::InsufficientData {
            metric: "alignment",
            required: 1,
            actual: 0,
        });
    };

    if policy == AlignmentPolicy::Strict
        && rest.iter().any(|s| !s.timestamps().eq(first.timestamps()))
    {
        return Err(AnalyticsError::Alignment(
            "strict alignment requires identical timestamps across all series".to_string(),
        ));
    }

    let common: Vec<DateTime<Utc>> = first
        .timestamps()
        .filter(|ts| rest.iter().all(|s| s.get(*ts).is_some()))
        .collect();

    if common.is_empty() {
        return Err(AnalyticsError::Alignment(
            "no timestamp is shared by all series".to_string(),
        ));
    }

    let columns = series
        .iter()
        .map(|s| common.iter().filter_map(|ts| s.get(*ts)).collect())
        .collect();

    Ok((common, columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn series(days: &[i64], values: &[f64]) -> TimeSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        TimeSeries::new(
            days.iter()
                .zip(values)
                .map(|(d, v)| (start + Duration::days(*d), *v))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn intersect_keeps_common_timestamps() {
        let a = series(&[0, 1, 2, 4], &[1.0, 2.0, 3.0, 4.0]);
        let b = series(&[1, 2, 3, 4, 5], &[10.0, 20.0, 30.0, 40.0, 50.0]);

        let aligned = align(&a, &b, AlignmentPolicy::Intersect).unwrap();
        assert_eq!(aligned.len(), 3);
        assert_eq!(aligned.left, vec![2.0, 3.0, 4.0]);
        assert_eq!(aligned.right, vec![10.0, 20.0, 40.0]);
    }

    #[test]
    fn strict_rejects_mismatch() {
        let a = series(&[0, 1, 2], &[1.0, 2.0, 3.0]);
        let b = series(&[0, 1, 3], &[1.0, 2.0, 3.0]);
        assert!(matches!(
            align(&a, &b, AlignmentPolicy::Strict),
            Err(AnalyticsError::Alignment(_))
        ));
        assert!(align(&a, &a, AlignmentPolicy::Strict).is_ok());
    }

    #[test]
    fn disjoint_series_cannot_be_aligned() {
        let a = series(&[0, 1], &[1.0, 2.0]);
        let b = series(&[5, 6], &[1.0, 2.0]);
        assert!(matches!(
            align(&a, &b, AlignmentPolicy::Intersect),
            Err(AnalyticsError::Alignment(_))
        ));
    }

    #[test]
    fn align_many_intersects_all() {
        let a = series(&[0, 1, 2, 3], &[1.0, 2.0, 3.0, 4.0]);
        let b = series(&[1, 2, 3], &[5.0, 6.0, 7.0]);
        let c = series(&[0, 2, 3], &[8.0, 9.0, 10.0]);

        let (timestamps, columns) = align_many(&[&a, &b, &c], AlignmentPolicy::Intersect).unwrap();
        assert_eq!(timestamps.len(), 2);
        assert_eq!(columns, vec![vec![3.0, 4.0], vec![6.0, 7.0], vec![9.0, 10.0]]);

        assert!(align_many(&[], AlignmentPolicy::Intersect).is_err());
    }
}
