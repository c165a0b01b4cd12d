use crate::error::OptimizerError;
use analytics::{AnalyticsError, align_many};
use core_types::{AlignmentPolicy, ReturnKind, ReturnSeries, TimeSeries};
use ndarray::{Array1, Array2, Axis};

/// A set of assets whose simple returns share the same periods.
///
/// Rows of the return matrix are periods, columns are assets in the order
/// they were given.
#[derive(Debug, Clone)]
pub struct AssetUniverse {
    names: Vec<String>,
    returns: Array2<f64>,
}

impl AssetUniverse {
    /// Aligns the assets on the timestamps they all share.
    pub fn new(assets: Vec<(String, ReturnSeries)>) -> Result<Self, OptimizerError> {
        if let Some((name, _)) = assets.iter().find(|(_, s)| s.kind() != ReturnKind::Simple) {
            return Err(OptimizerError::InvalidInput(
                name.clone(),
                "portfolio returns are built from simple returns".to_string(),
            ));
        }

        let series: Vec<&TimeSeries> = assets.iter().map(|(_, s)| s.series()).collect();
        let (timestamps, columns) = align_many(&series, AlignmentPolicy::Intersect)?;
        if timestamps.len() < 2 {
            return Err(AnalyticsError::InsufficientData {
                metric: "covariance matrix",
                required: 2,
                actual: timestamps.len(),
            }
            .into());
        }

        let periods = timestamps.len();
        let returns = Array2::from_shape_fn((periods, columns.len()), |(i, j)| columns[j][i]);
        let names = assets.into_iter().map(|(name, _)| name).collect();

        tracing::debug!(assets = columns.len(), periods, "Built asset universe");
        Ok(Self { names, returns })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn num_assets(&self) -> usize {
        self.returns.ncols()
    }

    pub fn periods(&self) -> usize {
        self.returns.nrows()
    }

    /// Per-period mean return of every asset.
    pub fn mean_returns(&self) -> Array1<f64> {
        let periods = self.periods() as f64;
        self.returns.sum_axis(Axis(0)) / periods
    }

    /// Sample (n - 1) covariance matrix of the per-period returns.
    pub fn covariance(&self) -> Array2<f64> {
        let centered = &self.returns - &self.mean_returns();
        centered.t().dot(&centered) / (self.periods() - 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn series(days: &[i64], values: &[f64]) -> ReturnSeries {
        ReturnSeries::new(days.iter().zip(values).map(|(d, v)| (day(*d), *v)).collect()).unwrap()
    }

    #[test]
    fn aligns_assets_and_computes_moments() {
        let universe = AssetUniverse::new(vec![
            ("A".to_string(), series(&[0, 1, 2, 3], &[9.0, 0.01, 0.03, 0.02])),
            ("B".to_string(), series(&[1, 2, 3], &[0.02, -0.02, 0.0])),
        ])
        .unwrap();

        assert_eq!(universe.names(), &["A".to_string(), "B".to_string()]);
        assert_eq!(universe.num_assets(), 2);
        assert_eq!(universe.periods(), 3);

        let mean = universe.mean_returns();
        assert_relative_eq!(mean[0], 0.02, epsilon = 1e-12);
        assert_relative_eq!(mean[1], 0.0, epsilon = 1e-12);

        let cov = universe.covariance();
        assert_relative_eq!(cov[[0, 0]], 0.0001, epsilon = 1e-12);
        assert_relative_eq!(cov[[1, 1]], 0.0004, epsilon = 1e-12);
        assert_relative_eq!(cov[[0, 1]], -0.0002, epsilon = 1e-12);
        assert_relative_eq!(cov[[0, 1]], cov[[1, 0]], epsilon = 1e-15);
    }

    #[test]
    fn rejects_unusable_universes() {
        assert!(AssetUniverse::new(vec![]).is_err());

        let disjoint = AssetUniverse::new(vec![
            ("A".to_string(), series(&[0, 1], &[0.01, 0.02])),
            ("B".to_string(), series(&[2, 3], &[0.01, 0.02])),
        ]);
        assert!(matches!(
            disjoint,
            Err(OptimizerError::Analytics(AnalyticsError::Alignment(_)))
        ));

        let short = AssetUniverse::new(vec![
            ("A".to_string(), series(&[0, 1], &[0.01, 0.02])),
            ("B".to_string(), series(&[1, 2], &[0.01, 0.02])),
        ]);
        assert!(matches!(
            short,
            Err(OptimizerError::Analytics(AnalyticsError::InsufficientData { .. }))
        ));

        let log = ReturnSeries::from_series(series(&[0, 1], &[0.01, 0.02]).series().clone(), ReturnKind::Log);
        assert!(matches!(
            AssetUniverse::new(vec![("A".to_string(), log)]),
            Err(OptimizerError::InvalidInput(..))
        ));
    }
}
