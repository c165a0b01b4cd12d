use chrono::{DateTime, Utc};
use core_types::{ReturnKind, VarMethod};
use serde::{Deserialize, Serialize};

/// Summary statistics of a single return series.
///
/// This struct is the output of [`AnalyticsEngine::calculate`](crate::AnalyticsEngine::calculate).
/// Returns, drawdowns and volatilities are fractions (0.05 is 5%). Metrics
/// that are undefined for the input, such as a Sharpe ratio of a series
/// without dispersion, are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    // I. Coverage
    pub periods: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub return_kind: ReturnKind,

    // II. Return
    pub cumulative_return: f64,
    pub cagr: Option<f64>,
    pub annualized_return: f64,

    // III. Risk
    pub annualized_volatility: Option<f64>,
    pub max_drawdown: f64,
    pub value_at_risk: Option<f64>,
    pub var_confidence: f64,
    pub var_horizon: usize,
    pub var_method: VarMethod,

    // IV. Risk-adjusted
    pub sharpe_ratio: Option<f64>,
    pub mar_ratio: Option<f64>, // None when the window never draws down

    // V. Period statistics
    pub best_period: f64,
    pub worst_period: f64,
    pub positive_periods: usize,
    pub positive_period_ratio: f64,
}

/// Comparison of a return series with a benchmark over their common periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub aligned_periods: usize,
    pub asset_cumulative_return: f64,
    pub benchmark_cumulative_return: f64,
    /// Difference of the two cumulative returns.
    pub excess_return: f64,
    pub beta: Option<f64>,
    /// Per-period CAPM expected return of the asset.
    pub capm_expected_return: Option<f64>,
    pub tracking_error: Option<f64>,
}
