use crate::alignment::align;
use crate::drawdown::max_drawdown;
use crate::error::{AnalyticsError, check_scale, invalid, require};
use crate::stats::{self, ZERO_TOLERANCE};
use core_types::{AlignmentPolicy, ReturnSeries, TimeSeries};

/// Annualized Sharpe ratio, `(mean * f - risk_free) / (std * sqrt(f))`.
///
/// `risk_free` is an annual rate, `f` the number of periods per year. The
/// standard deviation is the sample (n - 1) estimate.
pub fn sharpe_ratio(series: &ReturnSeries, risk_free: f64, annualization_factor: f64) -> Result<f64, AnalyticsError> {
    check_scale("annualization_factor", annualization_factor)?;
    require("sharpe_ratio", 2, series.len())?;

    let values: Vec<f64> = series.values().collect();
    sharpe_of(&values, risk_free, annualization_factor)
}

fn sharpe_of(values: &[f64], risk_free: f64, annualization_factor: f64) -> Result<f64, AnalyticsError> {
    let std = stats::sample_std(values);
    if std < ZERO_TOLERANCE {
        return Err(AnalyticsError::DivisionByZero("sharpe_ratio".to_string()));
    }
    let mean = stats::mean(values);
    Ok((mean * annualization_factor - risk_free) / (std * annualization_factor.sqrt()))
}

/// Sensitivity of the asset's returns to the benchmark's,
/// `cov(asset, benchmark) / var(benchmark)` over the aligned periods.
pub fn beta(series: &ReturnSeries, benchmark: &ReturnSeries, policy: AlignmentPolicy) -> Result<f64, AnalyticsError> {
    let aligned = align(series, benchmark, policy)?;
    require("beta", 2, aligned.len())?;
    beta_of(&aligned.left, &aligned.right)
}

fn beta_of(asset: &[f64], benchmark: &[f64]) -> Result<f64, AnalyticsError> {
    let variance = stats::sample_variance(benchmark);
    if variance < ZERO_TOLERANCE * ZERO_TOLERANCE {
        return Err(AnalyticsError::DivisionByZero("beta".to_string()));
    }
    Ok(stats::sample_covariance(asset, benchmark) / variance)
}

/// Expected per-period return under the CAPM,
/// `risk_free + beta * (mean(market) - risk_free)`.
///
/// `risk_free` is a per-period rate, like the returns themselves.
pub fn capm(series: &ReturnSeries, market: &ReturnSeries, risk_free: f64, policy: AlignmentPolicy) -> Result<f64, AnalyticsError> {
    let aligned = align(series, market, policy)?;
    require("capm", 2, aligned.len())?;

    let beta = beta_of(&aligned.left, &aligned.right)?;
    let expected_market = stats::mean(&aligned.right);
    Ok(risk_free + beta * (expected_market - risk_free))
}

/// MAR ratio: annualized mean return over the absolute maximum drawdown,
/// both measured on the trailing `window_years` of returns.
///
/// If the series is shorter than the window the whole series is used.
pub fn mar_ratio(series: &ReturnSeries, window_years: f64, annualization_factor: f64) -> Result<f64, AnalyticsError> {
    check_scale("annualization_factor", annualization_factor)?;
    check_scale("window_years", window_years)?;
    require("mar_ratio", 1, series.len())?;

    let periods = ((window_years * annualization_factor).round() as usize).max(1);
    let window = series.tail(periods);

    let drawdown = max_drawdown(&window).abs();
    if drawdown < ZERO_TOLERANCE {
        return Err(AnalyticsError::DivisionByZero("mar_ratio".to_string()));
    }
    let values: Vec<f64> = window.values().collect();
    Ok(stats::mean(&values) * annualization_factor / drawdown)
}

/// Calmar ratio, the MAR ratio over the trailing three years.
pub fn calmar_ratio(series: &ReturnSeries, annualization_factor: f64) -> Result<f64, AnalyticsError> {
    mar_ratio(series, 3.0, annualization_factor)
}

/// Sharpe ratio over a trailing window of `window` returns.
///
/// Each value is labelled with the last period of its window and includes
/// that period's return; it is not a forecast from the preceding `window`
/// returns. Windows without dispersion have no Sharpe ratio and are left out.
pub fn rolling_sharpe(
    series: &ReturnSeries,
    window: usize,
    risk_free: f64,
    annualization_factor: f64,
) -> Result<TimeSeries, AnalyticsError> {
    check_scale("annualization_factor", annualization_factor)?;
    if window < 2 {
        return Err(invalid("window", "a rolling Sharpe ratio needs a window of at least 2"));
    }
    require("rolling_sharpe", window, series.len())?;

    let mut points = Vec::with_capacity(series.len() - window + 1);
    for w in series.points().windows(window) {
        let values: Vec<f64> = w.iter().map(|(_, v)| *v).collect();
        match sharpe_of(&values, risk_free, annualization_factor) {
            Ok(sharpe) => points.push((w[window - 1].0, sharpe)),
            Err(AnalyticsError::DivisionByZero(_)) => {
                tracing::debug!(at = %w[window - 1].0, "Skipping flat window in rolling Sharpe");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(TimeSeries::new(points)?)
}

/// Beta over a trailing window of `window` aligned periods.
///
/// Each value is labelled with the last aligned period of its window and
/// includes that period. Windows where the benchmark does not move are left
/// out.
pub fn rolling_beta(
    series: &ReturnSeries,
    benchmark: &ReturnSeries,
    window: usize,
    policy: AlignmentPolicy,
) -> Result<TimeSeries, AnalyticsError> {
    if window < 2 {
        return Err(invalid("window", "a rolling beta needs a window of at least 2"));
    }
    let aligned = align(series, benchmark, policy)?;
    require("rolling_beta", window, aligned.len())?;

    let mut points = Vec::with_capacity(aligned.len() - window + 1);
    for end in window..=aligned.len() {
        let range = end - window..end;
        match beta_of(&aligned.left[range.clone()], &aligned.right[range]) {
            Ok(beta) => points.push((aligned.timestamps[end - 1], beta)),
            Err(AnalyticsError::DivisionByZero(_)) => {
                tracing::debug!(at = %aligned.timestamps[end - 1], "Skipping flat benchmark window in rolling beta");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(TimeSeries::new(points)?)
}
