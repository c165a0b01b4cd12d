use crate::alignment::align;
use crate::benchmark::tracking_error;
use crate::drawdown::max_drawdown;
use crate::error::AnalyticsError;
use crate::ratios::{beta, capm, mar_ratio, sharpe_ratio};
use crate::report::{BenchmarkReport, PerformanceReport};
use crate::returns::{cagr, cumulative_return, returns};
use crate::risk::value_at_risk;
use crate::stats;
use crate::volatility::volatility;
use configuration::AnalyticsSettings;
use core_types::{BenchmarkSeries, PriceSeries, ReturnSeries};

/// A stateless calculator that turns return series into performance reports.
///
/// The engine only holds the conventions it applies (annualization factor,
/// risk-free rate, VaR parameters, alignment policy); every call is a pure
/// function of its inputs.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    settings: AnalyticsSettings,
}

impl AnalyticsEngine {
    pub fn new(settings: AnalyticsSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AnalyticsSettings {
        &self.settings
    }

    /// Converts prices into returns of the configured kind.
    pub fn returns(&self, prices: &PriceSeries) -> Result<ReturnSeries, AnalyticsError> {
        returns(prices, self.settings.return_kind)
    }

    /// The main entry point for summarising a return series.
    ///
    /// # Arguments
    ///
    /// * `series` - Per-period returns, simple or logarithmic.
    ///
    /// # Returns
    ///
    /// A `PerformanceReport`, or `InsufficientData` for an empty series.
    /// Metrics that need more data than the series has are left as `None`.
    pub fn calculate(&self, series: &ReturnSeries) -> Result<PerformanceReport, AnalyticsError> {
        let (Some((start, _)), Some((end, _))) = (series.first(), series.last()) else {
            return Err(AnalyticsError::InsufficientData {
                metric: "performance report",
                required: 1,
                actual: 0,
            });
        };

        let values: Vec<f64> = series.values().collect();
        let f = self.settings.annualization_factor;

        let mut report = PerformanceReport {
            periods: series.len(),
            start,
            end,
            return_kind: series.kind(),
            cumulative_return: cumulative_return(series),
            cagr: None,
            annualized_return: stats::mean(&values) * f,
            annualized_volatility: None,
            max_drawdown: max_drawdown(series),
            value_at_risk: None,
            var_confidence: self.settings.var_confidence,
            var_horizon: self.settings.var_horizon,
            var_method: self.settings.var_method,
            sharpe_ratio: None,
            mar_ratio: None,
            best_period: 0.0,
            worst_period: 0.0,
            positive_periods: 0,
            positive_period_ratio: 0.0,
        };

        self.calculate_growth(series, &mut report)?;
        self.calculate_risk(series, &mut report)?;
        self.calculate_ratios(series, &mut report)?;
        Self::calculate_period_stats(&values, &mut report);

        tracing::debug!(
            periods = report.periods,
            cumulative_return = report.cumulative_return,
            "Calculated performance report"
        );

        Ok(report)
    }

    /// Compares `series` with `benchmark` over the periods they share.
    pub fn compare(
        &self,
        series: &ReturnSeries,
        benchmark: &BenchmarkSeries,
    ) -> Result<BenchmarkReport, AnalyticsError> {
        let policy = self.settings.alignment;
        let f = self.settings.annualization_factor;

        let aligned = align(series, benchmark, policy)?;
        let asset_growth = aligned.left.iter().fold(1.0, |w, r| w * series.kind().growth(*r));
        let benchmark_growth = aligned.right.iter().fold(1.0, |w, r| w * benchmark.kind().growth(*r));

        // The configured rate is annual; CAPM works per period.
        let per_period_rf = self.settings.risk_free_rate / f;

        let report = BenchmarkReport {
            aligned_periods: aligned.len(),
            asset_cumulative_return: asset_growth - 1.0,
            benchmark_cumulative_return: benchmark_growth - 1.0,
            excess_return: asset_growth - benchmark_growth,
            beta: defined(beta(series, benchmark, policy))?,
            capm_expected_return: defined(capm(series, benchmark, per_period_rf, policy))?,
            tracking_error: defined(tracking_error(series, benchmark, f, policy))?,
        };

        tracing::debug!(
            aligned_periods = report.aligned_periods,
            excess_return = report.excess_return,
            "Calculated benchmark comparison"
        );

        Ok(report)
    }

    fn calculate_growth(&self, series: &ReturnSeries, report: &mut PerformanceReport) -> Result<(), AnalyticsError> {
        report.cagr = match cagr(series, self.settings.annualization_factor) {
            Ok(value) => Some(value),
            // A series that wipes out all capital has no growth rate.
            Err(AnalyticsError::InvalidInput(field, _)) if field == "cagr" => None,
            Err(e) => return Err(e),
        };
        Ok(())
    }

    fn calculate_risk(&self, series: &ReturnSeries, report: &mut PerformanceReport) -> Result<(), AnalyticsError> {
        let settings = &self.settings;
        report.annualized_volatility = defined(volatility(series, settings.annualization_factor))?;
        report.value_at_risk = defined(value_at_risk(
            series,
            settings.var_confidence,
            settings.var_horizon,
            settings.var_method,
        ))?;
        Ok(())
    }

    fn calculate_ratios(&self, series: &ReturnSeries, report: &mut PerformanceReport) -> Result<(), AnalyticsError> {
        let settings = &self.settings;
        report.sharpe_ratio = defined(sharpe_ratio(
            series,
            settings.risk_free_rate,
            settings.annualization_factor,
        ))?;
        report.mar_ratio = defined(mar_ratio(
            series,
            settings.mar_window_years,
            settings.annualization_factor,
        ))?;
        Ok(())
    }

    fn calculate_period_stats(values: &[f64], report: &mut PerformanceReport) {
        report.best_period = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        report.worst_period = values.iter().copied().fold(f64::INFINITY, f64::min);
        report.positive_periods = values.iter().filter(|r| **r > 0.0).count();
        report.positive_period_ratio = report.positive_periods as f64 / values.len() as f64;
    }
}

/// Turns "undefined for this input" into `None` and keeps real errors.
fn defined(result: Result<f64, AnalyticsError>) -> Result<Option<f64>, AnalyticsError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_undefined_metric() => {
            tracing::debug!(error = %e, "Metric undefined for this series");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
