use crate::alignment::align;
use crate::error::{AnalyticsError, check_scale, invalid, require};
use crate::stats;
use core_types::{AlignmentPolicy, BenchmarkSeries, PriceSeries, ReturnSeries, TimeSeries};

/// Per-period excess of `series` over `benchmark` on their common timestamps.
///
/// Uses [`AlignmentPolicy::Intersect`]; see [`benchmark_relative_return_with`].
pub fn benchmark_relative_return(
    series: &ReturnSeries,
    benchmark: &BenchmarkSeries,
) -> Result<ReturnSeries, AnalyticsError> {
    benchmark_relative_return_with(series, benchmark, AlignmentPolicy::Intersect)
}

/// Per-period excess `series - benchmark` after aligning under `policy`.
///
/// Both series must carry the same [`ReturnKind`](core_types::ReturnKind);
/// the result keeps that kind.
pub fn benchmark_relative_return_with(
    series: &ReturnSeries,
    benchmark: &BenchmarkSeries,
    policy: AlignmentPolicy,
) -> Result<ReturnSeries, AnalyticsError> {
    if series.kind() != benchmark.kind() {
        return Err(invalid(
            "benchmark",
            format!(
                "cannot compare {:?} returns against {:?} returns",
                series.kind(),
                benchmark.kind()
            ),
        ));
    }

    let aligned = align(series, benchmark, policy)?;
    let points = aligned
        .timestamps
        .into_iter()
        .zip(aligned.left.iter().zip(&aligned.right))
        .map(|(ts, (a, b))| (ts, a - b))
        .collect();

    Ok(ReturnSeries::with_kind(points, series.kind())?)
}

/// Annualized standard deviation of the benchmark-relative returns.
pub fn tracking_error(
    series: &ReturnSeries,
    benchmark: &BenchmarkSeries,
    annualization_factor: f64,
    policy: AlignmentPolicy,
) -> Result<f64, AnalyticsError> {
    check_scale("annualization_factor", annualization_factor)?;
    let relative = benchmark_relative_return_with(series, benchmark, policy)?;
    require("tracking_error", 2, relative.len())?;

    let values: Vec<f64> = relative.values().collect();
    Ok(stats::sample_std(&values) * annualization_factor.sqrt())
}

/// Growth of an investment in the priced asset relative to its first price,
/// `p[i] / p[0] - 1`. The first point is always zero.
pub fn cumulative_performance(prices: &PriceSeries) -> Result<TimeSeries, AnalyticsError> {
    let Some((_, base)) = prices.first() else {
        return Err(AnalyticsError::InsufficientData {
            metric: "cumulative_performance",
            required: 1,
            actual: 0,
        });
    };

    let points = prices
        .points()
        .iter()
        .map(|&(ts, price)| (ts, price / base - 1.0))
        .collect();
    Ok(TimeSeries::new(points)?)
}
