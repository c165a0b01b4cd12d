use crate::error::{AnalyticsError, check_scale, invalid, require};
use crate::stats;
use core_types::{Bar, BarSeries, ReturnSeries, TimeSeries};
use std::f64::consts::LN_2;

/// Sample standard deviation of the returns scaled by `sqrt(annualization_factor)`.
pub fn volatility(series: &ReturnSeries, annualization_factor: f64) -> Result<f64, AnalyticsError> {
    check_scale("annualization_factor", annualization_factor)?;
    require("volatility", 2, series.len())?;

    let values: Vec<f64> = series.values().collect();
    Ok(stats::sample_std(&values) * annualization_factor.sqrt())
}

/// Sample standard deviation over a trailing window.
///
/// Each point covers the `window` returns ending at (and including) its
/// timestamp; the first `window - 1` timestamps have no value.
pub fn rolling_std(series: &ReturnSeries, window: usize) -> Result<TimeSeries, AnalyticsError> {
    if window < 2 {
        return Err(invalid("window", "a rolling standard deviation needs a window of at least 2"));
    }
    require("rolling_std", window, series.len())?;

    let points = series
        .points()
        .windows(window)
        .map(|w| {
            let values: Vec<f64> = w.iter().map(|(_, v)| *v).collect();
            (w[window - 1].0, stats::sample_std(&values))
        })
        .collect();

    Ok(TimeSeries::new(points)?)
}

/// Exponentially weighted standard deviation with `alpha = 2 / (span + 1)`.
///
/// Weights decay geometrically into the past and are normalised, and the
/// variance carries the usual bias correction for weighted samples. The first
/// observation has no dispersion and is omitted.
pub fn ewma_volatility(series: &ReturnSeries, span: usize) -> Result<TimeSeries, AnalyticsError> {
    if span < 2 {
        return Err(invalid("span", "an EWMA span must be at least 2"));
    }
    require("ewma_volatility", 2, series.len())?;

    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;

    let (mut sum_w, mut sum_w2, mut sum_wx, mut sum_wx2) = (0.0, 0.0, 0.0, 0.0);
    let mut points = Vec::with_capacity(series.len() - 1);

    for (i, &(ts, x)) in series.points().iter().enumerate() {
        sum_w = sum_w * decay + 1.0;
        sum_w2 = sum_w2 * decay * decay + 1.0;
        sum_wx = sum_wx * decay + x;
        sum_wx2 = sum_wx2 * decay + x * x;

        if i == 0 {
            continue;
        }

        let mean = sum_wx / sum_w;
        let biased = (sum_wx2 / sum_w - mean * mean).max(0.0);
        let correction = sum_w * sum_w / (sum_w * sum_w - sum_w2);
        points.push((ts, (biased * correction).sqrt()));
    }

    Ok(TimeSeries::new(points)?)
}

/// Garman-Klass range-based volatility over a trailing window of bars.
///
/// `time_scale` scales the per-bar estimate, e.g. 252 to annualize daily bars.
/// The value at a bar's timestamp uses that bar and the `window - 1` bars
/// before it, not only the bars preceding it.
pub fn garman_klass_volatility(bars: &BarSeries, window: usize, time_scale: f64) -> Result<TimeSeries, AnalyticsError> {
    let coefficient = 2.0 * LN_2 - 1.0;
    range_estimator(bars, window, time_scale / window as f64, "garman_klass_volatility", |bar| {
        let high_low = (bar.high / bar.low).ln();
        let close_open = (bar.close / bar.open).ln();
        0.5 * high_low * high_low - coefficient * close_open * close_open
    })
}

/// Parkinson high-low volatility over a trailing window of bars.
///
/// Like [`garman_klass_volatility`], the window ends at and includes the
/// labelled bar.
pub fn parkinson_volatility(bars: &BarSeries, window: usize, time_scale: f64) -> Result<TimeSeries, AnalyticsError> {
    let scale = time_scale / (4.0 * window as f64 * LN_2);
    range_estimator(bars, window, scale, "parkinson_volatility", |bar| {
        let high_low = (bar.high / bar.low).ln();
        high_low * high_low
    })
}

fn range_estimator<F>(
    bars: &BarSeries,
    window: usize,
    scale: f64,
    metric: &'static str,
    term: F,
) -> Result<TimeSeries, AnalyticsError>
where
    F: Fn(&Bar) -> f64,
{
    if window == 0 {
        return Err(invalid("window", "must be at least 1"));
    }
    check_scale("time_scale", scale)?;
    require(metric, window, bars.len())?;

    let terms: Vec<f64> = bars.bars().iter().map(&term).collect();
    let points = bars
        .bars()
        .windows(window)
        .zip(terms.windows(window))
        .map(|(bw, tw)| {
            // Negative sums only arise from bars whose open/close lie outside their range.
            let sum = tw.iter().sum::<f64>().max(0.0);
            (bw[window - 1].timestamp, (scale * sum).sqrt())
        })
        .collect();

    Ok(TimeSeries::new(points)?)
}
