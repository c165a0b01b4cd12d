use crate::error::AnalyticsError;
use core_types::{ReturnSeries, TimeSeries};

/// Decline of the wealth curve from its running peak after each period.
///
/// The wealth curve starts at 1.0 before the first return, so a loss in the
/// very first period already counts as a drawdown. Values are fractions in
/// `[-1, 0]` for simple returns above -100%.
pub fn drawdown_series(series: &ReturnSeries) -> Result<TimeSeries, AnalyticsError> {
    let kind = series.kind();
    let mut wealth = 1.0_f64;
    let mut peak = 1.0_f64;

    let points = series
        .points()
        .iter()
        .map(|&(ts, r)| {
            wealth *= kind.growth(r);
            peak = peak.max(wealth);
            (ts, wealth / peak - 1.0)
        })
        .collect();

    Ok(TimeSeries::new(points)?)
}

/// Largest peak-to-trough decline of the wealth curve.
///
/// Always non-positive; zero for an empty series or a curve that never falls.
pub fn max_drawdown(series: &ReturnSeries) -> f64 {
    let kind = series.kind();
    let mut wealth = 1.0_f64;
    let mut peak = 1.0_f64;
    let mut max_drawdown = 0.0_f64;

    for r in series.values() {
        wealth *= kind.growth(r);
        if wealth > peak {
            peak = wealth;
        }
        let drawdown = wealth / peak - 1.0;
        if drawdown < max_drawdown {
            max_drawdown = drawdown;
        }
    }

    max_drawdown
}
