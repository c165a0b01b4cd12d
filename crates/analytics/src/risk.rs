use crate::error::{AnalyticsError, invalid, require};
use crate::stats;
use core_types::{ReturnSeries, VarMethod};

/// Value at risk: the per-period return that is undershot with probability
/// `1 - confidence`, scaled to `horizon` periods by `sqrt(horizon)`.
///
/// The result is expressed as a return, so losses are negative. With
/// [`VarMethod::VarianceCovariance`] returns are assumed normal with the
/// sample mean and standard deviation; [`VarMethod::Historical`] reads the
/// empirical quantile of the observed returns.
pub fn value_at_risk(
    series: &ReturnSeries,
    confidence: f64,
    horizon: usize,
    method: VarMethod,
) -> Result<f64, AnalyticsError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(invalid(
            "confidence",
            format!("must lie strictly between 0 and 1, got {confidence}"),
        ));
    }
    if horizon == 0 {
        return Err(invalid("horizon", "must be at least one period"));
    }
    require("value_at_risk", 2, series.len())?;

    let mut values: Vec<f64> = series.values().collect();
    let one_period = match method {
        VarMethod::VarianceCovariance => {
            let z = stats::inverse_normal_cdf(1.0 - confidence);
            stats::mean(&values) + stats::sample_std(&values) * z
        }
        VarMethod::Historical => {
            values.sort_by(f64::total_cmp);
            stats::quantile(&values, 1.0 - confidence)
        }
    };

    Ok(one_period * (horizon as f64).sqrt())
}
