use crate::error::{AnalyticsError, check_scale, invalid, require};
use core_types::{PriceSeries, ReturnKind, ReturnSeries, TimeSeries};

/// Simple returns `p[i] / p[i-1] - 1`, labelled with the later timestamp.
pub fn to_returns(prices: &PriceSeries) -> Result<ReturnSeries, AnalyticsError> {
    returns(prices, ReturnKind::Simple)
}

/// Log returns `ln(p[i] / p[i-1])`, labelled with the later timestamp.
pub fn to_log_returns(prices: &PriceSeries) -> Result<ReturnSeries, AnalyticsError> {
    returns(prices, ReturnKind::Log)
}

/// Converts consecutive prices into returns of the requested kind.
///
/// The output has one point fewer than the input.
pub fn returns(prices: &PriceSeries, kind: ReturnKind) -> Result<ReturnSeries, AnalyticsError> {
    require("returns", 2, prices.len())?;

    let points = prices
        .points()
        .windows(2)
        .map(|w| {
            let ratio = w[1].1 / w[0].1;
            let value = match kind {
                ReturnKind::Simple => ratio - 1.0,
                ReturnKind::Log => ratio.ln(),
            };
            (w[1].0, value)
        })
        .collect();

    Ok(ReturnSeries::with_kind(points, kind)?)
}

/// Value of one unit invested at the start, after each period.
pub(crate) fn wealth_curve(series: &ReturnSeries) -> Vec<f64> {
    let kind = series.kind();
    series
        .values()
        .scan(1.0, |wealth, r| {
            *wealth *= kind.growth(r);
            Some(*wealth)
        })
        .collect()
}

/// Total compounded return over the whole series, `prod(1 + r) - 1`.
///
/// An empty series has a cumulative return of zero.
pub fn cumulative_return(series: &ReturnSeries) -> f64 {
    let kind = series.kind();
    series.values().fold(1.0, |wealth, r| wealth * kind.growth(r)) - 1.0
}

/// Running compounded return after each period.
pub fn cumulative_returns(series: &ReturnSeries) -> Result<TimeSeries, AnalyticsError> {
    let points = series
        .timestamps()
        .zip(wealth_curve(series))
        .map(|(ts, wealth)| (ts, wealth - 1.0))
        .collect();
    Ok(TimeSeries::new(points)?)
}

/// Compound annual growth rate, `wealth ^ (periods_per_year / n) - 1`.
pub fn cagr(series: &ReturnSeries, periods_per_year: f64) -> Result<f64, AnalyticsError> {
    check_scale("periods_per_year", periods_per_year)?;
    require("cagr", 1, series.len())?;

    let wealth = cumulative_return(series) + 1.0;
    if wealth <= 0.0 {
        return Err(invalid(
            "cagr",
            format!("the series loses all capital (final wealth {wealth})"),
        ));
    }
    let years = series.len() as f64 / periods_per_year;
    Ok(wealth.powf(1.0 / years) - 1.0)
}

/// Return of holding an asset bought at `start_price`, sold at `end_price` and
/// paying `dividends` per share in between.
pub fn holding_period_return(start_price: f64, end_price: f64, dividends: f64) -> Result<f64, AnalyticsError> {
    if !(start_price.is_finite() && start_price > 0.0) {
        return Err(invalid(
            "start_price",
            format!("must be positive, got {start_price}"),
        ));
    }
    if !(end_price.is_finite() && dividends.is_finite()) {
        return Err(invalid("end_price", "prices and dividends must be finite"));
    }
    Ok((end_price + dividends - start_price) / start_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn prices(values: &[f64]) -> PriceSeries {
        PriceSeries::new(values.iter().enumerate().map(|(i, v)| (day(i as i64), *v)).collect()).unwrap()
    }

    fn simple(values: &[f64]) -> ReturnSeries {
        ReturnSeries::new(values.iter().enumerate().map(|(i, v)| (day(i as i64), *v)).collect()).unwrap()
    }

    #[test]
    fn simple_returns_from_prices() {
        let returns = to_returns(&prices(&[100.0, 110.0, 99.0])).unwrap();
        let values: Vec<f64> = returns.values().collect();

        assert_eq!(returns.len(), 2);
        assert_eq!(returns.kind(), ReturnKind::Simple);
        assert_relative_eq!(values[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(values[1], -0.10, epsilon = 1e-12);
        assert_eq!(returns.first().map(|(ts, _)| ts), Some(day(1)));
    }

    #[test]
    fn log_returns_from_prices() {
        let returns = to_log_returns(&prices(&[100.0, 110.0, 99.0])).unwrap();
        let values: Vec<f64> = returns.values().collect();

        assert_eq!(returns.kind(), ReturnKind::Log);
        assert_relative_eq!(values[0], 1.1f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(values[1], 0.9f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn returns_need_two_prices() {
        let err = to_returns(&prices(&[100.0])).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InsufficientData {
                metric: "returns",
                required: 2,
                actual: 1
            }
        );
        assert!(to_returns(&PriceSeries::default()).is_err());
    }

    #[test]
    fn cumulative_return_compounds() {
        assert_relative_eq!(cumulative_return(&simple(&[0.10, -0.10])), -0.01, epsilon = 1e-12);
        assert_eq!(cumulative_return(&simple(&[])), 0.0);

        let log = to_log_returns(&prices(&[100.0, 110.0, 99.0])).unwrap();
        assert_relative_eq!(cumulative_return(&log), -0.01, epsilon = 1e-12);
    }

    #[test]
    fn cumulative_return_curve() {
        let curve = cumulative_returns(&simple(&[0.10, -0.10, 0.05])).unwrap();
        let values: Vec<f64> = curve.values().collect();
        assert_relative_eq!(values[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(values[1], -0.01, epsilon = 1e-12);
        assert_relative_eq!(values[2], 0.99 * 1.05 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cagr_over_two_years_of_monthly_data() {
        // 24 months of 1% growth
        let series = simple(&[0.01; 24]);
        assert_relative_eq!(cagr(&series, 12.0).unwrap(), 1.01f64.powi(12) - 1.0, epsilon = 1e-12);

        assert!(cagr(&simple(&[]), 12.0).is_err());
        assert!(cagr(&simple(&[-1.0]), 12.0).is_err());
        assert!(cagr(&series, 0.0).is_err());
    }

    #[test]
    fn holding_period_return_includes_dividends() {
        assert_relative_eq!(holding_period_return(100.0, 105.0, 2.0).unwrap(), 0.07, epsilon = 1e-12);
        assert!(holding_period_return(0.0, 105.0, 2.0).is_err());
    }
}
