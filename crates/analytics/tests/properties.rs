//! Integration tests for the analytics crate.
//!
//! Exercises whole workflows (prices to returns to reports) through the
//! public API only.

use analytics::{
    AnalyticsEngine, AnalyticsError, benchmark_relative_return, cumulative_return, max_drawdown,
    sharpe_ratio, to_returns, volatility,
};
use approx::assert_relative_eq;
use chrono::{DateTime, Duration, TimeZone, Utc};
use configuration::AnalyticsSettings;
use core_types::{PriceSeries, ReturnSeries};

fn day(n: usize) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 3, 1, 0, 0, 0).unwrap() + Duration::days(n as i64)
}

fn prices(values: &[f64]) -> PriceSeries {
    PriceSeries::new(values.iter().enumerate().map(|(i, v)| (day(i), *v)).collect()).unwrap()
}

fn simple(values: &[f64]) -> ReturnSeries {
    ReturnSeries::new(values.iter().enumerate().map(|(i, v)| (day(i), *v)).collect()).unwrap()
}

fn sample_prices() -> Vec<Vec<f64>> {
    vec![
        vec![100.0, 101.0],
        vec![50.0, 49.0, 51.5, 51.5, 48.0, 60.0],
        vec![10.0, 10.0, 10.0, 10.0],
        vec![1.0, 2.0, 4.0, 8.0, 16.0],
        vec![300.0, 250.0, 200.0, 150.0, 100.0, 50.0],
        vec![
            100.0, 102.0, 101.5, 99.0, 97.5, 98.25, 103.0, 104.5, 102.0, 105.75, 104.0, 108.0,
        ],
    ]
}

#[test]
fn returns_have_one_point_fewer_than_prices() {
    for values in sample_prices() {
        let returns = to_returns(&prices(&values)).unwrap();
        assert_eq!(returns.len(), values.len() - 1);
    }
}

#[test]
fn zero_returns_accumulate_to_zero() {
    for n in [1, 5, 250] {
        assert_eq!(cumulative_return(&simple(&vec![0.0; n])), 0.0);
    }
}

#[test]
fn constant_returns_have_zero_volatility() {
    for r in [0.0, 0.001, -0.02, 0.05] {
        assert_relative_eq!(volatility(&simple(&[r; 20]), 252.0).unwrap(), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn max_drawdown_is_never_positive() {
    for values in sample_prices() {
        let returns = to_returns(&prices(&values)).unwrap();
        assert!(max_drawdown(&returns) <= 0.0);
    }

    let rising = to_returns(&prices(&[1.0, 2.0, 4.0, 8.0, 16.0])).unwrap();
    assert_eq!(max_drawdown(&rising), 0.0);
}

#[test]
fn worked_example_from_three_prices() {
    let returns = to_returns(&prices(&[100.0, 110.0, 99.0])).unwrap();
    let values: Vec<f64> = returns.values().collect();

    assert_relative_eq!(values[0], 0.10, epsilon = 1e-12);
    assert_relative_eq!(values[1], -0.10, epsilon = 1e-12);
    assert_relative_eq!(cumulative_return(&returns), -0.01, epsilon = 1e-12);
    assert_relative_eq!(max_drawdown(&returns), -0.10, epsilon = 1e-12);
}

#[test]
fn relative_return_of_identical_series_is_zero() {
    for values in sample_prices() {
        let returns = to_returns(&prices(&values)).unwrap();
        let relative = benchmark_relative_return(&returns, &returns.clone()).unwrap();
        assert_eq!(relative.len(), returns.len());
        assert!(relative.values().all(|v| v == 0.0));
    }
}

#[test]
fn sharpe_ratio_undefined_for_flat_prices() {
    let returns = to_returns(&prices(&[10.0, 10.0, 10.0, 10.0])).unwrap();
    assert!(matches!(
        sharpe_ratio(&returns, 0.0, 252.0),
        Err(AnalyticsError::DivisionByZero(_))
    ));
}

#[test]
fn engine_report_matches_free_functions() {
    let settings = AnalyticsSettings {
        annualization_factor: 12.0,
        risk_free_rate: 0.02,
        ..AnalyticsSettings::default()
    };
    let engine = AnalyticsEngine::new(settings);
    let series = engine
        .returns(&prices(&[100.0, 102.0, 101.5, 99.0, 97.5, 98.25, 103.0, 104.5]))
        .unwrap();

    let report = engine.calculate(&series).unwrap();
    assert_eq!(report.periods, series.len());
    assert_relative_eq!(report.cumulative_return, 0.045, epsilon = 1e-12);
    assert_relative_eq!(report.max_drawdown, max_drawdown(&series), epsilon = 1e-15);
    assert_relative_eq!(
        report.sharpe_ratio.unwrap(),
        sharpe_ratio(&series, 0.02, 12.0).unwrap(),
        epsilon = 1e-12
    );
    assert_relative_eq!(
        report.annualized_volatility.unwrap(),
        volatility(&series, 12.0).unwrap(),
        epsilon = 1e-12
    );
}

#[test]
fn report_serializes_to_json() {
    let report = AnalyticsEngine::default()
        .calculate(&simple(&[0.01, -0.02, 0.03]))
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["periods"], 3);
    assert_eq!(json["return_kind"], "simple");
    let back: analytics::PerformanceReport = serde_json::from_value(json).unwrap();
    assert_eq!(back.periods, report.periods);
    assert_eq!(back.start, report.start);
}
