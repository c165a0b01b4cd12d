//! # TuringQuant Analytics
//!
//! This crate turns price and return series into performance and risk
//! metrics. It is the numerical core of the system.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O and no knowledge of where series come from. It
//!   depends only on `core-types` for the validated series and on
//!   `configuration` for the conventions the engine applies.
//! - **Free functions first:** every metric is a plain function over immutable
//!   inputs. The `AnalyticsEngine` bundles them into reports using the
//!   configured annualization factor, risk-free rate and VaR parameters.
//!
//! ## Public API
//!
//! - Return construction: `to_returns`, `to_log_returns`, `returns`,
//!   `cumulative_return`, `cumulative_returns`, `cagr`, `holding_period_return`.
//! - Risk: `volatility`, `max_drawdown`, `drawdown_series`, `value_at_risk`,
//!   rolling and range-based volatility estimators.
//! - Ratios: `sharpe_ratio`, `beta`, `capm`, `mar_ratio`, `calmar_ratio`.
//! - Benchmarks: `benchmark_relative_return`, `tracking_error`,
//!   `cumulative_performance`.
//! - `AnalyticsEngine`, `PerformanceReport`, `BenchmarkReport`, `AnalyticsError`.

pub mod alignment;
pub mod benchmark;
pub mod drawdown;
pub mod engine;
pub mod error;
pub mod ratios;
pub mod report;
pub mod returns;
pub mod risk;
mod stats;
pub mod volatility;

pub use alignment::{AlignedPair, align, align_many};
pub use benchmark::{benchmark_relative_return, benchmark_relative_return_with, cumulative_performance, tracking_error};
pub use drawdown::{drawdown_series, max_drawdown};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use ratios::{beta, calmar_ratio, capm, mar_ratio, rolling_beta, rolling_sharpe, sharpe_ratio};
pub use report::{BenchmarkReport, PerformanceReport};
pub use returns::{cagr, cumulative_return, cumulative_returns, holding_period_return, returns, to_log_returns, to_returns};
pub use risk::value_at_risk;
pub use volatility::{ewma_volatility, garman_klass_volatility, parkinson_volatility, rolling_std, volatility};
