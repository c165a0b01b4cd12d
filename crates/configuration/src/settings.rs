use crate::error::ConfigError;
use core_types::{AlignmentPolicy, ReturnKind, SelectionMethod, VarMethod};
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; missing sections and fields fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analytics: AnalyticsSettings,
    pub optimizer: OptimizerSettings,
    pub logging: LoggingSettings,
}

/// Conventions used when turning a return series into metrics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Number of return periods in a year (252 for daily data, 12 for monthly).
    pub annualization_factor: f64,
    /// Annual risk-free rate used by the Sharpe ratio and CAPM (0.05 is 5%).
    pub risk_free_rate: f64,
    /// How returns are derived from prices.
    pub return_kind: ReturnKind,
    /// How two series with different timestamps are reconciled.
    pub alignment: AlignmentPolicy,
    pub var_confidence: f64,
    /// Holding period of the VaR estimate, in return periods.
    pub var_horizon: usize,
    pub var_method: VarMethod,
    /// Trailing window of the MAR ratio in years. 3 years gives the Calmar ratio.
    pub mar_window_years: f64,
    pub rolling_window: usize,
    pub ewma_span: usize,
}

/// Parameters of the Markowitz random-portfolio search.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    pub num_portfolios: usize,
    /// Fixes the random weights for reproducible runs.
    pub seed: Option<u64>,
    pub selection: SelectionMethod,
    pub show_progress: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive, overridden by `RUST_LOG`.
    pub level: String,
    /// When set, logs go to a daily rolling file in this directory instead of stderr.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

// --- Default Implementations ---

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            annualization_factor: 252.0,
            risk_free_rate: 0.0,
            return_kind: ReturnKind::Simple,
            alignment: AlignmentPolicy::Intersect,
            var_confidence: 0.95,
            var_horizon: 1,
            var_method: VarMethod::VarianceCovariance,
            mar_window_years: 3.0,
            rolling_window: 60,
            ewma_span: 20,
        }
    }
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            num_portfolios: 10_000,
            seed: None,
            selection: SelectionMethod::SharpeRatio,
            show_progress: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "turingquant.log".to_string(),
        }
    }
}

impl Config {
    /// Rejects settings that would make every downstream calculation meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analytics.validate()?;
        if self.optimizer.num_portfolios == 0 {
            return Err(ConfigError::ValidationError(
                "optimizer.num_portfolios must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl AnalyticsSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.annualization_factor.is_finite() && self.annualization_factor > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "analytics.annualization_factor must be positive, got {}",
                self.annualization_factor
            )));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(ConfigError::ValidationError(
                "analytics.risk_free_rate must be finite".to_string(),
            ));
        }
        if !(self.var_confidence > 0.0 && self.var_confidence < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "analytics.var_confidence must lie strictly between 0 and 1, got {}",
                self.var_confidence
            )));
        }
        if self.var_horizon == 0 {
            return Err(ConfigError::ValidationError(
                "analytics.var_horizon must be at least 1".to_string(),
            ));
        }
        if !(self.mar_window_years.is_finite() && self.mar_window_years > 0.0) {
            return Err(ConfigError::ValidationError(
                "analytics.mar_window_years must be positive".to_string(),
            ));
        }
        if self.rolling_window < 2 || self.ewma_span < 2 {
            return Err(ConfigError::ValidationError(
                "analytics.rolling_window and analytics.ewma_span must be at least 2"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
