use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data to calculate {metric}: need at least {required} points, got {actual}")]
    InsufficientData {
        metric: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Series cannot be aligned: {0}")]
    Alignment(String),

    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Calculation error: Division by zero encountered in metric '{0}'")]
    DivisionByZero(String),
}

impl From<CoreError> for AnalyticsError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidInput(field, reason) => AnalyticsError::InvalidInput(field, reason),
        }
    }
}

impl AnalyticsError {
    /// True for errors meaning "this metric is undefined for this input", as
    /// opposed to errors in the input itself.
    pub fn is_undefined_metric(&self) -> bool {
        matches!(
            self,
            AnalyticsError::InsufficientData { .. } | AnalyticsError::DivisionByZero(_)
        )
    }
}

pub(crate) fn require(metric: &'static str, required: usize, actual: usize) -> Result<(), AnalyticsError> {
    if actual < required {
        return Err(AnalyticsError::InsufficientData {
            metric,
            required,
            actual,
        });
    }
    Ok(())
}

pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> AnalyticsError {
    AnalyticsError::InvalidInput(field.to_string(), reason.into())
}

/// Annualization factors and time scales must be finite and positive.
pub(crate) fn check_scale(field: &str, value: f64) -> Result<(), AnalyticsError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(field, format!("must be positive and finite, got {value}")));
    }
    Ok(())
}
