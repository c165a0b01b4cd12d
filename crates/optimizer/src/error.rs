use analytics::AnalyticsError;
use indicatif::style::TemplateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("Asset returns could not be prepared: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Progress bar template error: {0}")]
    ProgressBarTemplate(String),
}

impl From<TemplateError> for OptimizerError {
    fn from(error: TemplateError) -> Self {
        OptimizerError::ProgressBarTemplate(error.to_string())
    }
}
