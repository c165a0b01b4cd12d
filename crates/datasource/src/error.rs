use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to open the price file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid value on line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("The file has no '{0}' column")]
    MissingColumn(String),

    #[error("The loaded data is not a valid series: {0}")]
    Core(#[from] CoreError),
}
