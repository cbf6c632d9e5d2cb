//! Error types for rust_omics_eda

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for loading and deriving dashboard views
#[derive(Error, Debug)]
pub enum EdaError {
    #[error("Could not load data file {}: {source}", .path.display())]
    DataLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing column: {column}")]
    MissingColumn { column: String },

    #[error("Invalid value '{value}' in column {column} (row {row})")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Empty data: {reason}")]
    EmptyData { reason: String },

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Polars error: {0}")]
    PolarsError(#[from] polars::error::PolarsError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl EdaError {
    /// True when the error means the backing file could not be read at all
    pub fn is_data_load(&self) -> bool {
        matches!(self, EdaError::DataLoad { .. })
    }
}

/// Result type alias for rust_omics_eda operations
pub type Result<T> = std::result::Result<T, EdaError>;
