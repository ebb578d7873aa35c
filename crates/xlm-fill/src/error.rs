//! Error types for xlm-fill

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort processing of one input source
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed cell table or unknown reference style
    #[error(transparent)]
    Core(#[from] xlm_fill_core::Error),

    /// Formula error
    #[error(transparent)]
    Formula(#[from] xlm_fill_formula::FormulaError),

    /// Error reading the cell table
    #[error(transparent)]
    Csv(#[from] xlm_fill_csv::CsvError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
