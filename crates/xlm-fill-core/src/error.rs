//! Error types for xlm-fill-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a cell store
#[derive(Debug, Error)]
pub enum Error {
    /// A row of the cell table does not carry reference, formula and value
    #[error("Row {row} has {fields} fields, expected 3")]
    RowFormat { row: usize, fields: usize },

    /// The first reference is neither A1 nor R1C1 style
    #[error("Unknown reference style: '{0}'")]
    UnknownReferenceStyle(String),
}
