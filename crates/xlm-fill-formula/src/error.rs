//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while evaluating expressions or parsing chains
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Malformed or unsafe expression, or an arithmetic fault
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// A FORMULA call whose terms are not `CHAR(<ref><op><ref>)`
    #[error("Chain parse error in '{formula}': unexpected term '{term}'")]
    ChainParse { formula: String, term: String },
}
