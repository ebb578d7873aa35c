//! # xlm-fill-formula
//!
//! Formula handling for xlm-fill.
//!
//! This crate provides:
//! - A restricted arithmetic evaluator (numbers, `+ - * /`, parentheses)
//! - `GET.CELL` brute forcing over each info type's legal results
//! - Recognition of `SET.VALUE`, `FORMULA` and `FORMULA.FILL` statements
//! - Parsing of `CHAR(<ref><op><ref>)&...` payload chains
//!
//! ## Example
//!
//! ```rust
//! use xlm_fill_core::ReferenceStyle;
//! use xlm_fill_formula::{brute_force_get_cell, compute_char, Operator};
//!
//! let result = brute_force_get_cell("GET.CELL(50,A1)", ReferenceStyle::A1).unwrap();
//! let decoded: Vec<char> = result
//!     .candidates
//!     .iter()
//!     .map(|c| compute_char(c, Operator::Add, "64.0").unwrap())
//!     .collect();
//! assert_eq!(decoded, vec!['A', 'B', 'C', 'D']);
//! ```

pub mod chain;
pub mod error;
pub mod evaluator;
pub mod get_cell;
pub mod statement;

pub use chain::{ChainBuilder, FormulaChain, Triple};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{
    char_from_value, compute_char, evaluate, format_number, normalize_numeric_literals, Operator,
    MAX_NESTING_DEPTH, PLACEHOLDER,
};
pub use get_cell::{brute_force_get_cell, info_type_domain, BruteForce, GetCellCall, DEFAULT_DOMAIN};
pub use statement::MacroStatement;
