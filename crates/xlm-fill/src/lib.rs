//! # xlm-fill
//!
//! Recovers the payload text of Excel 4.0 (XLM) macro sheets obfuscated with
//! CHAR chains whose helper cells are fed by `GET.CELL` calls.
//!
//! The input is a cell table (reference, formula, cached value) exported from
//! the sheet. `GET.CELL` results depend on how the workbook is formatted and
//! are not in the table, so every legal result is tried and the resulting
//! candidate sets are narrowed against plaintext the payload is known to
//! contain.
//!
//! ## Features
//!
//! - A1 and R1C1 cell tables, read from CSV
//! - `SET.VALUE`, `FORMULA` and `FORMULA.FILL` statements
//! - `GET.CELL` brute forcing with per-info-type domains
//! - Built-in and caller-supplied expected fragments
//!
//! ## Example
//!
//! ```rust
//! use xlm_fill::prelude::*;
//!
//! let csv = "\
//! Cell,Formula,Value
//! A1,\"SET.VALUE(B1,61)\",
//! A2,\"SET.VALUE(B2,0)\",
//! A3,\"SET.VALUE(C1,GET.CELL(50,A9))\",
//! A4,\"SET.VALUE(C2,64)\",
//! A5,\"FORMULA(CHAR(B1+B2)&CHAR(C1+C2),A20)\",
//! ";
//!
//! let payloads = deobfuscate(
//!     csv.as_bytes(),
//!     &CellTableOptions::default(),
//!     &SolveOptions::default().with_expected(["=C"]),
//! )
//! .unwrap();
//! assert_eq!(payloads, vec!["=C".to_string()]);
//! ```

pub mod deobfuscator;
pub mod error;
pub mod fragments;
pub mod prelude;
pub mod solver;

pub use deobfuscator::{deobfuscate, Deobfuscator, SolveOptions, SolveReport};
pub use error::{Error, Result};
pub use fragments::{FORMULA_PREFIX, WELL_KNOWN_FRAGMENTS};
pub use solver::{
    partial_match, partial_match_chars, recompute, solve_for_expected, solve_formula,
    try_formulas, Narrowing,
};

// Re-export core types
pub use xlm_fill_core::{Cell, CellRecord, CellStore, CellValue, ReferenceStyle};

// Re-export formula types
pub use xlm_fill_formula::{
    brute_force_get_cell, compute_char, evaluate, info_type_domain, BruteForce, ChainBuilder,
    FormulaChain, FormulaError, MacroStatement, Operator, Triple, PLACEHOLDER,
};

// Re-export CSV types
pub use xlm_fill_csv::{CellTableOptions, CellTableReader, CsvError};
