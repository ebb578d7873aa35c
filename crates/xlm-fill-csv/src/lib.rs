//! # xlm-fill-csv
//!
//! Reads macro sheet exports into [`CellRecord`](xlm_fill_core::CellRecord)s.

mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CellTableOptions;
pub use reader::CellTableReader;
