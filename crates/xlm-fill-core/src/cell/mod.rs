//! Cell-related types
//!
//! This module contains:
//! - [`CellValue`] - What is known about a cell's value
//! - [`CellRecord`] - One row of an exported cell table
//! - [`ReferenceStyle`] - The sheet's addressing style (`A1` or `R1C1`)

mod record;
mod reference;
mod value;

pub use record::CellRecord;
pub use reference::ReferenceStyle;
pub use value::CellValue;
