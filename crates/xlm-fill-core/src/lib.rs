//! # xlm-fill-core
//!
//! Core data structures for xlm-fill.
//!
//! This crate provides the types shared by the other xlm-fill crates:
//! - [`CellValue`] - What is known about a cell (`Unresolved`, `Candidates`, `Resolved`)
//! - [`CellRecord`] - One row of an exported macro sheet
//! - [`ReferenceStyle`] - `A1` or `R1C1` addressing, detected once per sheet
//! - [`CellStore`] - Ordered cells with monotonic value updates
//!
//! ## Example
//!
//! ```rust
//! use xlm_fill_core::{CellRecord, CellStore, CellValue};
//!
//! let mut store = CellStore::from_records(vec![
//!     CellRecord::new("A1", "SET.VALUE(B1,GET.CELL(50,A9))", ""),
//! ])
//! .unwrap();
//!
//! store.set("B1", CellValue::candidates(vec!["1.0".into(), "2.0".into()]));
//! store.set("B1", CellValue::resolved("2.0"));
//!
//! // Resolved values are final
//! assert!(!store.set("B1", CellValue::resolved("1.0")));
//! assert_eq!(store.get("B1"), &CellValue::resolved("2.0"));
//! ```

pub mod cell;
pub mod error;
pub mod store;

pub use cell::{CellRecord, CellValue, ReferenceStyle};
pub use error::{Error, Result};
pub use store::{Cell, CellStore};
