//! Rows of an exported cell table

use crate::error::{Error, Result};

/// One row of a macro sheet export: reference, formula text and cached value
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRecord {
    /// Cell reference (e.g. `A1` or `R1C1`)
    pub reference: String,
    /// Raw formula or value text, as stored in the sheet
    pub formula: String,
    /// Cached value column (often empty)
    pub value: String,
}

impl CellRecord {
    /// Create a record
    pub fn new<R, F, V>(reference: R, formula: F, value: V) -> Self
    where
        R: Into<String>,
        F: Into<String>,
        V: Into<String>,
    {
        Self {
            reference: reference.into(),
            formula: formula.into(),
            value: value.into(),
        }
    }

    /// Build a record from the fields of one table row
    ///
    /// `row` is only used for the error message.
    pub fn from_fields<S: AsRef<str>>(row: usize, fields: &[S]) -> Result<Self> {
        match fields {
            [reference, formula, value] => Ok(Self::new(
                reference.as_ref(),
                formula.as_ref(),
                value.as_ref(),
            )),
            _ => Err(Error::RowFormat {
                row,
                fields: fields.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fields() {
        let record = CellRecord::from_fields(1, &["A1", "SET.VALUE(B1,1)", ""]).unwrap();
        assert_eq!(record, CellRecord::new("A1", "SET.VALUE(B1,1)", ""));
    }

    #[test]
    fn test_from_fields_wrong_length() {
        let err = CellRecord::from_fields(7, &["A1", "x"]).unwrap_err();
        assert!(matches!(err, Error::RowFormat { row: 7, fields: 2 }));

        let err = CellRecord::from_fields(8, &["A1", "x", "", ""]).unwrap_err();
        assert!(matches!(err, Error::RowFormat { row: 8, fields: 4 }));
    }
}
