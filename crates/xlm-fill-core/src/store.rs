//! Cell store
//!
//! Holds every cell of a macro sheet in first-discovery order, together with
//! what is known about its value.

use ahash::AHashMap;

use crate::cell::{CellRecord, CellValue, ReferenceStyle};
use crate::error::{Error, Result};

static UNRESOLVED: CellValue = CellValue::Unresolved;

/// A cell of the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Cell reference
    pub reference: String,
    /// Raw formula text (empty for cells only ever written by macros)
    pub formula: String,
    /// Current value state
    pub value: CellValue,
}

/// Ordered store of cells keyed by reference
#[derive(Debug, Clone)]
pub struct CellStore {
    style: ReferenceStyle,
    cells: Vec<Cell>,
    index: AHashMap<String, usize>,
}

impl CellStore {
    /// Create an empty store for the given addressing style
    pub fn new(style: ReferenceStyle) -> Self {
        Self {
            style,
            cells: Vec::new(),
            index: AHashMap::new(),
        }
    }

    /// Build a store from table rows
    ///
    /// The addressing style is detected from the first record. A record whose
    /// value column holds a plain number starts out `Resolved`; every other
    /// cell starts `Unresolved`. A reference seen twice keeps its first
    /// position and the later formula.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = CellRecord>,
    {
        let mut records = records.into_iter().peekable();
        let style = match records.peek() {
            Some(first) => ReferenceStyle::detect(&first.reference)?,
            None => return Err(Error::UnknownReferenceStyle(String::new())),
        };

        let mut store = Self::new(style);
        for record in records {
            let value = if is_numeric_literal(&record.value) {
                CellValue::resolved(record.value.trim())
            } else {
                CellValue::Unresolved
            };
            store.insert(record.reference, record.formula, value);
        }

        tracing::debug!(cells = store.len(), %style, "built cell store");
        Ok(store)
    }

    /// Get the detected addressing style
    pub fn reference_style(&self) -> ReferenceStyle {
        self.style
    }

    /// Get the value of a cell (`Unresolved` for unknown references)
    pub fn get(&self, reference: &str) -> &CellValue {
        self.cell(reference).map_or(&UNRESOLVED, |c| &c.value)
    }

    /// Get a cell
    pub fn cell(&self, reference: &str) -> Option<&Cell> {
        self.index.get(reference).map(|&i| &self.cells[i])
    }

    /// Set the value of a cell, creating it if needed
    ///
    /// Only narrowing updates are applied (see [`CellValue::admits`]); anything
    /// else, in particular any write to a `Resolved` cell, is ignored. Returns
    /// whether the cell changed.
    pub fn set(&mut self, reference: &str, value: CellValue) -> bool {
        let i = match self.index.get(reference) {
            Some(&i) => i,
            None => {
                if value.is_unresolved() {
                    return false;
                }
                self.insert(reference.to_string(), String::new(), CellValue::Unresolved)
            }
        };

        let cell = &mut self.cells[i];
        if !cell.value.admits(&value) {
            tracing::trace!(
                reference,
                current = cell.value.type_name(),
                rejected = value.type_name(),
                "ignored non-narrowing update"
            );
            return false;
        }

        tracing::debug!(reference, from = %cell.value, to = %value, "narrowed cell");
        cell.value = value;
        true
    }

    /// Iterate cells in first-discovery order
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Count cells that are `Resolved`
    pub fn resolved_count(&self) -> usize {
        self.cells.iter().filter(|c| c.value.is_resolved()).count()
    }

    fn insert(&mut self, reference: String, formula: String, value: CellValue) -> usize {
        if let Some(&i) = self.index.get(&reference) {
            let cell = &mut self.cells[i];
            cell.formula = formula;
            cell.value = value;
            return i;
        }
        let i = self.cells.len();
        self.index.insert(reference.clone(), i);
        self.cells.push(Cell {
            reference,
            formula,
            value,
        });
        i
    }
}

/// Check for an optionally signed decimal number without exponent
fn is_numeric_literal(text: &str) -> bool {
    let text = text.trim();
    let digits = text.strip_prefix('-').unwrap_or(text);
    let mut seen_digit = false;
    let mut seen_dot = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}
