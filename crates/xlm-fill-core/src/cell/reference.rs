//! Cell reference styles

use crate::error::{Error, Result};
use std::fmt;

/// Addressing style of a macro sheet export
///
/// Exports either use letters followed by a row number (`A1`, `BC12`) or the
/// numeric `R1C1` form. The style is detected once, from the first data row,
/// and applies to every reference of the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReferenceStyle {
    /// Column letters and row digits (e.g. `A1`)
    A1,
    /// Row and column numbers (e.g. `R1C1`)
    R1C1,
}

impl ReferenceStyle {
    /// Detect the style from a reference
    ///
    /// Only the start of the text has to look like a reference. `R1C1` is
    /// checked first since every `R1C1` reference also starts like an `A1`
    /// one (`R1`).
    ///
    /// # Examples
    /// ```
    /// use xlm_fill_core::ReferenceStyle;
    ///
    /// assert_eq!(ReferenceStyle::detect("R12C3").unwrap(), ReferenceStyle::R1C1);
    /// assert_eq!(ReferenceStyle::detect("AB7").unwrap(), ReferenceStyle::A1);
    /// assert!(ReferenceStyle::detect("7AB").is_err());
    /// ```
    pub fn detect(reference: &str) -> Result<Self> {
        if scan_r1c1(reference).is_some() {
            Ok(ReferenceStyle::R1C1)
        } else if scan_a1(reference).is_some() {
            Ok(ReferenceStyle::A1)
        } else {
            Err(Error::UnknownReferenceStyle(reference.to_string()))
        }
    }

    /// Check whether the whole text is a reference in this style
    pub fn is_reference(&self, text: &str) -> bool {
        let scanned = match self {
            ReferenceStyle::A1 => scan_a1(text),
            ReferenceStyle::R1C1 => scan_r1c1(text),
        };
        scanned == Some(text.len())
    }
}

impl fmt::Display for ReferenceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceStyle::A1 => write!(f, "A1"),
            ReferenceStyle::R1C1 => write!(f, "R1C1"),
        }
    }
}

/// Length of the leading `[A-Z]+[0-9]+` run, if any
fn scan_a1(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let letters = count_while(bytes, 0, |b| b.is_ascii_uppercase());
    if letters == 0 {
        return None;
    }
    let digits = count_while(bytes, letters, |b| b.is_ascii_digit());
    if digits == 0 {
        return None;
    }
    Some(letters + digits)
}

/// Length of the leading `R[0-9]+C[0-9]+` run, if any
fn scan_r1c1(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'R') {
        return None;
    }
    let row_digits = count_while(bytes, 1, |b| b.is_ascii_digit());
    if row_digits == 0 {
        return None;
    }
    let pos = 1 + row_digits;
    if bytes.get(pos) != Some(&b'C') {
        return None;
    }
    let col_digits = count_while(bytes, pos + 1, |b| b.is_ascii_digit());
    if col_digits == 0 {
        return None;
    }
    Some(pos + 1 + col_digits)
}

fn count_while(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    bytes
        .get(start..)
        .map_or(0, |rest| rest.iter().take_while(|&&b| pred(b)).count())
}
