//! GET.CELL brute forcing
//!
//! `GET.CELL(type, ref)` returns formatting information about a cell, which
//! depends on the workbook as opened by the victim and cannot be known from
//! the exported cell table. Each info type has a small set of legal results,
//! so an expression around a single call is evaluated once per legal result.

use std::ops::RangeInclusive;

use lazy_regex::{regex, Captures};
use xlm_fill_core::ReferenceStyle;

use crate::evaluator::{evaluate, format_number};

/// Domain used for info types that are not in [`info_type_domain`]
pub const DEFAULT_DOMAIN: RangeInclusive<u32> = 0..=255;

/// Legal results of `GET.CELL` for an info type
///
/// Unknown types fall back to [`DEFAULT_DOMAIN`].
pub fn info_type_domain(info_type: u32) -> RangeInclusive<u32> {
    match info_type {
        // Horizontal alignment
        8 => 1..=7,
        // Row height, in points
        17 => 0..=255,
        // Font size, in points
        19 => 0..=255,
        // Font color of the first character, 0 when automatic
        24 => 0..=56,
        // Shade foreground color, 0 when automatic
        38 => 0..=56,
        // Vertical alignment
        50 => 1..=4,
        _ => {
            tracing::debug!(info_type, "no known GET.CELL domain, using 0..=255");
            DEFAULT_DOMAIN
        }
    }
}

/// A `GET.CELL` call located inside an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCellCall<'a> {
    /// Text before the call
    pub prefix: &'a str,
    /// Requested info type (`None` if it does not fit in a `u32`)
    pub info_type: Option<u32>,
    /// Inspected cell
    pub reference: &'a str,
    /// Text after the call
    pub suffix: &'a str,
}

impl<'a> GetCellCall<'a> {
    /// Find the last `GET.CELL` call of an expression
    ///
    /// Other calls, if any, stay in the prefix and make every substituted
    /// expression fail evaluation.
    pub fn find(expression: &'a str, style: ReferenceStyle) -> Option<Self> {
        let caps = match style {
            ReferenceStyle::A1 => {
                regex!(r"^(.*)GET\.CELL\s*\(\s*([0-9]+)\s*,\s*([A-Z]+[0-9]+)\s*\)(.*)$"s)
                    .captures(expression)
            }
            ReferenceStyle::R1C1 => {
                regex!(r"^(.*)GET\.CELL\s*\(\s*([0-9]+)\s*,\s*(R[0-9]+C[0-9]+)\s*\)(.*)$"s)
                    .captures(expression)
            }
        }?;

        Some(Self::from_captures(&caps))
    }

    fn from_captures(caps: &Captures<'a>) -> Self {
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        Self {
            prefix: group(1),
            info_type: group(2).parse().ok(),
            reference: group(3),
            suffix: group(4),
        }
    }

    /// Legal results of this call
    pub fn domain(&self) -> RangeInclusive<u32> {
        self.info_type.map_or(DEFAULT_DOMAIN, info_type_domain)
    }

    /// The expression with the call replaced by `value`
    pub fn substitute(&self, value: u32) -> String {
        format!("{}{}{}", self.prefix, value, self.suffix)
    }
}

/// Outcome of brute forcing one expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BruteForce {
    /// Number of domain values tried
    pub attempted: usize,
    /// Stringified results of the evaluations that succeeded, in domain order
    pub candidates: Vec<String>,
}

/// Evaluate an expression once per legal result of its `GET.CELL` call
///
/// Returns `None` if the expression contains no call. Domain values whose
/// substituted expression fails to evaluate are dropped.
///
/// # Example
/// ```rust
/// use xlm_fill_core::ReferenceStyle;
/// use xlm_fill_formula::brute_force_get_cell;
///
/// let result = brute_force_get_cell("GET.CELL(50,A1)*2", ReferenceStyle::A1).unwrap();
/// assert_eq!(result.attempted, 4);
/// assert_eq!(result.candidates, vec!["2.0", "4.0", "6.0", "8.0"]);
/// ```
pub fn brute_force_get_cell(expression: &str, style: ReferenceStyle) -> Option<BruteForce> {
    let call = GetCellCall::find(expression, style)?;

    let mut attempted = 0;
    let mut candidates = Vec::new();
    for value in call.domain() {
        attempted += 1;
        match evaluate(&call.substitute(value)) {
            Ok(result) => candidates.push(format_number(result)),
            Err(e) => tracing::trace!(value, error = %e, "dropped GET.CELL candidate"),
        }
    }

    tracing::debug!(
        expression,
        attempted,
        candidates = candidates.len(),
        "brute forced GET.CELL"
    );

    Some(BruteForce {
        attempted,
        candidates,
    })
}
