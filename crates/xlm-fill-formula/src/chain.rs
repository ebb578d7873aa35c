//! CHAR chains
//!
//! A payload is written one character at a time:
//! `FORMULA(CHAR(B1+C1)&CHAR(B2-C2)&...,target)`. Each `CHAR` term combines two
//! helper cells with an operator and becomes a [`Triple`].

use std::fmt;

use xlm_fill_core::ReferenceStyle;

use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::{Operator, PLACEHOLDER};
use crate::statement::MacroStatement;

/// One character of a chain: `CHAR(left <op> right)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub left: String,
    pub op: Operator,
    pub right: String,
}

impl Triple {
    pub fn new<L: Into<String>, R: Into<String>>(left: L, op: Operator, right: R) -> Self {
        Self {
            left: left.into(),
            op,
            right: right.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CHAR({}{}{})", self.left, self.op, self.right)
    }
}

/// A payload-construction formula and its best-known decoded text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaChain {
    formula: String,
    destination: String,
    triples: Vec<Triple>,
    resolved: Vec<char>,
}

impl FormulaChain {
    /// Create a chain with every position unknown
    pub fn new<F, D>(formula: F, destination: D, triples: Vec<Triple>) -> Self
    where
        F: Into<String>,
        D: Into<String>,
    {
        let resolved = vec![PLACEHOLDER; triples.len()];
        Self {
            formula: formula.into(),
            destination: destination.into(),
            triples,
            resolved,
        }
    }

    /// Original formula text (the chain's key)
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// Cell or range the payload is written to
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Number of characters
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Decoded characters, [`PLACEHOLDER`] where unknown
    pub fn resolved_chars(&self) -> &[char] {
        &self.resolved
    }

    /// Decoded text, [`PLACEHOLDER`] where unknown
    pub fn resolved_string(&self) -> String {
        self.resolved.iter().collect()
    }

    /// Replace the decoded characters
    ///
    /// Ignored unless there is exactly one character per triple.
    pub fn set_resolved(&mut self, resolved: Vec<char>) {
        if resolved.len() == self.triples.len() {
            self.resolved = resolved;
        }
    }

    /// Count positions that are still unknown
    pub fn unknown_count(&self) -> usize {
        self.resolved.iter().filter(|&&c| c == PLACEHOLDER).count()
    }
}

/// Parses `FORMULA` / `FORMULA.FILL` statements into chains
#[derive(Debug, Clone, Copy)]
pub struct ChainBuilder {
    style: ReferenceStyle,
}

impl ChainBuilder {
    pub fn new(style: ReferenceStyle) -> Self {
        Self { style }
    }

    /// Build a chain from a cell's formula text
    ///
    /// Returns `Ok(None)` for formulas that are not `FORMULA` statements, and
    /// an error when a statement term is not `CHAR(<ref><op><ref>)`.
    ///
    /// # Example
    /// ```rust
    /// use xlm_fill_core::ReferenceStyle;
    /// use xlm_fill_formula::ChainBuilder;
    ///
    /// let builder = ChainBuilder::new(ReferenceStyle::A1);
    /// let chain = builder.build("FORMULA(CHAR(B1+C1)&CHAR(B2/C2),D1)").unwrap().unwrap();
    /// assert_eq!(chain.len(), 2);
    /// assert_eq!(chain.destination(), "D1");
    /// assert!(builder.build("SET.VALUE(B1,61)").unwrap().is_none());
    /// ```
    pub fn build(&self, formula: &str) -> FormulaResult<Option<FormulaChain>> {
        let (body, destination) = match MacroStatement::parse(formula) {
            Some(MacroStatement::Formula {
                body, destination, ..
            }) => (body, destination),
            _ => return Ok(None),
        };

        let triples = body
            .split('&')
            .map(|term| {
                self.parse_term(term).ok_or_else(|| FormulaError::ChainParse {
                    formula: formula.to_string(),
                    term: term.to_string(),
                })
            })
            .collect::<FormulaResult<Vec<_>>>()?;

        Ok(Some(FormulaChain::new(formula, destination, triples)))
    }

    fn parse_term(&self, term: &str) -> Option<Triple> {
        let caps = match self.style {
            ReferenceStyle::A1 => {
                lazy_regex::regex!(r"^CHAR\(([A-Z]+[0-9]+)(.)([A-Z]+[0-9]+)\)$").captures(term)
            }
            ReferenceStyle::R1C1 => {
                lazy_regex::regex!(r"^CHAR\((R[0-9]+C[0-9]+)(.)(R[0-9]+C[0-9]+)\)$")
                    .captures(term)
            }
        }?;

        let op = caps[2].chars().next().and_then(Operator::from_char)?;
        Some(Triple::new(&caps[1], op, &caps[3]))
    }
}
