//! Payload recovery driver
//!
//! Builds the cell store from a cell table, fills `SET.VALUE` targets
//! (brute forcing `GET.CELL` where needed), collects the CHAR chains and runs
//! the solver: first the `=` every payload starts with, then the well-known
//! fragments, then caller-supplied fragments, until nothing narrows anymore.
//!
//! # Example
//!
//! ```rust
//! use xlm_fill::prelude::*;
//!
//! let mut deobfuscator = Deobfuscator::from_records(vec![
//!     CellRecord::new("A1", "SET.VALUE(B1,61)", ""),
//!     CellRecord::new("A2", "SET.VALUE(B2,0)", ""),
//!     CellRecord::new("A3", "SET.VALUE(C1,GET.CELL(50,A9))", ""),
//!     CellRecord::new("A4", "SET.VALUE(C2,64)", ""),
//!     CellRecord::new("A5", "FORMULA(CHAR(B1+B2)&CHAR(C1+C2),A20)", ""),
//! ])
//! .unwrap();
//!
//! deobfuscator.solve(&SolveOptions::default().with_expected(["=C"]));
//! assert_eq!(deobfuscator.payloads(), vec!["=C".to_string()]);
//! ```

use std::io::Read;
use std::path::Path;

use ahash::AHashSet;
use xlm_fill_core::{CellRecord, CellStore, CellValue};
use xlm_fill_csv::{CellTableOptions, CellTableReader};
use xlm_fill_formula::{
    brute_force_get_cell, evaluate, format_number, ChainBuilder, FormulaChain, MacroStatement,
};

use crate::error::Result;
use crate::fragments::{FORMULA_PREFIX, WELL_KNOWN_FRAGMENTS};
use crate::solver::{solve_for_expected, solve_formula, try_formulas, Narrowing};

/// Options for solving
#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Apply the built-in well-known fragments (default: true)
    pub use_builtin_fragments: bool,
    /// Caller-supplied fragments, applied after the built-in ones
    ///
    /// Spaces mean "any character" at that position.
    pub expected: Vec<String>,
    /// Maximum number of passes over the fragment list (default: 16)
    pub max_passes: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            use_builtin_fragments: true,
            expected: Vec::new(),
            max_passes: 16,
        }
    }
}

impl SolveOptions {
    /// Add caller-supplied fragments
    pub fn with_expected<I, S>(mut self, expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected.extend(expected.into_iter().map(Into::into));
        self
    }

    /// Skip the built-in fragments
    pub fn without_builtin_fragments(mut self) -> Self {
        self.use_builtin_fragments = false;
        self
    }

    /// Set the pass cap
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }
}

/// Statistics from loading and solving one cell table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveReport {
    /// Rows in the cell table
    pub records: usize,
    /// `SET.VALUE` statements found
    pub set_values: usize,
    /// `SET.VALUE` targets filled from a `GET.CELL` brute force
    pub brute_forced: usize,
    /// `SET.VALUE` statements left unapplied (bad target or unevaluable expression)
    pub unevaluated: usize,
    /// Chains found
    pub chains: usize,
    /// `FORMULA` statements that were not valid chains
    pub skipped_chains: usize,
    /// Fragment passes performed
    pub passes: usize,
    /// Narrowing steps that shrank a candidate set
    pub narrowed: usize,
    /// Chains without unknown positions
    pub resolved_chains: usize,
}

/// Recovers the payload text of one macro sheet
#[derive(Debug, Clone)]
pub struct Deobfuscator {
    store: CellStore,
    chains: Vec<FormulaChain>,
    report: SolveReport,
}

impl Deobfuscator {
    /// Load a cell table from records
    ///
    /// Fails on an unknown reference style. Invalid chains and expressions
    /// are logged and skipped.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = CellRecord>,
    {
        let records: Vec<CellRecord> = records.into_iter().collect();
        let mut report = SolveReport {
            records: records.len(),
            ..Default::default()
        };

        let mut store = CellStore::from_records(records)?;
        apply_set_values(&mut store, &mut report);
        let chains = collect_chains(&store, &mut report);

        let mut deobfuscator = Self {
            store,
            chains,
            report,
        };
        deobfuscator.recompute();
        Ok(deobfuscator)
    }

    /// Load a cell table from CSV
    pub fn from_reader<R: Read>(reader: R, options: &CellTableOptions) -> Result<Self> {
        Self::from_records(CellTableReader::read(reader, options)?)
    }

    /// Load a cell table from a CSV file
    pub fn from_file<P: AsRef<Path>>(path: P, options: &CellTableOptions) -> Result<Self> {
        Self::from_records(CellTableReader::read_file(path, options)?)
    }

    /// Run the solver to a fixpoint
    pub fn solve(&mut self, options: &SolveOptions) -> &SolveReport {
        for chain in &self.chains {
            let seeded = solve_formula(chain, 0, FORMULA_PREFIX, &mut self.store);
            if let Narrowing::Narrowed { .. } = seeded {
                self.report.narrowed += 1;
            }
        }
        self.recompute();

        let builtin: &[&str] = if options.use_builtin_fragments {
            WELL_KNOWN_FRAGMENTS
        } else {
            &[]
        };
        let fragments: Vec<&str> = builtin
            .iter()
            .copied()
            .chain(options.expected.iter().map(String::as_str))
            .collect();

        while !fragments.is_empty() && self.report.passes < options.max_passes {
            self.report.passes += 1;
            let narrowed: usize = fragments.iter().map(|f| self.apply_expected(f)).sum();
            if narrowed == 0 {
                break;
            }
        }

        self.report.resolved_chains = self
            .chains
            .iter()
            .filter(|c| c.unknown_count() == 0)
            .count();

        tracing::info!(
            chains = self.report.chains,
            resolved = self.report.resolved_chains,
            passes = self.report.passes,
            narrowed = self.report.narrowed,
            "solved"
        );
        &self.report
    }

    /// Narrow with one expected fragment and recompute the chains
    ///
    /// Returns the number of narrowing steps.
    pub fn apply_expected(&mut self, expected: &str) -> usize {
        let narrowed = solve_for_expected(&self.chains, expected, &mut self.store);
        self.report.narrowed += narrowed;
        self.recompute();
        narrowed
    }

    /// Recompute every chain's decoded text from the cells
    pub fn recompute(&mut self) {
        try_formulas(&mut self.chains, &self.store);
    }

    /// Chains, in discovery order
    pub fn chains(&self) -> &[FormulaChain] {
        &self.chains
    }

    pub fn store(&self) -> &CellStore {
        &self.store
    }

    pub fn report(&self) -> &SolveReport {
        &self.report
    }

    /// Decoded text of every chain, in discovery order
    pub fn payloads(&self) -> Vec<String> {
        self.chains.iter().map(|c| c.resolved_string()).collect()
    }
}

/// Load, solve and return the payloads of a CSV cell table
pub fn deobfuscate<R: Read>(
    reader: R,
    table_options: &CellTableOptions,
    options: &SolveOptions,
) -> Result<Vec<String>> {
    let mut deobfuscator = Deobfuscator::from_reader(reader, table_options)?;
    deobfuscator.solve(options);
    Ok(deobfuscator.payloads())
}

/// Fill `SET.VALUE` targets
fn apply_set_values(store: &mut CellStore, report: &mut SolveReport) {
    let style = store.reference_style();
    let statements: Vec<(String, String)> = store
        .iter()
        .filter_map(|cell| match MacroStatement::parse(&cell.formula) {
            Some(MacroStatement::SetValue { target, expression }) => {
                Some((target.to_string(), expression.to_string()))
            }
            _ => None,
        })
        .collect();
    report.set_values = statements.len();

    for (target, expression) in statements {
        if !style.is_reference(&target) {
            report.unevaluated += 1;
            tracing::warn!(%target, "SET.VALUE target is not a {} reference", style);
            continue;
        }

        if let Some(result) = brute_force_get_cell(&expression, style) {
            if !result.candidates.is_empty() {
                report.brute_forced += 1;
                store.set(&target, CellValue::candidates(result.candidates));
                continue;
            }
        }

        match evaluate(&expression) {
            Ok(value) => {
                store.set(&target, CellValue::resolved(format_number(value)));
            }
            Err(e) => {
                report.unevaluated += 1;
                tracing::warn!(%target, %expression, error = %e, "cannot evaluate SET.VALUE");
            }
        }
    }
}

/// Collect chains in discovery order, one per distinct formula
fn collect_chains(store: &CellStore, report: &mut SolveReport) -> Vec<FormulaChain> {
    let builder = ChainBuilder::new(store.reference_style());
    let mut seen = AHashSet::new();
    let mut chains = Vec::new();

    for cell in store.iter() {
        match builder.build(&cell.formula) {
            Ok(Some(chain)) => {
                if seen.insert(chain.formula().to_string()) {
                    chains.push(chain);
                }
            }
            Ok(None) => {}
            Err(e) => {
                report.skipped_chains += 1;
                tracing::warn!(cell = %cell.reference, error = %e, "skipping chain");
            }
        }
    }

    report.chains = chains.len();
    chains
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn records(rows: &[(&str, &str)]) -> Vec<CellRecord> {
        rows.iter().map(|(r, f)| CellRecord::new(*r, *f, "")).collect()
    }

    #[test]
    fn test_set_values_fill_store() {
        let d = Deobfuscator::from_records(records(&[
            ("A1", "SET.VALUE(B1,61)"),
            ("A2", "SET.VALUE(B2,GET.CELL(8,A9)*10)"),
            ("A3", "SET.VALUE(B3,GET.CELL(50,A9)+GET.CELL(50,A8))"),
            ("A4", "SET.VALUE(B4,NOW())"),
            ("A5", "SET.VALUE(R1C1,1)"),
        ]))
        .unwrap();

        let store = d.store();
        assert_eq!(store.get("B1"), &CellValue::resolved("61.0"));
        assert_eq!(store.get("B2").as_candidates().map(|c| c.len()), Some(7));
        assert_eq!(store.get("B3"), &CellValue::Unresolved);
        assert_eq!(store.get("B4"), &CellValue::Unresolved);
        // Mixed styles: an R1C1 target is not a cell of an A1 sheet
        assert!(store.cell("R1C1").is_none());

        let report = d.report();
        assert_eq!(report.records, 5);
        assert_eq!(report.set_values, 5);
        assert_eq!(report.brute_forced, 1);
        assert_eq!(report.unevaluated, 3);
    }

    #[test]
    fn test_deeply_nested_set_value_is_skipped() {
        let nested = format!(
            "SET.VALUE(B1,{}1{})",
            "(".repeat(20_000),
            ")".repeat(20_000)
        );
        let d = Deobfuscator::from_records(vec![
            CellRecord::new("A1", nested, ""),
            CellRecord::new("A2", "SET.VALUE(B2,61)", ""),
        ])
        .unwrap();

        assert_eq!(d.store().get("B1"), &CellValue::Unresolved);
        assert_eq!(d.store().get("B2"), &CellValue::resolved("61.0"));
        assert_eq!(d.report().unevaluated, 1);
    }

    #[test]
    fn test_chains_deduplicated_and_ordered() {
        let d = Deobfuscator::from_records(records(&[
            ("A1", "FORMULA(CHAR(B1+B2),A20)"),
            ("A2", "FORMULA(CHAR(B3+B4)&CHAR(B1+B2),A21)"),
            ("A3", "FORMULA(CHAR(B1+B2),A20)"),
            ("A4", "FORMULA(CHAR(B1^B2),A22)"),
        ]))
        .unwrap();

        let formulas: Vec<_> = d.chains().iter().map(|c| c.formula()).collect();
        assert_eq!(
            formulas,
            vec!["FORMULA(CHAR(B1+B2),A20)", "FORMULA(CHAR(B3+B4)&CHAR(B1+B2),A21)"]
        );
        assert_eq!(d.report().chains, 2);
        assert_eq!(d.report().skipped_chains, 1);
    }

    #[test]
    fn test_equals_seed() {
        // C1 in 1..=4, C1+60 must be '=' (61) so C1 is 1
        let mut d = Deobfuscator::from_records(records(&[
            ("A1", "SET.VALUE(C1,GET.CELL(50,A9))"),
            ("A2", "SET.VALUE(C2,60)"),
            ("A3", "FORMULA(CHAR(C1+C2),A20)"),
        ]))
        .unwrap();
        assert_eq!(d.payloads(), vec![" "]);

        let report = d.solve(&SolveOptions::default().without_builtin_fragments());
        assert_eq!(report.narrowed, 1);
        assert_eq!(report.resolved_chains, 1);
        assert_eq!(report.passes, 0);
        assert_eq!(d.payloads(), vec!["="]);
        assert_eq!(d.store().get("C1"), &CellValue::resolved("1.0"));
    }

    #[test]
    fn test_solve_options_builders() {
        let options = SolveOptions::default()
            .with_expected(["=A", "=B"])
            .without_builtin_fragments()
            .with_max_passes(3);
        assert_eq!(options.expected, vec!["=A".to_string(), "=B".to_string()]);
        assert!(!options.use_builtin_fragments);
        assert_eq!(options.max_passes, 3);
    }

    #[test]
    fn test_max_passes_zero_skips_fragments() {
        let mut d = Deobfuscator::from_records(records(&[
            ("A1", "SET.VALUE(B1,61)"),
            ("A2", "SET.VALUE(B2,0)"),
            ("A3", "SET.VALUE(C1,GET.CELL(50,A9))"),
            ("A4", "SET.VALUE(C2,64)"),
            ("A5", "FORMULA(CHAR(B1+B2)&CHAR(C1+C2),A20)"),
        ]))
        .unwrap();
        d.solve(&SolveOptions::default().with_expected(["=C"]).with_max_passes(0));
        assert_eq!(d.payloads(), vec!["= "]);
    }
}
