//! Constraint solver
//!
//! Narrows the candidate sets of `GET.CELL`-fed cells by matching the chains
//! they feed against plaintext that is known (or guessed) to be part of the
//! payload. All functions take the [`CellStore`] explicitly; narrowing only
//! ever intersects, so a wrong guess can at worst be a no-op.

use xlm_fill_core::{CellStore, CellValue};
use xlm_fill_formula::{compute_char, FormulaChain, PLACEHOLDER};

/// Outcome of narrowing one chain position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Narrowing {
    /// The left cell has no candidates or the right cell is not resolved
    Skipped,
    /// No candidate produces the expected character
    NoMatch,
    /// Every candidate produces the expected character
    Unchanged,
    /// The candidate set shrank (`remaining == 1` means it is now resolved)
    Narrowed { remaining: usize },
}

/// Decode a chain from the current cell state
///
/// A position is decoded only when both of its cells are resolved and the
/// expression evaluates; every other position is [`PLACEHOLDER`].
pub fn recompute(chain: &FormulaChain, store: &CellStore) -> Vec<char> {
    chain
        .triples()
        .iter()
        .map(|triple| {
            let left = store.get(&triple.left).as_resolved();
            let right = store.get(&triple.right).as_resolved();
            match (left, right) {
                (Some(l), Some(r)) => compute_char(l, triple.op, r).unwrap_or_else(|e| {
                    tracing::trace!(%triple, error = %e, "position does not evaluate");
                    PLACEHOLDER
                }),
                _ => PLACEHOLDER,
            }
        })
        .collect()
}

/// Recompute the decoded text of every chain
///
/// Returns the number of chains whose text changed.
pub fn try_formulas(chains: &mut [FormulaChain], store: &CellStore) -> usize {
    let mut changed = 0;
    for chain in chains.iter_mut() {
        let resolved = recompute(chain, store);
        if resolved.as_slice() != chain.resolved_chars() {
            changed += 1;
            chain.set_resolved(resolved);
        }
    }
    changed
}

/// Score how well a decoded text agrees with an expected one
///
/// Returns 0 when the lengths differ or when a position holds two different
/// known characters. Positions where either side is the placeholder are
/// wildcards. Otherwise returns the number of positions where both sides hold
/// the same known character.
///
/// # Example
/// ```rust
/// use xlm_fill::partial_match;
///
/// assert_eq!(partial_match("=C ", "=CL"), 2);
/// assert_eq!(partial_match("=C ", "=XL"), 0);
/// assert_eq!(partial_match("=C", "=CL"), 0);
/// ```
pub fn partial_match(value: &str, expected: &str) -> usize {
    let value: Vec<char> = value.chars().collect();
    let expected: Vec<char> = expected.chars().collect();
    partial_match_chars(&value, &expected)
}

/// [`partial_match`] over characters
pub fn partial_match_chars(value: &[char], expected: &[char]) -> usize {
    if value.len() != expected.len() {
        return 0;
    }

    let mut matches = 0;
    for (&v, &e) in value.iter().zip(expected) {
        if v == e {
            if e != PLACEHOLDER {
                matches += 1;
            }
            continue;
        }
        if v != PLACEHOLDER && e != PLACEHOLDER {
            return 0;
        }
    }
    matches
}

/// Narrow the left cell of one chain position to the candidates producing
/// `expected`
///
/// Nothing happens unless the left cell still has candidates and the right
/// cell is resolved. An empty result leaves the cell untouched.
pub fn solve_formula(
    chain: &FormulaChain,
    position: usize,
    expected: char,
    store: &mut CellStore,
) -> Narrowing {
    let triple = match chain.triples().get(position) {
        Some(t) => t,
        None => return Narrowing::Skipped,
    };
    let candidates = match store.get(&triple.left).as_candidates() {
        Some(c) => c,
        None => return Narrowing::Skipped,
    };
    let right = match store.get(&triple.right).as_resolved() {
        Some(r) => r,
        None => return Narrowing::Skipped,
    };

    let total = candidates.len();
    let survivors: Vec<String> = candidates
        .iter()
        .filter(|c| compute_char(c, triple.op, right).map_or(false, |ch| ch == expected))
        .cloned()
        .collect();

    let remaining = survivors.len();
    if remaining == 0 {
        return Narrowing::NoMatch;
    }
    if remaining == total {
        return Narrowing::Unchanged;
    }

    store.set(&triple.left, CellValue::candidates(survivors));
    Narrowing::Narrowed { remaining }
}

/// Narrow cells using one expected payload
///
/// Every chain compatible with `expected` (see [`partial_match`]) gets each
/// of its unknown positions narrowed to the expected character. Returns the
/// number of positions that narrowed a cell.
pub fn solve_for_expected(chains: &[FormulaChain], expected: &str, store: &mut CellStore) -> usize {
    let expected: Vec<char> = expected.chars().collect();
    let mut narrowed = 0;

    for chain in chains {
        if partial_match_chars(chain.resolved_chars(), &expected) == 0 {
            continue;
        }

        for (position, (&current, &wanted)) in
            chain.resolved_chars().iter().zip(&expected).enumerate()
        {
            if current != PLACEHOLDER || wanted == PLACEHOLDER {
                continue;
            }
            if let Narrowing::Narrowed { remaining } =
                solve_formula(chain, position, wanted, store)
            {
                tracing::debug!(
                    chain = chain.formula(),
                    position,
                    %wanted,
                    remaining,
                    "narrowed by expected text"
                );
                narrowed += 1;
            }
        }
    }

    narrowed
}
