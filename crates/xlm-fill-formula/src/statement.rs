//! Macro statement recognition
//!
//! Only the statements the CHAR-chain obfuscation is built from are
//! recognized: `SET.VALUE` stores an expression result in a helper cell, and
//! `FORMULA` / `FORMULA.FILL` write the concatenated characters somewhere.

/// A recognized macro statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroStatement<'a> {
    /// `SET.VALUE(target,expression)`
    SetValue {
        target: &'a str,
        expression: &'a str,
    },

    /// `FORMULA(body,destination)` or `FORMULA.FILL(body,range)`
    Formula {
        body: &'a str,
        destination: &'a str,
        fill: bool,
    },
}

impl<'a> MacroStatement<'a> {
    /// Recognize a statement from a cell's formula text
    ///
    /// A leading `=` is ignored. The arguments are split at the first comma;
    /// a `SET.VALUE` without one is not recognized.
    ///
    /// # Example
    /// ```rust
    /// use xlm_fill_formula::MacroStatement;
    ///
    /// let stmt = MacroStatement::parse("SET.VALUE(B1,GET.CELL(19,A1)+32)").unwrap();
    /// assert_eq!(
    ///     stmt,
    ///     MacroStatement::SetValue { target: "B1", expression: "GET.CELL(19,A1)+32" }
    /// );
    /// ```
    pub fn parse(formula: &'a str) -> Option<Self> {
        let formula = formula.strip_prefix('=').unwrap_or(formula);

        if let Some(args) = strip_call(formula, "SET.VALUE") {
            let (target, expression) = args.split_once(',')?;
            return Some(MacroStatement::SetValue {
                target: target.trim(),
                expression,
            });
        }

        let (args, fill) = match strip_call(formula, "FORMULA") {
            Some(args) => (args, false),
            None => (strip_call(formula, "FORMULA.FILL")?, true),
        };
        let (body, destination) = args.split_once(',').unwrap_or((args, ""));
        Some(MacroStatement::Formula {
            body,
            destination: destination.trim(),
            fill,
        })
    }
}

/// Arguments of `NAME(...)`, if the text is exactly one such call
fn strip_call<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.strip_prefix(name)?.strip_prefix('(')?.strip_suffix(')')
}
