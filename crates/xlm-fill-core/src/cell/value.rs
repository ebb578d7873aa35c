//! Cell value state

use std::fmt;

/// What is known about a cell's runtime value
///
/// Values only ever narrow: `Unresolved` becomes `Candidates` or `Resolved`,
/// `Candidates` shrink or become `Resolved`, and `Resolved` is final.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Nothing known yet
    #[default]
    Unresolved,

    /// Plausible values, in brute-force enumeration order
    Candidates(Vec<String>),

    /// A single confirmed value
    Resolved(String),
}

impl CellValue {
    /// Create a resolved value
    pub fn resolved<S: Into<String>>(value: S) -> Self {
        CellValue::Resolved(value.into())
    }

    /// Create a value from a candidate list
    ///
    /// An empty list carries no information and stays `Unresolved`; a single
    /// candidate is a confirmed value.
    pub fn candidates(mut values: Vec<String>) -> Self {
        match values.len() {
            0 => CellValue::Unresolved,
            1 => CellValue::Resolved(values.remove(0)),
            _ => CellValue::Candidates(values),
        }
    }

    /// Check if nothing is known
    pub fn is_unresolved(&self) -> bool {
        matches!(self, CellValue::Unresolved)
    }

    /// Check if the value is confirmed
    pub fn is_resolved(&self) -> bool {
        matches!(self, CellValue::Resolved(_))
    }

    /// Get the confirmed value
    pub fn as_resolved(&self) -> Option<&str> {
        match self {
            CellValue::Resolved(v) => Some(v),
            _ => None,
        }
    }

    /// Get the remaining candidates
    pub fn as_candidates(&self) -> Option<&[String]> {
        match self {
            CellValue::Candidates(c) => Some(c),
            _ => None,
        }
    }

    /// Check whether replacing `self` with `next` only narrows what is known
    ///
    /// Candidate lists may only shrink to a subset of themselves, and a
    /// resolved value must be one of the current candidates.
    pub fn admits(&self, next: &CellValue) -> bool {
        match (self, next) {
            (_, CellValue::Unresolved) => false,
            (CellValue::Unresolved, _) => true,
            (CellValue::Resolved(_), _) => false,
            (CellValue::Candidates(current), CellValue::Resolved(v)) => current.contains(v),
            (CellValue::Candidates(current), CellValue::Candidates(narrowed)) => {
                narrowed.len() < current.len() && narrowed.iter().all(|v| current.contains(v))
            }
        }
    }

    /// Get the type name for log messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Unresolved => "unresolved",
            CellValue::Candidates(_) => "candidates",
            CellValue::Resolved(_) => "resolved",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Unresolved => write!(f, "?"),
            CellValue::Candidates(c) => write!(f, "[{}]", c.join(", ")),
            CellValue::Resolved(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_candidates_normalization() {
        assert_eq!(CellValue::candidates(vec![]), CellValue::Unresolved);
        assert_eq!(
            CellValue::candidates(strings(&["3.0"])),
            CellValue::resolved("3.0")
        );
        assert_eq!(
            CellValue::candidates(strings(&["1.0", "2.0"])),
            CellValue::Candidates(strings(&["1.0", "2.0"]))
        );
    }

    #[test]
    fn test_admits_from_unresolved() {
        let v = CellValue::Unresolved;
        assert!(v.admits(&CellValue::resolved("1.0")));
        assert!(v.admits(&CellValue::Candidates(strings(&["1.0", "2.0"]))));
        assert!(!v.admits(&CellValue::Unresolved));
    }

    #[test]
    fn test_admits_never_overwrites_resolved() {
        let v = CellValue::resolved("1.0");
        assert!(!v.admits(&CellValue::resolved("2.0")));
        assert!(!v.admits(&CellValue::resolved("1.0")));
        assert!(!v.admits(&CellValue::Candidates(strings(&["1.0", "2.0"]))));
        assert!(!v.admits(&CellValue::Unresolved));
    }

    #[test]
    fn test_admits_only_narrowing_candidates() {
        let v = CellValue::Candidates(strings(&["1.0", "2.0", "3.0"]));
        assert!(v.admits(&CellValue::Candidates(strings(&["1.0", "3.0"]))));
        assert!(v.admits(&CellValue::resolved("2.0")));

        // Same size, foreign values, or growing sets are rejected
        assert!(!v.admits(&CellValue::Candidates(strings(&["1.0", "2.0", "3.0"]))));
        assert!(!v.admits(&CellValue::Candidates(strings(&["1.0", "9.0"]))));
        assert!(!v.admits(&CellValue::resolved("9.0")));
        assert!(!v.admits(&CellValue::Unresolved));
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Unresolved.to_string(), "?");
        assert_eq!(CellValue::resolved("65.0").to_string(), "65.0");
        assert_eq!(
            CellValue::Candidates(strings(&["1.0", "2.0"])).to_string(),
            "[1.0, 2.0]"
        );
    }
}
