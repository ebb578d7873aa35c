//! Well-known payload fragments
//!
//! Formulas that show up again and again in this malware family. Each is a
//! complete chain payload, so it only applies to chains of the same length.

/// Built-in fragments, in the order they are applied
pub const WELL_KNOWN_FRAGMENTS: &[&str] = &[
    "=APP.MAXIMIZE()",
    "=CLOSE(FALSE)",
    "=NEXT()",
    "=\"The workbook cannot be opened or repaired by Microsoft Excel because it's corrupt.\"",
    "=\"https://docs.microsoft.com/en-us/officeupdates/office-msi-non-security-updates\"",
    "=\"C:\\Windows\\system32\\reg.exe\"",
    "=WAIT(NOW()+\"00:00:01\")",
    "=\"C:\\Windows\\system32\\rundll32.exe\"",
    "=\"EXPORT HKCU\\Software\\Microsoft\\Office\\\"",
];

/// Every payload is a formula
pub const FORMULA_PREFIX: char = '=';
