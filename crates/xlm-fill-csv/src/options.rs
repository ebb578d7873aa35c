//! CSV options

/// Options for reading an exported cell table
#[derive(Debug, Clone)]
pub struct CellTableOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Whether the first row is a header (default: true)
    ///
    /// A header starting with `Sheet` marks a leading sheet-name column,
    /// which is dropped from every row.
    pub has_header: bool,
}

impl Default for CellTableOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            has_header: true,
        }
    }
}
