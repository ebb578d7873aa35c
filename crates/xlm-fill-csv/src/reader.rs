//! Cell table reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CellTableOptions;
use xlm_fill_core::CellRecord;

/// Reader for macro sheet exports (`reference,formula,value` rows)
pub struct CellTableReader;

impl CellTableReader {
    /// Read a cell table file
    pub fn read_file<P: AsRef<Path>>(
        path: P,
        options: &CellTableOptions,
    ) -> CsvResult<Vec<CellRecord>> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read a cell table from a reader
    ///
    /// Rows keep their file order. A row that does not have exactly three
    /// fields (after dropping the sheet column) fails the whole table.
    pub fn read<R: Read>(reader: R, options: &CellTableOptions) -> CsvResult<Vec<CellRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(options.has_header)
            .flexible(true)
            .from_reader(reader);

        let mut skip = 0;
        if options.has_header {
            let headers = csv_reader.headers()?;
            if headers.get(0) == Some("Sheet") {
                tracing::debug!("dropping sheet name column");
                skip = 1;
            }
        }

        let mut records = Vec::new();
        for (index, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = record
                .position()
                .map_or(index + 1, |p| p.line() as usize);
            let fields: Vec<&str> = record.iter().skip(skip).collect();
            records.push(CellRecord::from_fields(row, &fields)?);
        }

        tracing::debug!(rows = records.len(), "read cell table");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CsvError;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_read_with_header() {
        let data = "Cell,Formula,Value\nA1,\"SET.VALUE(B1,61)\",\nA2,\"FORMULA(CHAR(B1+B2),A9)\",x\n";
        let records = CellTableReader::read(data.as_bytes(), &CellTableOptions::default()).unwrap();
        assert_eq!(
            records,
            vec![
                CellRecord::new("A1", "SET.VALUE(B1,61)", ""),
                CellRecord::new("A2", "FORMULA(CHAR(B1+B2),A9)", "x"),
            ]
        );
    }

    #[test]
    fn test_read_drops_sheet_column() {
        let data = "Sheet,Cell,Formula,Value\nMacro1,R1C1,\"SET.VALUE(R1C2,7)\",\n";
        let records = CellTableReader::read(data.as_bytes(), &CellTableOptions::default()).unwrap();
        assert_eq!(records, vec![CellRecord::new("R1C1", "SET.VALUE(R1C2,7)", "")]);
    }

    #[test]
    fn test_read_without_header() {
        let options = CellTableOptions {
            has_header: false,
            delimiter: b';',
            ..Default::default()
        };
        let records = CellTableReader::read("A1;61;\n".as_bytes(), &options).unwrap();
        assert_eq!(records, vec![CellRecord::new("A1", "61", "")]);
    }

    #[test]
    fn test_read_bad_row() {
        let data = "Cell,Formula,Value\nA1,x,\nA2,y\n";
        let err = CellTableReader::read(data.as_bytes(), &CellTableOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            CsvError::Core(xlm_fill_core::Error::RowFormat { row: 3, fields: 2 })
        ));
    }

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Cell,Formula,Value\nB2,\"SET.VALUE(C1,1)\",\n").unwrap();
        let records = CellTableReader::read_file(file.path(), &CellTableOptions::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reference, "B2");
    }

    #[test]
    fn test_read_missing_file() {
        let err = CellTableReader::read_file("/nonexistent/cells.csv", &CellTableOptions::default())
            .unwrap_err();
        assert!(matches!(err, CsvError::Io(_)));
    }
}
