use std::collections::HashSet;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Message of the format error raised for files without data rows.
pub const TOO_SHORT_MESSAGE: &str = "File must contain at least a header row and one data row";

/// Parsed delimited text: one header row and the data rows below it.
///
/// Every row has exactly `headers.len()` cells; short rows are padded with
/// empty strings and extra cells are dropped. Non-empty headers are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Index of the header equal to `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Cell of `row` under header `name`.
    pub fn value<'a>(&'a self, row: &'a [String], name: &str) -> Option<&'a str> {
        self.column_index(name)
            .and_then(|idx| row.get(idx))
            .map(String::as_str)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().to_string()
}

/// A physical line that is empty or only whitespace.
fn is_blank_line(record: &StringRecord) -> bool {
    record.len() == 1 && record.iter().all(|value| value.trim().is_empty())
}

/// Parse comma-delimited text.
///
/// Fields may be double-quoted (RFC 4180); quoted fields can contain commas,
/// line breaks and doubled quotes. Blank lines are skipped, but a line of
/// empty cells (`,,`) is a data row. Fails with [`IngestError::Format`]
/// unless a header row and at least one data row remain, or when a header
/// name repeats.
pub fn parse_csv_text(text: &str, source_name: &str) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;
        if is_blank_line(&record) {
            continue;
        }
        raw_rows.push(record.iter().map(normalize_cell).collect());
    }

    if raw_rows.len() < 2 {
        return Err(IngestError::Format {
            reason: TOO_SHORT_MESSAGE.to_string(),
        });
    }

    let mut raw_rows = raw_rows.into_iter();
    let headers: Vec<String> = raw_rows
        .next()
        .map(|row| row.iter().map(|value| normalize_header(value)).collect())
        .unwrap_or_default();
    let mut seen = HashSet::new();
    if let Some(duplicate) = headers
        .iter()
        .filter(|header| !header.is_empty())
        .find(|header| !seen.insert(header.as_str()))
    {
        return Err(IngestError::Format {
            reason: format!("Duplicate column header: {duplicate}"),
        });
    }

    let rows: Vec<Vec<String>> = raw_rows
        .map(|mut row| {
            row.resize(headers.len(), String::new());
            row
        })
        .collect();

    debug!(
        source = source_name,
        columns = headers.len(),
        rows = rows.len(),
        "parsed CSV"
    );
    Ok(CsvTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let table = parse_csv_text("id,name\nC1,Alice\nC2,Bob", "t.csv").unwrap();
        assert_eq!(table.headers, vec!["id", "name"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.value(&table.rows[1], "name"), Some("Bob"));
    }

    #[test]
    fn header_only_is_a_format_error() {
        let err = parse_csv_text("id,name\n\n   \n", "t.csv").unwrap_err();
        assert!(matches!(err, IngestError::Format { .. }));
        assert!(matches!(
            parse_csv_text("", "t.csv"),
            Err(IngestError::Format { .. })
        ));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let table = parse_csv_text("\nid,name\n\nC1,Alice\n   \nC2,Bob\n", "t.csv").unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn comma_only_lines_are_data_rows() {
        let table = parse_csv_text("id,name\nC1,Alice\n,\n , \n", "t.csv").unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows[1], vec!["", ""]);

        let table = parse_csv_text("id,name\n,\n", "t.csv").unwrap();
        assert_eq!(table.rows, vec![vec!["", ""]]);
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let table = parse_csv_text(
            "id,provider\nC1,\"Smith, Jones & Co\"\nC2,\"Say \"\"hi\"\"\"\n",
            "t.csv",
        )
        .unwrap();
        assert_eq!(table.rows[0][1], "Smith, Jones & Co");
        assert_eq!(table.rows[1][1], "Say \"hi\"");
    }

    #[test]
    fn ragged_rows_are_normalized() {
        let table = parse_csv_text("a,b,c\n1\n1,2,3,4\n", "t.csv").unwrap();
        assert_eq!(table.rows[0], vec!["1", "", ""]);
        assert_eq!(table.rows[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn headers_are_trimmed() {
        let table = parse_csv_text("\u{feff} Claim   ID ,x\nC1,1\n", "t.csv").unwrap();
        assert_eq!(table.headers[0], "Claim ID");
        assert_eq!(table.value(&table.rows[0], "x"), Some("1"));
    }

    #[test]
    fn repeated_headers_are_rejected() {
        let err = parse_csv_text("id,x, x \nC1,1,2\n", "t.csv").unwrap_err();
        match err {
            IngestError::Format { reason } => assert_eq!(reason, "Duplicate column header: x"),
            other => panic!("unexpected error: {other:?}"),
        }

        // Trailing empty headers are not names.
        let table = parse_csv_text("id,name,,\nC1,Ada,,\n", "t.csv").unwrap();
        assert_eq!(table.headers.len(), 4);
    }
}
