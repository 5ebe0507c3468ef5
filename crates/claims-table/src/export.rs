//! Delimited export of table rows.
//!
//! Headers are the titles of the given columns, in the given order. Values
//! are written in their plain form: amounts without currency formatting,
//! dates as stored. Fields containing the delimiter, quotes or line breaks
//! are quoted, and the CSV import reads them back unchanged.

use std::fmt;
use std::str::FromStr;

use csv::{QuoteStyle, WriterBuilder};
use tracing::debug;

use claims_model::ClaimRecord;
use claims_standards::ColumnDef;

use crate::error::{Result, TableError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    /// Tab-separated text that spreadsheet applications open directly.
    Tsv,
}

impl ExportFormat {
    pub fn delimiter(self) -> u8 {
        match self {
            ExportFormat::Csv => b',',
            ExportFormat::Tsv => b'\t',
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" | "tab" | "excel" => Ok(ExportFormat::Tsv),
            _ => Err(TableError::UnknownExportFormat(s.to_string())),
        }
    }
}

/// Render `records` as delimited text using `columns`.
pub fn export_delimited(
    records: &[&ClaimRecord],
    columns: &[&ColumnDef],
    format: ExportFormat,
) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(format.delimiter())
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|column| column.title.as_str()))?;
    for record in records {
        writer.write_record(columns.iter().map(|column| {
            record
                .field(column.key)
                .map(|value| value.to_string())
                .unwrap_or_default()
        }))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TableError::Io(e.into_error()))?;
    debug!(
        format = %format,
        rows = records.len(),
        columns = columns.len(),
        "exported table"
    );
    String::from_utf8(bytes).map_err(|_| TableError::InvalidUtf8)
}
