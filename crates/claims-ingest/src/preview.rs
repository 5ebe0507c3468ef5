use serde::Serialize;

use claims_standards::{SchemaRegistry, TargetField};

use crate::table::CsvTable;

/// Number of data rows shown in a file preview.
pub const PREVIEW_ROW_LIMIT: usize = 5;

/// What an operator sees before choosing a mapping. No records exist yet.
#[derive(Debug, Clone, Serialize)]
pub struct FilePreview {
    pub file_columns: Vec<String>,
    pub preview_rows: Vec<Vec<String>>,
    pub total_rows: usize,
    pub system_fields: Vec<TargetField>,
}

/// Build the preview of a parsed file.
pub fn build_preview(table: &CsvTable, registry: &SchemaRegistry) -> FilePreview {
    FilePreview {
        file_columns: table.headers.clone(),
        preview_rows: table.rows.iter().take(PREVIEW_ROW_LIMIT).cloned().collect(),
        total_rows: table.rows.len(),
        system_fields: registry.target_fields().to_vec(),
    }
}
