//! Claim import file ingestion.
//!
//! Turns an operator-selected file into a [`CsvTable`] and a [`FilePreview`]:
//!
//! - **File checks**: `.csv` extension, size limit, UTF-8 only (UTF-16 BOMs rejected)
//! - **Parsing**: RFC 4180 CSV with trimmed cells and blank lines skipped
//! - **Preview**: headers, the first rows and the import target fields

mod error;
mod preview;
mod reader;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === File Reading ===
pub use reader::{
    DEFAULT_MAX_FILE_BYTES, ImportSource, ReadOptions, check_extension,
    check_file_size_with_limit, read_import_file,
};

// === CSV Parsing ===
pub use table::{CsvTable, TOO_SHORT_MESSAGE, parse_csv_text};

// === Preview ===
pub use preview::{FilePreview, PREVIEW_ROW_LIMIT, build_preview};
