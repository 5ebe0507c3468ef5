//! Error types for import file ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an import before any record is created.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Import file not found.
    #[error("import file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("file {path} is too large ({size} bytes, limit {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Only `.csv` files are accepted.
    #[error("unsupported file type {path}: only CSV files are supported")]
    UnsupportedExtension { path: PathBuf },

    /// File starts with a byte-order mark of an unsupported encoding.
    #[error("unsupported encoding {encoding} in {path}: files must be UTF-8")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    /// Content is not valid UTF-8.
    #[error("file {path} is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },

    // === CSV Parsing Errors ===
    /// File does not have the minimum header + data row shape.
    #[error("{reason}")]
    Format { reason: String },

    /// The CSV reader rejected the content.
    #[error("failed to parse CSV {source_name}: {message}")]
    CsvParse {
        source_name: String,
        message: String,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
