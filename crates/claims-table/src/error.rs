use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("unknown export format: {0} (expected csv or tsv)")]
    UnknownExportFormat(String),

    #[error("failed to write delimited output: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush delimited output: {0}")]
    Io(#[from] std::io::Error),

    #[error("exported text is not valid UTF-8")]
    InvalidUtf8,
}

pub type Result<T> = std::result::Result<T, TableError>;
