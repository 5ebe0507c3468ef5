//! Import and persistence error types.

use std::path::PathBuf;
use thiserror::Error;

use claims_ingest::IngestError;
use claims_map::MappingError;

use crate::pipeline::ImportStage;

/// Failure of the persistence collaborator.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored value could not be read back.
    #[error("stored value for '{key}' is not valid JSON")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Keys become file names and may only contain ASCII letters, digits,
    /// `-` and `_`.
    #[error("invalid storage key: '{0}'")]
    InvalidKey(String),
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Failure of an import attempt as a whole.
///
/// Row-level problems are not errors; they are reported as
/// [`RowFailure`](crate::RowFailure)s in the outcome.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("cannot {operation} while the import is {stage}")]
    InvalidStage {
        operation: &'static str,
        stage: ImportStage,
    },
}

impl ImportError {
    /// Message shown to the operator.
    pub fn user_message(&self) -> String {
        match self {
            Self::Ingest(IngestError::Format { reason }) => reason.clone(),
            Self::Ingest(IngestError::Read { .. }) => "Failed to read file".to_string(),
            Self::Ingest(err) => err.to_string(),
            Self::Mapping(err) => err.to_string(),
            Self::Persistence(_) => "Failed to save imported claims".to_string(),
            Self::InvalidStage { .. } => self.to_string(),
        }
    }
}
