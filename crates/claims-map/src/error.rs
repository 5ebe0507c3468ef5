//! Error types for mapping operations.

use std::fmt;

use claims_model::FieldKey;

/// Errors from mapping operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// Source column not present in the file headers.
    UnknownSourceColumn(String),
    /// Name does not resolve to an import target field.
    UnknownTarget(String),
    /// Target field already mapped from another source column.
    TargetAlreadyMapped {
        target: FieldKey,
        existing_source: String,
        source: String,
    },
    /// Mapping text is not of the form `source=target`.
    InvalidPair(String),
    /// No source column is mapped.
    NothingMapped,
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSourceColumn(c) => write!(f, "Column not found in file: {c}"),
            Self::UnknownTarget(t) => write!(f, "Unknown target field: {t}"),
            Self::TargetAlreadyMapped {
                target,
                existing_source,
                source,
            } => write!(
                f,
                "Cannot map '{source}' to '{target}': already mapped from '{existing_source}'"
            ),
            Self::InvalidPair(raw) => {
                write!(f, "Invalid mapping '{raw}' (expected SOURCE=TARGET)")
            }
            Self::NothingMapped => write!(f, "No columns are mapped"),
        }
    }
}

impl std::error::Error for MappingError {}
