#![deny(unsafe_code)]

use claims_model::FieldKey;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("column key {key} is defined more than once (groups {first_group} and {second_group})")]
    DuplicateColumnKey {
        key: FieldKey,
        first_group: String,
        second_group: String,
    },

    #[error("duplicate column group id: {id}")]
    DuplicateGroup { id: String },

    #[error("default column {key} of group {group} is not one of its columns")]
    DefaultColumnMissing { group: String, key: FieldKey },

    #[error("target field {key} is defined more than once")]
    DuplicateTargetField { key: FieldKey },

    #[error("failed to parse CSV {source_name}: {message}")]
    Csv {
        source_name: String,
        message: String,
    },

    #[error("invalid value in {source_name} row {row}: {message}")]
    InvalidRecord {
        source_name: String,
        row: usize,
        message: String,
    },
}

impl StandardsError {
    pub(crate) fn csv(source_name: &str, error: impl std::fmt::Display) -> Self {
        Self::Csv {
            source_name: source_name.to_string(),
            message: error.to_string(),
        }
    }
}
