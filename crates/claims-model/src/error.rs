use thiserror::Error;

use crate::field::FieldKey;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("unknown field key: {0}")]
    UnknownField(String),
    #[error("invalid claim status: {0}")]
    InvalidStatus(String),
    #[error("invalid number for {field}: {value}")]
    InvalidNumber { field: FieldKey, value: String },
    #[error("total amount must not be negative: {0}")]
    NegativeAmount(f64),
}

pub type Result<T> = std::result::Result<T, ModelError>;
