//! Field identifiers and dynamically typed field values.
//!
//! Every column the table can show and every target an import can map onto
//! is addressed by a [`FieldKey`]. Filters and sorting read fields through
//! [`FieldValue`] so they can stay generic over the record layout.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Key of a claim field.
///
/// The string form (`as_str`) is the camelCase key used by persisted records,
/// mapping files and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    Id,
    PatientId,
    PatientName,
    Status,
    SubmissionDate,
    TotalAmount,
    Diag1,
    Diag2,
    Diag3,
    Udf1,
    Udf2,
    Udf3,
    Provider,
    InsuranceType,
    LastUpdated,
    Age,
    Gender,
    Department,
}

impl FieldKey {
    /// All keys in record declaration order.
    pub const ALL: [FieldKey; 18] = [
        FieldKey::Id,
        FieldKey::PatientId,
        FieldKey::PatientName,
        FieldKey::Status,
        FieldKey::SubmissionDate,
        FieldKey::TotalAmount,
        FieldKey::Diag1,
        FieldKey::Diag2,
        FieldKey::Diag3,
        FieldKey::Udf1,
        FieldKey::Udf2,
        FieldKey::Udf3,
        FieldKey::Provider,
        FieldKey::InsuranceType,
        FieldKey::LastUpdated,
        FieldKey::Age,
        FieldKey::Gender,
        FieldKey::Department,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Id => "id",
            FieldKey::PatientId => "patientId",
            FieldKey::PatientName => "patientName",
            FieldKey::Status => "status",
            FieldKey::SubmissionDate => "submissionDate",
            FieldKey::TotalAmount => "totalAmount",
            FieldKey::Diag1 => "diag1",
            FieldKey::Diag2 => "diag2",
            FieldKey::Diag3 => "diag3",
            FieldKey::Udf1 => "udf1",
            FieldKey::Udf2 => "udf2",
            FieldKey::Udf3 => "udf3",
            FieldKey::Provider => "provider",
            FieldKey::InsuranceType => "insuranceType",
            FieldKey::LastUpdated => "lastUpdated",
            FieldKey::Age => "age",
            FieldKey::Gender => "gender",
            FieldKey::Department => "department",
        }
    }

    /// Returns true for fields stored as numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKey::TotalAmount | FieldKey::Age)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = ModelError;

    /// Parse a field key, ignoring ASCII case (`patientid` == `patientId`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        FieldKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}

/// A present (non-null) field value.
///
/// Absent values are modelled as `Option::None` by the accessors.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// Numeric view of the value. Text is parsed; non-finite results are rejected.
    pub fn as_f64(&self) -> Option<f64> {
        let number = match self {
            FieldValue::Number(value) => *value,
            FieldValue::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        number.is_finite().then_some(number)
    }

    /// Total ordering used for sorting: numbers before text, numbers by value,
    /// text by byte order.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Number(_), FieldValue::Text(_)) => Ordering::Less,
            (FieldValue::Text(_), FieldValue::Number(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Number(value) => f.write_str(&format_numeric(*value)),
        }
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use claims_model::format_numeric;
///
/// assert_eq!(format_numeric(1250.0), "1250");
/// assert_eq!(format_numeric(850.75), "850.75");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
