//! Claim records and claim status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};
use crate::field::{FieldKey, FieldValue};

/// Processing status of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClaimStatus {
    #[default]
    #[serde(rename = "Pending Review")]
    PendingReview,
    #[serde(rename = "Approved")]
    Approved,
    #[serde(rename = "Denied")]
    Denied,
    #[serde(rename = "In Progress")]
    InProgress,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 4] = [
        ClaimStatus::PendingReview,
        ClaimStatus::Approved,
        ClaimStatus::Denied,
        ClaimStatus::InProgress,
    ];

    /// Returns the display label, which is also the raw value used by filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::PendingReview => "Pending Review",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Denied => "Denied",
            ClaimStatus::InProgress => "In Progress",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ModelError;

    /// Accepts the display label or an identifier form, ignoring case,
    /// spaces, hyphens and underscores (`"pending_review"`, `"PendingReview"`).
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, ' ' | '_' | '-'))
            .collect::<String>()
            .to_uppercase();
        match normalized.as_str() {
            "PENDINGREVIEW" | "PENDING" => Ok(ClaimStatus::PendingReview),
            "APPROVED" => Ok(ClaimStatus::Approved),
            "DENIED" => Ok(ClaimStatus::Denied),
            "INPROGRESS" => Ok(ClaimStatus::InProgress),
            _ => Err(ModelError::InvalidStatus(s.to_string())),
        }
    }
}

/// One insurance claim.
///
/// Records are never edited after they enter the record store; a change is
/// expressed by building a new record with the same `id`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    pub id: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub status: ClaimStatus,
    #[serde(default)]
    pub submission_date: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub diag1: Option<String>,
    #[serde(default)]
    pub diag2: Option<String>,
    #[serde(default)]
    pub diag3: Option<String>,
    #[serde(default)]
    pub udf1: Option<String>,
    #[serde(default)]
    pub udf2: Option<String>,
    #[serde(default)]
    pub udf3: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub insurance_type: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

impl ClaimRecord {
    /// New record with the given id, status `Pending Review` and no other data.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Read a field by key. Returns `None` for absent values.
    pub fn field(&self, key: FieldKey) -> Option<FieldValue> {
        let text = |value: &Option<String>| value.clone().map(FieldValue::Text);
        match key {
            FieldKey::Id => Some(FieldValue::Text(self.id.clone())),
            FieldKey::PatientId => text(&self.patient_id),
            FieldKey::PatientName => text(&self.patient_name),
            FieldKey::Status => Some(FieldValue::Text(self.status.as_str().to_string())),
            FieldKey::SubmissionDate => text(&self.submission_date),
            FieldKey::TotalAmount => self.total_amount.map(FieldValue::Number),
            FieldKey::Diag1 => text(&self.diag1),
            FieldKey::Diag2 => text(&self.diag2),
            FieldKey::Diag3 => text(&self.diag3),
            FieldKey::Udf1 => text(&self.udf1),
            FieldKey::Udf2 => text(&self.udf2),
            FieldKey::Udf3 => text(&self.udf3),
            FieldKey::Provider => text(&self.provider),
            FieldKey::InsuranceType => text(&self.insurance_type),
            FieldKey::LastUpdated => text(&self.last_updated),
            FieldKey::Age => self.age.map(|age| FieldValue::Number(f64::from(age))),
            FieldKey::Gender => text(&self.gender),
            FieldKey::Department => text(&self.department),
        }
    }

    /// Returns true when the field holds a non-blank value.
    pub fn has_value(&self, key: FieldKey) -> bool {
        match self.field(key) {
            Some(FieldValue::Text(text)) => !text.trim().is_empty(),
            Some(FieldValue::Number(_)) => true,
            None => false,
        }
    }

    /// Set a field from its raw text form.
    ///
    /// Blank input clears optional fields. Numeric fields must parse; the
    /// amount must not be negative and the age must be a whole number.
    pub fn set_field(&mut self, key: FieldKey, raw: &str) -> Result<()> {
        let trimmed = raw.trim();
        let text = || (!trimmed.is_empty()).then(|| trimmed.to_string());
        match key {
            FieldKey::Id => self.id = trimmed.to_string(),
            FieldKey::PatientId => self.patient_id = text(),
            FieldKey::PatientName => self.patient_name = text(),
            FieldKey::Status => self.status = trimmed.parse()?,
            FieldKey::SubmissionDate => self.submission_date = text(),
            FieldKey::TotalAmount => self.total_amount = parse_amount(trimmed)?,
            FieldKey::Diag1 => self.diag1 = text(),
            FieldKey::Diag2 => self.diag2 = text(),
            FieldKey::Diag3 => self.diag3 = text(),
            FieldKey::Udf1 => self.udf1 = text(),
            FieldKey::Udf2 => self.udf2 = text(),
            FieldKey::Udf3 => self.udf3 = text(),
            FieldKey::Provider => self.provider = text(),
            FieldKey::InsuranceType => self.insurance_type = text(),
            FieldKey::LastUpdated => self.last_updated = text(),
            FieldKey::Age => self.age = parse_age(trimmed)?,
            FieldKey::Gender => self.gender = text(),
            FieldKey::Department => self.department = text(),
        }
        Ok(())
    }
}

fn parse_amount(raw: &str) -> Result<Option<f64>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let value = raw
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ModelError::InvalidNumber {
            field: FieldKey::TotalAmount,
            value: raw.to_string(),
        })?;
    if value < 0.0 {
        return Err(ModelError::NegativeAmount(value));
    }
    Ok(Some(value))
}

fn parse_age(raw: &str) -> Result<Option<u32>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let invalid = || ModelError::InvalidNumber {
        field: FieldKey::Age,
        value: raw.to_string(),
    };
    if let Ok(age) = raw.parse::<u32>() {
        return Ok(Some(age));
    }
    // Spreadsheets often export whole numbers as "65.0".
    let value = raw.parse::<f64>().map_err(|_| invalid())?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Ok(Some(value as u32))
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_labels_and_identifiers() {
        assert_eq!("Pending Review".parse::<ClaimStatus>().unwrap(), ClaimStatus::PendingReview);
        assert_eq!("pending_review".parse::<ClaimStatus>().unwrap(), ClaimStatus::PendingReview);
        assert_eq!("InProgress".parse::<ClaimStatus>().unwrap(), ClaimStatus::InProgress);
        assert_eq!("approved".parse::<ClaimStatus>().unwrap(), ClaimStatus::Approved);
        assert!("Closed".parse::<ClaimStatus>().is_err());
    }

    #[test]
    fn set_field_parses_numbers() {
        let mut record = ClaimRecord::new("C1");
        record.set_field(FieldKey::TotalAmount, "1250.00").unwrap();
        record.set_field(FieldKey::Age, "65.0").unwrap();
        assert_eq!(record.total_amount, Some(1250.0));
        assert_eq!(record.age, Some(65));
    }

    #[test]
    fn set_field_rejects_bad_numbers() {
        let mut record = ClaimRecord::new("C1");
        assert!(matches!(
            record.set_field(FieldKey::TotalAmount, "-5"),
            Err(ModelError::NegativeAmount(_))
        ));
        assert!(matches!(
            record.set_field(FieldKey::TotalAmount, "ten"),
            Err(ModelError::InvalidNumber { .. })
        ));
        assert!(record.set_field(FieldKey::Age, "41.5").is_err());
        assert_eq!(record.total_amount, None);
    }

    #[test]
    fn blank_input_clears_optional_fields() {
        let mut record = ClaimRecord::new("C1");
        record.set_field(FieldKey::Diag1, "Z51.11").unwrap();
        assert!(record.has_value(FieldKey::Diag1));
        record.set_field(FieldKey::Diag1, "   ").unwrap();
        assert_eq!(record.field(FieldKey::Diag1), None);
    }

    #[test]
    fn status_field_reads_display_label() {
        let record = ClaimRecord::new("C1");
        assert_eq!(
            record.field(FieldKey::Status),
            Some(FieldValue::Text("Pending Review".to_string()))
        );
    }
}
