//! Canonical import target fields.
//!
//! These are the fields an operator can map source columns onto. `lastUpdated`
//! is intentionally absent: the import pipeline stamps it at commit time.

use serde::Serialize;
use std::fmt;

use claims_model::FieldKey;

/// Input kind of a target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFieldType {
    Text,
    Select,
    Date,
    Number,
}

impl TargetFieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetFieldType::Text => "text",
            TargetFieldType::Select => "select",
            TargetFieldType::Date => "date",
            TargetFieldType::Number => "number",
        }
    }
}

impl fmt::Display for TargetFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetField {
    pub key: FieldKey,
    pub label: String,
    pub required: bool,
    pub field_type: TargetFieldType,
    /// Allowed values for `select` fields; empty otherwise.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl TargetField {
    fn new(key: FieldKey, label: &str, required: bool, field_type: TargetFieldType) -> Self {
        Self {
            key,
            label: label.to_string(),
            required,
            field_type,
            options: Vec::new(),
        }
    }

    fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|option| (*option).to_string()).collect();
        self
    }
}

/// The claim import schema, in presentation order.
pub fn claim_target_fields() -> Vec<TargetField> {
    use TargetFieldType::{Date, Number, Select, Text};

    vec![
        TargetField::new(FieldKey::Id, "Claim ID", true, Text),
        TargetField::new(FieldKey::PatientId, "Patient ID", true, Text),
        TargetField::new(FieldKey::PatientName, "Patient Name", true, Text),
        TargetField::new(FieldKey::Status, "Status", false, Select).with_options(&[
            "Pending Review",
            "Approved",
            "Denied",
            "In Progress",
        ]),
        TargetField::new(FieldKey::SubmissionDate, "Submission Date", true, Date),
        TargetField::new(FieldKey::TotalAmount, "Total Amount", true, Number),
        TargetField::new(FieldKey::Diag1, "Primary Diagnosis", false, Text),
        TargetField::new(FieldKey::Diag2, "Secondary Diagnosis", false, Text),
        TargetField::new(FieldKey::Diag3, "Tertiary Diagnosis", false, Text),
        TargetField::new(FieldKey::Udf1, "Priority Level", false, Text),
        TargetField::new(FieldKey::Udf2, "Specialty", false, Text),
        TargetField::new(FieldKey::Udf3, "Assigned Doctor", false, Text),
        TargetField::new(FieldKey::Provider, "Provider", false, Text),
        TargetField::new(FieldKey::InsuranceType, "Insurance Type", false, Select)
            .with_options(&["Medicare", "Medicaid", "Private"]),
        TargetField::new(FieldKey::Age, "Age", false, Number),
        TargetField::new(FieldKey::Gender, "Gender", false, Select)
            .with_options(&["Male", "Female", "Other"]),
        TargetField::new(FieldKey::Department, "Department", false, Text),
    ]
}
