#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use claims_model::FieldKey;

use crate::error::StandardsError;
use crate::target::{TargetField, claim_target_fields};

/// Groups shown expanded when a table is first opened.
pub const DEFAULT_EXPANDED_GROUPS: &[&str] = &["patient_info", "claim_status"];

/// Display type tag of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Currency,
    Date,
    Status,
    Diagnosis,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Currency => "currency",
            ColumnType::Date => "date",
            ColumnType::Status => "status",
            ColumnType::Diagnosis => "diagnosis",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub key: FieldKey,
    pub title: String,
    pub column_type: ColumnType,
    pub width: u16,
}

impl ColumnDef {
    pub fn new(key: FieldKey, title: &str, column_type: ColumnType, width: u16) -> Self {
        Self {
            key,
            title: title.to_string(),
            column_type,
            width,
        }
    }
}

/// Related columns that expand and collapse together.
///
/// A collapsed group shows only its `default_column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnGroup {
    pub id: String,
    pub title: String,
    pub default_column: FieldKey,
    pub columns: Vec<ColumnDef>,
}

impl ColumnGroup {
    pub fn new(id: &str, title: &str, default_column: FieldKey, columns: Vec<ColumnDef>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            default_column,
            columns,
        }
    }

    pub fn default_column_def(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.key == self.default_column)
    }
}

/// Read-only registry of column groups and import target fields.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    groups: Vec<ColumnGroup>,
    columns_by_key: BTreeMap<FieldKey, ColumnDef>,
    target_fields: Vec<TargetField>,
}

impl SchemaRegistry {
    /// Build a registry, checking that column keys and group ids are unique
    /// and that every group's default column belongs to the group.
    pub fn new(
        groups: Vec<ColumnGroup>,
        target_fields: Vec<TargetField>,
    ) -> Result<Self, StandardsError> {
        let mut columns_by_key = BTreeMap::new();
        let mut owner_by_key: BTreeMap<FieldKey, &str> = BTreeMap::new();
        let mut group_ids: Vec<&str> = Vec::new();

        for group in &groups {
            if group_ids.contains(&group.id.as_str()) {
                return Err(StandardsError::DuplicateGroup {
                    id: group.id.clone(),
                });
            }
            group_ids.push(&group.id);

            if group.default_column_def().is_none() {
                return Err(StandardsError::DefaultColumnMissing {
                    group: group.id.clone(),
                    key: group.default_column,
                });
            }

            for column in &group.columns {
                if let Some(first) = owner_by_key.insert(column.key, &group.id) {
                    return Err(StandardsError::DuplicateColumnKey {
                        key: column.key,
                        first_group: first.to_string(),
                        second_group: group.id.clone(),
                    });
                }
                columns_by_key.insert(column.key, column.clone());
            }
        }

        let mut seen_targets = Vec::with_capacity(target_fields.len());
        for field in &target_fields {
            if seen_targets.contains(&field.key) {
                return Err(StandardsError::DuplicateTargetField { key: field.key });
            }
            seen_targets.push(field.key);
        }

        Ok(Self {
            groups,
            columns_by_key,
            target_fields,
        })
    }

    /// Column groups in display order.
    pub fn groups(&self) -> &[ColumnGroup] {
        &self.groups
    }

    pub fn group(&self, id: &str) -> Option<&ColumnGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Flattened key → column map (includes columns of collapsed groups).
    pub fn columns_by_key(&self) -> &BTreeMap<FieldKey, ColumnDef> {
        &self.columns_by_key
    }

    pub fn column(&self, key: FieldKey) -> Option<&ColumnDef> {
        self.columns_by_key.get(&key)
    }

    /// All columns in group order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.groups.iter().flat_map(|g| g.columns.iter())
    }

    pub fn target_fields(&self) -> &[TargetField] {
        &self.target_fields
    }

    pub fn target_field(&self, key: FieldKey) -> Option<&TargetField> {
        self.target_fields.iter().find(|f| f.key == key)
    }

    /// Keys of target fields flagged `required`.
    pub fn required_fields(&self) -> Vec<FieldKey> {
        self.target_fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.key)
            .collect()
    }

    /// Resolve a header or user-typed name to a target field.
    ///
    /// Matches the field key, the target label or the column title,
    /// ignoring case and surrounding/repeated whitespace.
    pub fn resolve_field_name(&self, name: &str) -> Option<FieldKey> {
        let wanted = normalize_name(name);
        if wanted.is_empty() {
            return None;
        }
        self.target_fields
            .iter()
            .find(|f| {
                normalize_name(f.key.as_str()) == wanted || normalize_name(&f.label) == wanted
            })
            .map(|f| f.key)
            .or_else(|| {
                self.columns()
                    .find(|c| normalize_name(&c.title) == wanted)
                    .map(|c| c.key)
                    .filter(|key| self.target_field(*key).is_some())
            })
    }
}

fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Build the claims registry.
pub fn claims_registry() -> Result<SchemaRegistry, StandardsError> {
    use ColumnType::{Currency, Date, Diagnosis, Number, Status, Text};

    let groups = vec![
        ColumnGroup::new(
            "patient_info",
            "Patient Information",
            FieldKey::PatientId,
            vec![
                ColumnDef::new(FieldKey::PatientId, "Patient ID", Text, 120),
                ColumnDef::new(FieldKey::PatientName, "Patient Name", Text, 180),
                ColumnDef::new(FieldKey::Age, "Age", Number, 80),
                ColumnDef::new(FieldKey::Gender, "Gender", Text, 100),
                ColumnDef::new(FieldKey::InsuranceType, "Insurance", Text, 120),
            ],
        ),
        ColumnGroup::new(
            "claim_status",
            "Claim Information",
            FieldKey::Id,
            vec![
                ColumnDef::new(FieldKey::Id, "Claim ID", Text, 120),
                ColumnDef::new(FieldKey::Status, "Status", Status, 150),
                ColumnDef::new(FieldKey::SubmissionDate, "Submitted", Date, 120),
                ColumnDef::new(FieldKey::LastUpdated, "Last Updated", Date, 120),
                ColumnDef::new(FieldKey::Department, "Department", Text, 120),
            ],
        ),
        ColumnGroup::new(
            "diagnosis_codes",
            "Diagnosis Codes",
            FieldKey::Diag1,
            vec![
                ColumnDef::new(FieldKey::Diag1, "Primary Diagnosis", Diagnosis, 140),
                ColumnDef::new(FieldKey::Diag2, "Secondary Diagnosis", Diagnosis, 140),
                ColumnDef::new(FieldKey::Diag3, "Tertiary Diagnosis", Diagnosis, 140),
            ],
        ),
        ColumnGroup::new(
            "user_fields",
            "User Defined Fields",
            FieldKey::Udf1,
            vec![
                ColumnDef::new(FieldKey::Udf1, "Priority Level", Text, 120),
                ColumnDef::new(FieldKey::Udf2, "Specialty", Text, 120),
                ColumnDef::new(FieldKey::Udf3, "Assigned Doctor", Text, 140),
            ],
        ),
        ColumnGroup::new(
            "financial",
            "Financial Information",
            FieldKey::TotalAmount,
            vec![
                ColumnDef::new(FieldKey::TotalAmount, "Total Amount", Currency, 130),
                ColumnDef::new(FieldKey::Provider, "Provider", Text, 200),
            ],
        ),
    ];

    SchemaRegistry::new(groups, claim_target_fields())
}
