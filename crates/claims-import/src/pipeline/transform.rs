//! Row transform and validation.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use claims_ingest::CsvTable;
use claims_map::ImportMapping;
use claims_model::{ClaimRecord, FieldKey};
use claims_standards::SchemaRegistry;

/// Prefix of generated claim ids.
pub const GENERATED_ID_PREFIX: &str = "CLM";

const GENERATED_ID_MODULUS: u64 = 1_000_000;

/// Which required fields a row must fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequiredFieldPolicy {
    /// Required fields that the mapping feeds. A required field left
    /// unmapped is reported by the mapping summary instead.
    #[default]
    Mapped,
    /// Every required field of the registry.
    All,
}

impl RequiredFieldPolicy {
    /// Required fields checked on each row.
    pub fn fields(&self, mapping: &ImportMapping, registry: &SchemaRegistry) -> Vec<FieldKey> {
        let required = registry.required_fields();
        match self {
            RequiredFieldPolicy::All => required,
            RequiredFieldPolicy::Mapped => required
                .into_iter()
                .filter(|key| *key == FieldKey::Id || mapping.is_target_used(*key))
                .collect(),
        }
    }
}

/// Why a data row was not committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowIssue {
    /// Required fields without a value.
    MissingRequired { fields: Vec<FieldKey> },
    /// A mapped cell could not be read as its field type.
    InvalidValue { field: FieldKey, message: String },
    /// The id already exists in the record store or earlier in the file.
    DuplicateId { id: String },
}

impl RowIssue {
    pub fn kind(&self) -> &'static str {
        match self {
            RowIssue::MissingRequired { .. } => "missing_required",
            RowIssue::InvalidValue { .. } => "invalid_value",
            RowIssue::DuplicateId { .. } => "duplicate_id",
        }
    }
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowIssue::MissingRequired { fields } => {
                let names: Vec<&str> = fields.iter().map(FieldKey::as_str).collect();
                write!(f, "missing required fields: {}", names.join(", "))
            }
            RowIssue::InvalidValue { message, .. } => f.write_str(message),
            RowIssue::DuplicateId { id } => write!(f, "claim id {id} already exists"),
        }
    }
}

/// A rejected row. `row` is the 1-based data row number (the header is row 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    pub row: usize,
    pub issue: RowIssue,
}

/// Records ready to commit plus the rows that were rejected.
#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub records: Vec<ClaimRecord>,
    pub failures: Vec<RowFailure>,
}

impl TransformResult {
    pub fn total(&self) -> usize {
        self.records.len() + self.failures.len()
    }
}

/// Turn every data row into a claim record.
///
/// For each mapped pair the cell under the source header is written into the
/// target field. Unmapped columns are ignored. Missing ids are generated,
/// missing statuses stay `Pending Review` and `lastUpdated` is set to the
/// date of `now`. `id_taken` reports ids already present in the store.
pub fn transform_rows(
    table: &CsvTable,
    mapping: &ImportMapping,
    registry: &SchemaRegistry,
    policy: RequiredFieldPolicy,
    id_taken: impl Fn(&str) -> bool,
    now: DateTime<Utc>,
) -> TransformResult {
    let columns: Vec<(usize, FieldKey)> = mapping
        .iter()
        .filter_map(|(source, target)| table.column_index(source).map(|idx| (idx, target)))
        .collect();
    let required = policy.fields(mapping, registry);
    let last_updated = now.date_naive().format("%Y-%m-%d").to_string();

    let mut result = TransformResult::default();
    let mut batch_ids: HashSet<String> = HashSet::new();

    for (index, row) in table.rows.iter().enumerate() {
        let row_number = index + 1;
        let outcome = build_record(row, &columns).and_then(|mut record| {
            if record.id.is_empty() {
                record.id = generate_id(now.timestamp_millis(), index, |id| {
                    id_taken(id) || batch_ids.contains(id)
                });
            } else if id_taken(&record.id) || batch_ids.contains(&record.id) {
                return Err(RowIssue::DuplicateId { id: record.id });
            }
            record.last_updated = Some(last_updated.clone());

            let missing: Vec<FieldKey> = required
                .iter()
                .copied()
                .filter(|key| !record.has_value(*key))
                .collect();
            if missing.is_empty() {
                Ok(record)
            } else {
                Err(RowIssue::MissingRequired { fields: missing })
            }
        });

        match outcome {
            Ok(record) => {
                batch_ids.insert(record.id.clone());
                result.records.push(record);
            }
            Err(issue) => {
                tracing::debug!(row = row_number, issue = issue.kind(), "row rejected");
                result.failures.push(RowFailure {
                    row: row_number,
                    issue,
                });
            }
        }
    }
    result
}

fn build_record(row: &[String], columns: &[(usize, FieldKey)]) -> Result<ClaimRecord, RowIssue> {
    let mut record = ClaimRecord::default();
    for &(idx, target) in columns {
        let cell = row.get(idx).map_or("", String::as_str);
        // A blank status keeps the default.
        if target == FieldKey::Status && cell.trim().is_empty() {
            continue;
        }
        record
            .set_field(target, cell)
            .map_err(|e| RowIssue::InvalidValue {
                field: target,
                message: e.to_string(),
            })?;
    }
    Ok(record)
}

/// `CLM` followed by the last six digits of `now_millis + index`, advanced
/// until the id is free.
pub fn generate_id(now_millis: i64, index: usize, taken: impl Fn(&str) -> bool) -> String {
    let start = now_millis.unsigned_abs().wrapping_add(index as u64);
    for step in 0..GENERATED_ID_MODULUS {
        let suffix = start.wrapping_add(step) % GENERATED_ID_MODULUS;
        let id = format!("{GENERATED_ID_PREFIX}{suffix:06}");
        if !taken(&id) {
            return id;
        }
    }
    // Every six-digit id is in use.
    let mut n = start;
    loop {
        let id = format!("{GENERATED_ID_PREFIX}{n}");
        if !taken(&id) {
            return id;
        }
        n = n.wrapping_add(1);
    }
}
