#![deny(unsafe_code)]

use claims_model::{ClaimRecord, FieldKey};

use crate::error::StandardsError;

const SEED_SOURCE: &str = "seed_claims.csv";
const SEED_CLAIMS_CSV: &str = include_str!("../data/seed_claims.csv");

/// Load the built-in claims that form the base of every record store.
pub fn load_seed_claims() -> Result<Vec<ClaimRecord>, StandardsError> {
    parse_claims_csv(SEED_CLAIMS_CSV, SEED_SOURCE)
}

/// Parse claims from CSV whose headers are field keys (`id`, `patientName`, ...).
///
/// Unknown headers are ignored. Every row must carry a non-empty `id`.
pub fn parse_claims_csv(text: &str, source_name: &str) -> Result<Vec<ClaimRecord>, StandardsError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| StandardsError::csv(source_name, e))?
        .clone();

    let columns: Vec<(usize, FieldKey)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, name)| name.parse::<FieldKey>().ok().map(|key| (idx, key)))
        .collect();
    if !columns.iter().any(|(_, key)| *key == FieldKey::Id) {
        return Err(StandardsError::csv(source_name, "missing id column"));
    }

    let mut records = Vec::new();
    for (row_idx, row) in reader.records().enumerate() {
        let row = row.map_err(|e| StandardsError::csv(source_name, e))?;
        let row_number = row_idx + 1;
        let mut record = ClaimRecord::default();
        for (idx, key) in &columns {
            let value = row.get(*idx).unwrap_or("");
            if value.trim().is_empty() && *key == FieldKey::Status {
                continue;
            }
            record
                .set_field(*key, value)
                .map_err(|e| StandardsError::InvalidRecord {
                    source_name: source_name.to_string(),
                    row: row_number,
                    message: e.to_string(),
                })?;
        }
        if record.id.is_empty() {
            return Err(StandardsError::InvalidRecord {
                source_name: source_name.to_string(),
                row: row_number,
                message: "missing id".to_string(),
            });
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims_model::ClaimStatus;

    #[test]
    fn seed_claims_load() {
        let claims = load_seed_claims().expect("seed claims");
        assert_eq!(claims.len(), 30);
        assert_eq!(claims[0].id, "CLM001");
        assert_eq!(claims[0].patient_name.as_deref(), Some("John Smith"));
        assert_eq!(claims[0].diag3, None);
        assert_eq!(claims[0].total_amount, Some(1250.0));
        assert_eq!(claims[5].provider.as_deref(), Some("Women's Hospital"));
        let approved = claims
            .iter()
            .filter(|c| c.status == ClaimStatus::Approved)
            .count();
        assert_eq!(approved, 11);
    }

    #[test]
    fn rows_without_id_are_rejected() {
        let err = parse_claims_csv("id,patientName\n,Bob\n", "inline").unwrap_err();
        assert!(matches!(err, StandardsError::InvalidRecord { row: 1, .. }));
    }
}
