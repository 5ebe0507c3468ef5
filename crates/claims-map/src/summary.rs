use serde::Serialize;

use claims_model::FieldKey;
use claims_standards::SchemaRegistry;

use crate::mapping::ImportMapping;

/// Summary of mapping counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingSummary {
    /// Number of mapped source columns.
    pub mapped: usize,
    /// Total required target fields.
    pub required_total: usize,
    /// Required target fields that are mapped.
    pub required_mapped: usize,
    /// Required target fields without a source, in schema order.
    pub missing_required: Vec<FieldKey>,
    /// Target fields still free, in schema order.
    pub available: Vec<FieldKey>,
}

impl MappingSummary {
    pub fn all_required_mapped(&self) -> bool {
        self.missing_required.is_empty()
    }
}

pub fn summarize(mapping: &ImportMapping, registry: &SchemaRegistry) -> MappingSummary {
    let required = registry.required_fields();
    let missing_required: Vec<FieldKey> = required
        .iter()
        .copied()
        .filter(|key| !mapping.is_target_used(*key))
        .collect();
    MappingSummary {
        mapped: mapping.len(),
        required_total: required.len(),
        required_mapped: required.len() - missing_required.len(),
        missing_required,
        available: mapping.available_targets(registry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims_standards::claims_registry;

    #[test]
    fn counts_required_fields() {
        let registry = claims_registry().unwrap();
        let mapping = ImportMapping::from_pairs([
            ("id", FieldKey::Id),
            ("name", FieldKey::PatientName),
            ("dept", FieldKey::Department),
        ])
        .unwrap();
        let summary = summarize(&mapping, &registry);
        assert_eq!(summary.mapped, 3);
        assert_eq!(summary.required_total, 5);
        assert_eq!(summary.required_mapped, 2);
        assert_eq!(
            summary.missing_required,
            vec![
                FieldKey::PatientId,
                FieldKey::SubmissionDate,
                FieldKey::TotalAmount
            ]
        );
        assert_eq!(summary.available.len(), 14);
        assert!(!summary.all_required_mapped());
    }
}
