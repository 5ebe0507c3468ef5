//! Source column → target field assignments for one import.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use claims_model::FieldKey;
use claims_standards::SchemaRegistry;

use crate::error::MappingError;

/// Partial mapping from file headers onto claim fields.
///
/// Each target field is fed by at most one source column. Sources that are
/// not mapped are dropped during transform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportMapping {
    pairs: BTreeMap<String, FieldKey>,
}

impl ImportMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from pairs, applying [`ImportMapping::assign`] in order.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (S, FieldKey)>,
        S: Into<String>,
    {
        let mut mapping = Self::new();
        for (source, target) in pairs {
            mapping.assign(source, target)?;
        }
        Ok(mapping)
    }

    /// Map every header that names a target field (by key, label or column
    /// title) onto that field. Later headers naming an already-mapped field
    /// are left unmapped.
    pub fn identity(headers: &[String], registry: &SchemaRegistry) -> Self {
        let mut mapping = Self::new();
        for header in headers {
            if let Some(target) = registry.resolve_field_name(header)
                && !mapping.is_target_used(target)
            {
                mapping.pairs.insert(header.clone(), target);
            }
        }
        mapping
    }

    /// Map `source` onto `target`.
    ///
    /// Re-assigning a source replaces its previous target. Assigning a target
    /// that another source already feeds is rejected.
    pub fn assign(
        &mut self,
        source: impl Into<String>,
        target: FieldKey,
    ) -> Result<(), MappingError> {
        let source = source.into();
        if let Some(existing) = self.source_for(target)
            && existing != source
        {
            return Err(MappingError::TargetAlreadyMapped {
                target,
                existing_source: existing.to_string(),
                source,
            });
        }
        self.pairs.insert(source, target);
        Ok(())
    }

    /// Parse and assign a `SOURCE=TARGET` pair. The target may be a field
    /// key, target label or column title.
    pub fn assign_pair(
        &mut self,
        raw: &str,
        registry: &SchemaRegistry,
    ) -> Result<(), MappingError> {
        let (source, target) = raw
            .split_once('=')
            .ok_or_else(|| MappingError::InvalidPair(raw.to_string()))?;
        let source = source.trim();
        if source.is_empty() {
            return Err(MappingError::InvalidPair(raw.to_string()));
        }
        let target = registry
            .resolve_field_name(target)
            .ok_or_else(|| MappingError::UnknownTarget(target.trim().to_string()))?;
        self.assign(source, target)
    }

    /// Remove the mapping of a source column. Returns the target it fed.
    pub fn clear(&mut self, source: &str) -> Option<FieldKey> {
        self.pairs.remove(source)
    }

    pub fn target_for(&self, source: &str) -> Option<FieldKey> {
        self.pairs.get(source).copied()
    }

    pub fn source_for(&self, target: FieldKey) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(_, mapped)| **mapped == target)
            .map(|(source, _)| source.as_str())
    }

    pub fn is_target_used(&self, target: FieldKey) -> bool {
        self.pairs.values().any(|mapped| *mapped == target)
    }

    /// Target fields not fed by any source, in schema order.
    pub fn available_targets(&self, registry: &SchemaRegistry) -> Vec<FieldKey> {
        registry
            .target_fields()
            .iter()
            .map(|field| field.key)
            .filter(|key| !self.is_target_used(*key))
            .collect()
    }

    /// Iterate `(source, target)` pairs ordered by source name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldKey)> {
        self.pairs
            .iter()
            .map(|(source, target)| (source.as_str(), *target))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Check that every mapped source is one of `headers` and that something
    /// is mapped at all.
    pub fn validate_against(&self, headers: &[String]) -> Result<(), MappingError> {
        if self.pairs.is_empty() {
            return Err(MappingError::NothingMapped);
        }
        for source in self.pairs.keys() {
            if !headers.iter().any(|header| header == source) {
                return Err(MappingError::UnknownSourceColumn(source.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims_standards::claims_registry;

    #[test]
    fn duplicate_target_is_rejected() {
        let mut mapping = ImportMapping::new();
        mapping.assign("name", FieldKey::PatientName).unwrap();
        let err = mapping.assign("full_name", FieldKey::PatientName).unwrap_err();
        assert_eq!(
            err,
            MappingError::TargetAlreadyMapped {
                target: FieldKey::PatientName,
                existing_source: "name".to_string(),
                source: "full_name".to_string(),
            }
        );
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn reassigning_a_source_replaces_its_target() {
        let mut mapping = ImportMapping::new();
        mapping.assign("col", FieldKey::Diag1).unwrap();
        mapping.assign("col", FieldKey::Diag2).unwrap();
        assert_eq!(mapping.target_for("col"), Some(FieldKey::Diag2));
        assert!(!mapping.is_target_used(FieldKey::Diag1));
        mapping.assign("col", FieldKey::Diag2).unwrap();
        assert_eq!(mapping.clear("col"), Some(FieldKey::Diag2));
        assert!(mapping.is_empty());
    }

    #[test]
    fn pairs_resolve_labels_and_keys() {
        let registry = claims_registry().unwrap();
        let mut mapping = ImportMapping::new();
        mapping.assign_pair("Name=patientName", &registry).unwrap();
        mapping.assign_pair("Amt = Total Amount", &registry).unwrap();
        assert_eq!(mapping.target_for("Name"), Some(FieldKey::PatientName));
        assert_eq!(mapping.target_for("Amt"), Some(FieldKey::TotalAmount));
        assert!(matches!(
            mapping.assign_pair("Amt", &registry),
            Err(MappingError::InvalidPair(_))
        ));
        assert!(matches!(
            mapping.assign_pair("x=nope", &registry),
            Err(MappingError::UnknownTarget(_))
        ));
    }

    #[test]
    fn identity_maps_labelled_headers() {
        let registry = claims_registry().unwrap();
        let headers: Vec<String> = ["Claim ID", "Patient Name", "Notes", "claim id"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        let mapping = ImportMapping::identity(&headers, &registry);
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.target_for("Claim ID"), Some(FieldKey::Id));
        assert_eq!(mapping.target_for("claim id"), None);
    }

    #[test]
    fn validates_sources_against_headers() {
        let headers = vec!["id".to_string()];
        assert_eq!(
            ImportMapping::new().validate_against(&headers),
            Err(MappingError::NothingMapped)
        );
        let mapping = ImportMapping::from_pairs([("ident", FieldKey::Id)]).unwrap();
        assert_eq!(
            mapping.validate_against(&headers),
            Err(MappingError::UnknownSourceColumn("ident".to_string()))
        );
    }

    #[test]
    fn serializes_as_plain_object() {
        let mapping =
            ImportMapping::from_pairs([("id", FieldKey::Id), ("name", FieldKey::PatientName)])
                .unwrap();
        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(json, r#"{"id":"id","name":"patientName"}"#);
        let back: ImportMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mapping);
    }
}
