//! Header → target field suggestions.
//!
//! Exact matches on the normalized field key, target label or column title
//! come first with confidence 1.0. Remaining headers are scored with
//! Jaro-Winkler similarity against every free target field and assigned
//! greedily, best score first.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;
use serde::Serialize;

use claims_model::FieldKey;
use claims_standards::SchemaRegistry;

use crate::error::MappingError;
use crate::mapping::ImportMapping;

/// Default minimum similarity for a fuzzy suggestion.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.85;

/// A suggested mapping from a file header to a target field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingSuggestion {
    pub source_column: String,
    pub target: FieldKey,
    pub confidence: f32,
}

/// Suggestions plus the headers left without one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuggestionResult {
    pub suggestions: Vec<MappingSuggestion>,
    pub unmapped_columns: Vec<String>,
}

impl SuggestionResult {
    /// Turn the suggestions into a starting mapping.
    ///
    /// # Errors
    ///
    /// Fails if two suggestions share a target.
    pub fn to_mapping(&self) -> Result<ImportMapping, MappingError> {
        ImportMapping::from_pairs(
            self.suggestions
                .iter()
                .map(|suggestion| (suggestion.source_column.as_str(), suggestion.target)),
        )
    }
}

/// Normalizes text for comparison by lowercasing and replacing separators with spaces.
///
/// camelCase boundaries are split too, so `patientName` and `Patient Name`
/// normalize alike.
pub fn normalize_text(raw: &str) -> String {
    let mut spaced = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for ch in raw.trim().chars() {
        if ch.is_uppercase() && prev_lower {
            spaced.push(' ');
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        spaced.push(ch);
    }
    spaced
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

struct Candidate {
    source_column: String,
    target: FieldKey,
    confidence: f32,
}

/// Suggest a mapping for `headers`.
pub fn suggest_mapping(
    headers: &[String],
    registry: &SchemaRegistry,
    min_confidence: f32,
) -> SuggestionResult {
    let mut suggestions = Vec::new();
    let mut assigned_targets = BTreeSet::new();
    let mut assigned_columns = BTreeSet::new();

    let names_for = |key: FieldKey| -> Vec<String> {
        let mut names = vec![normalize_text(key.as_str())];
        if let Some(field) = registry.target_field(key) {
            names.push(normalize_text(&field.label));
        }
        if let Some(column) = registry.column(key) {
            names.push(normalize_text(&column.title));
        }
        names
    };
    let targets: Vec<(FieldKey, Vec<String>)> = registry
        .target_fields()
        .iter()
        .map(|field| (field.key, names_for(field.key)))
        .collect();

    for header in headers {
        let normalized = normalize_text(header);
        if normalized.is_empty() || assigned_columns.contains(header) {
            continue;
        }
        let exact = targets
            .iter()
            .find(|(key, names)| !assigned_targets.contains(key) && names.contains(&normalized));
        if let Some((key, _)) = exact {
            assigned_targets.insert(*key);
            assigned_columns.insert(header.clone());
            suggestions.push(MappingSuggestion {
                source_column: header.clone(),
                target: *key,
                confidence: 1.0,
            });
        }
    }

    let mut candidates: Vec<Candidate> = Vec::new();
    for header in headers {
        if assigned_columns.contains(header) {
            continue;
        }
        let normalized = normalize_text(header);
        if normalized.is_empty() {
            continue;
        }
        for (key, names) in &targets {
            if assigned_targets.contains(key) {
                continue;
            }
            let confidence = names
                .iter()
                .map(|name| jaro_similarity(normalized.chars(), name.chars()) as f32)
                .fold(0.0_f32, f32::max);
            candidates.push(Candidate {
                source_column: header.clone(),
                target: *key,
                confidence,
            });
        }
    }

    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    for candidate in candidates {
        if candidate.confidence < min_confidence {
            break;
        }
        if assigned_targets.contains(&candidate.target)
            || assigned_columns.contains(&candidate.source_column)
        {
            continue;
        }
        assigned_targets.insert(candidate.target);
        assigned_columns.insert(candidate.source_column.clone());
        suggestions.push(MappingSuggestion {
            source_column: candidate.source_column,
            target: candidate.target,
            confidence: candidate.confidence,
        });
    }

    let unmapped_columns = headers
        .iter()
        .filter(|header| !assigned_columns.contains(*header))
        .cloned()
        .collect();

    SuggestionResult {
        suggestions,
        unmapped_columns,
    }
}
