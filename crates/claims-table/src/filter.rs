//! Column filters.
//!
//! Quick (side panel) filters and advanced (per column) filters share one
//! predicate type, [`FilterSpec`]. A [`FilterSet`] stores them by column and
//! [`FilterOrigin`]; every stored predicate must hold for a record to pass,
//! so a column filtered from both origins has to satisfy both.
//!
//! Predicates never fail loudly. A value that cannot be read as the kind the
//! predicate expects (a number, a date) simply does not match.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use claims_model::{ClaimRecord, FieldKey, FieldValue};

/// Allowed raw values of a column, optionally including "no value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueSet {
    pub values: BTreeSet<String>,
    pub include_null: bool,
}

impl ValueSet {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            include_null: false,
        }
    }

    #[must_use]
    pub fn with_null(mut self) -> Self {
        self.include_null = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && !self.include_null
    }
}

/// A predicate on one column.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    /// Raw value is one of the set (case-sensitive).
    Values(ValueSet),
    /// String form contains `needle`, ignoring case.
    Text { needle: String },
    /// Value reads as a finite number within the inclusive bounds.
    NumberRange { min: Option<f64>, max: Option<f64> },
    /// Value reads as a date within the inclusive bounds.
    DateRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl FilterSpec {
    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterSpec::Values(ValueSet::new(values))
    }

    pub fn text(needle: impl Into<String>) -> Self {
        FilterSpec::Text {
            needle: needle.into(),
        }
    }

    /// Returns false for predicates that constrain nothing: an empty value
    /// set, a blank needle or a range without bounds.
    pub fn is_active(&self) -> bool {
        match self {
            FilterSpec::Values(set) => !set.is_empty(),
            FilterSpec::Text { needle } => !needle.trim().is_empty(),
            FilterSpec::NumberRange { min, max } => min.is_some() || max.is_some(),
            FilterSpec::DateRange { from, to } => from.is_some() || to.is_some(),
        }
    }

    /// Evaluate the predicate on a field value (`None` = absent).
    pub fn matches(&self, value: Option<&FieldValue>) -> bool {
        let Some(value) = value else {
            return matches!(self, FilterSpec::Values(set) if set.include_null);
        };
        match self {
            FilterSpec::Values(set) => set.values.contains(&value.to_string()),
            FilterSpec::Text { needle } => value
                .to_string()
                .to_lowercase()
                .contains(&needle.trim().to_lowercase()),
            FilterSpec::NumberRange { min, max } => value.as_f64().is_some_and(|number| {
                min.is_none_or(|min| number >= min) && max.is_none_or(|max| number <= max)
            }),
            FilterSpec::DateRange { from, to } => match value {
                FieldValue::Text(text) => parse_date(text).is_some_and(|date| {
                    from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
                }),
                FieldValue::Number(_) => false,
            },
        }
    }
}

/// Parse the date forms found in claim data: `YYYY-MM-DD`, an ISO date-time
/// without offset, or RFC 3339.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Which panel a filter was set from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterOrigin {
    Quick,
    Advanced,
}

/// Active filters keyed by column and origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    entries: BTreeMap<(FieldKey, FilterOrigin), FilterSpec>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `spec` for `column`, replacing the previous filter of the same
    /// origin. An inactive spec removes the entry.
    pub fn set(&mut self, origin: FilterOrigin, column: FieldKey, spec: FilterSpec) {
        if spec.is_active() {
            self.entries.insert((column, origin), spec);
        } else {
            self.entries.remove(&(column, origin));
        }
    }

    /// Quick filter: allowed raw values of a column. An empty list clears it.
    pub fn set_quick<I, S>(&mut self, column: FieldKey, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(FilterOrigin::Quick, column, FilterSpec::values(values));
    }

    pub fn get(&self, origin: FilterOrigin, column: FieldKey) -> Option<&FilterSpec> {
        self.entries.get(&(column, origin))
    }

    pub fn clear(&mut self, origin: FilterOrigin, column: FieldKey) -> Option<FilterSpec> {
        self.entries.remove(&(column, origin))
    }

    pub fn clear_origin(&mut self, origin: FilterOrigin) {
        self.entries.retain(|(_, o), _| *o != origin);
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, FilterOrigin, &FilterSpec)> {
        self.entries
            .iter()
            .map(|((column, origin), spec)| (*column, *origin, spec))
    }

    /// Columns with at least one active filter.
    pub fn filtered_columns(&self) -> BTreeSet<FieldKey> {
        self.entries.keys().map(|(column, _)| *column).collect()
    }

    /// True when the record satisfies every stored predicate.
    pub fn matches(&self, record: &ClaimRecord) -> bool {
        self.entries
            .iter()
            .all(|((column, _), spec)| spec.matches(record.field(*column).as_ref()))
    }
}

/// Records passing all filters, in input order.
pub fn apply_filters<'a>(records: &'a [ClaimRecord], filters: &FilterSet) -> Vec<&'a ClaimRecord> {
    records.iter().filter(|record| filters.matches(record)).collect()
}

/// Distinct present values of a column in first-seen order.
pub fn distinct_values<'a, I>(records: I, column: FieldKey) -> Vec<String>
where
    I: IntoIterator<Item = &'a ClaimRecord>,
{
    let mut seen = BTreeSet::new();
    let mut values = Vec::new();
    for record in records {
        if let Some(value) = record.field(column) {
            let text = value.to_string();
            if seen.insert(text.clone()) {
                values.push(text);
            }
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> FieldValue {
        FieldValue::Text(value.to_string())
    }

    #[test]
    fn value_sets_are_case_sensitive() {
        let spec = FilterSpec::values(["Approved"]);
        assert!(spec.matches(Some(&text("Approved"))));
        assert!(!spec.matches(Some(&text("approved"))));
        assert!(!spec.matches(None));
    }

    #[test]
    fn null_marker_admits_absent_values() {
        let spec = FilterSpec::Values(ValueSet::new(["Z51.11"]).with_null());
        assert!(spec.matches(None));
        assert!(spec.is_active());
        assert!(FilterSpec::Values(ValueSet::default().with_null()).is_active());
    }

    #[test]
    fn numbers_match_value_sets_by_display_form() {
        let spec = FilterSpec::values(["1250"]);
        assert!(spec.matches(Some(&FieldValue::Number(1250.0))));
    }

    #[test]
    fn text_is_case_insensitive_substring() {
        let spec = FilterSpec::text("SMI");
        assert!(spec.matches(Some(&text("John Smith"))));
        assert!(!spec.matches(Some(&text("Jane Doe"))));
        assert!(!spec.matches(None));
    }

    #[test]
    fn number_range_is_inclusive_and_rejects_text() {
        let spec = FilterSpec::NumberRange {
            min: Some(100.0),
            max: Some(200.0),
        };
        assert!(spec.matches(Some(&FieldValue::Number(100.0))));
        assert!(spec.matches(Some(&FieldValue::Number(200.0))));
        assert!(!spec.matches(Some(&FieldValue::Number(200.01))));
        assert!(spec.matches(Some(&text("150"))));
        assert!(!spec.matches(Some(&text("n/a"))));
        let open = FilterSpec::NumberRange {
            min: None,
            max: Some(10.0),
        };
        assert!(open.matches(Some(&FieldValue::Number(-3.0))));
    }

    #[test]
    fn date_range_parses_dates() {
        let spec = FilterSpec::DateRange {
            from: NaiveDate::from_ymd_opt(2025, 8, 2),
            to: NaiveDate::from_ymd_opt(2025, 8, 4),
        };
        assert!(spec.matches(Some(&text("2025-08-02"))));
        assert!(spec.matches(Some(&text("2025-08-04T23:59:59Z"))));
        assert!(!spec.matches(Some(&text("2025-08-05"))));
        assert!(!spec.matches(Some(&text("08/03/2025"))));
        assert!(!spec.matches(Some(&FieldValue::Number(20250803.0))));
    }

    #[test]
    fn inactive_specs_are_not_stored() {
        let mut filters = FilterSet::new();
        filters.set_quick(FieldKey::Status, Vec::<String>::new());
        filters.set(FilterOrigin::Advanced, FieldKey::PatientName, FilterSpec::text("  "));
        assert!(filters.is_empty());
    }

    #[test]
    fn both_origins_must_hold() {
        let mut record = ClaimRecord::new("C1");
        record.patient_name = Some("John Smith".to_string());

        let mut filters = FilterSet::new();
        filters.set_quick(FieldKey::PatientName, ["John Smith", "Jane Doe"]);
        filters.set(FilterOrigin::Advanced, FieldKey::PatientName, FilterSpec::text("jane"));
        assert!(!filters.matches(&record));

        filters.set(FilterOrigin::Advanced, FieldKey::PatientName, FilterSpec::text("john"));
        assert!(filters.matches(&record));
        assert_eq!(filters.len(), 2);

        filters.clear_origin(FilterOrigin::Quick);
        assert_eq!(filters.len(), 1);
        assert!(filters.get(FilterOrigin::Quick, FieldKey::PatientName).is_none());
    }

    #[test]
    fn distinct_values_skip_nulls_in_first_seen_order() {
        let mut a = ClaimRecord::new("A");
        a.department = Some("Oncology".to_string());
        let b = ClaimRecord::new("B");
        let mut c = ClaimRecord::new("C");
        c.department = Some("Cardiology".to_string());
        let mut d = ClaimRecord::new("D");
        d.department = Some("Oncology".to_string());
        let records = [a, b, c, d];
        assert_eq!(
            distinct_values(&records, FieldKey::Department),
            vec!["Oncology", "Cardiology"]
        );
    }
}
