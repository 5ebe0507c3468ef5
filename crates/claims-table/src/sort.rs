//! Single-column sort state and record ordering.

use std::cmp::Ordering;

use serde::Serialize;

use claims_model::{ClaimRecord, FieldKey};

/// Direction of the active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Header arrow for the direction.
    pub fn icon(self) -> &'static str {
        match self {
            SortDirection::Ascending => "⬆",
            SortDirection::Descending => "⬇",
        }
    }
}

/// The one column records are ordered by. No sort means insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub key: FieldKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(key: FieldKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: FieldKey) -> Self {
        Self {
            key,
            direction: SortDirection::Descending,
        }
    }

    /// Next state after a header click on `key`.
    ///
    /// A different column starts ascending; the same column flips between
    /// ascending and descending. There is no unsorted step in the cycle.
    pub fn toggle(current: Option<SortState>, key: FieldKey) -> SortState {
        match current {
            Some(state) if state.key == key => SortState {
                key,
                direction: state.direction.reversed(),
            },
            _ => SortState::ascending(key),
        }
    }

    /// Compare two records. Absent values sort last in both directions.
    pub fn compare(&self, a: &ClaimRecord, b: &ClaimRecord) -> Ordering {
        match (a.field(self.key), b.field(self.key)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(left), Some(right)) => {
                let ordering = left.compare(&right);
                match self.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            }
        }
    }
}

/// Stable in-place sort; equal keys keep their relative order.
pub fn sort_records(records: &mut [&ClaimRecord], sort: Option<SortState>) {
    if let Some(sort) = sort {
        records.sort_by(|a, b| sort.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_cycles_between_two_states() {
        let first = SortState::toggle(None, FieldKey::TotalAmount);
        assert_eq!(first, SortState::ascending(FieldKey::TotalAmount));
        let second = SortState::toggle(Some(first), FieldKey::TotalAmount);
        assert_eq!(second, SortState::descending(FieldKey::TotalAmount));
        let third = SortState::toggle(Some(second), FieldKey::TotalAmount);
        assert_eq!(third, first);
        let other = SortState::toggle(Some(second), FieldKey::Age);
        assert_eq!(other, SortState::ascending(FieldKey::Age));
    }

    #[test]
    fn nulls_last_both_ways() {
        let mut a = ClaimRecord::new("A");
        a.age = Some(40);
        let b = ClaimRecord::new("B");
        let mut c = ClaimRecord::new("C");
        c.age = Some(30);

        for sort in [
            SortState::ascending(FieldKey::Age),
            SortState::descending(FieldKey::Age),
        ] {
            let mut rows = vec![&b, &a, &c];
            sort_records(&mut rows, Some(sort));
            assert_eq!(rows[2].id, "B");
        }
    }

    #[test]
    fn no_sort_keeps_order() {
        let a = ClaimRecord::new("Z");
        let b = ClaimRecord::new("A");
        let mut rows = vec![&a, &b];
        sort_records(&mut rows, None);
        assert_eq!(rows[0].id, "Z");
    }
}
