//! Property tests for filtering, sorting, paging and column visibility.

use proptest::prelude::*;

use claims_model::{ClaimRecord, ClaimStatus, FieldKey};
use claims_standards::claims_registry;
use claims_table::{
    ColumnLayout, FilterOrigin, FilterSet, FilterSpec, SortDirection, SortState, apply_filters,
    paginate, sort_records,
};

// ============================================================================
// Strategies
// ============================================================================

fn status_strategy() -> impl Strategy<Value = ClaimStatus> {
    prop::sample::select(ClaimStatus::ALL.to_vec())
}

fn name_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(vec![
        "John Smith".to_string(),
        "Sarah Johnson".to_string(),
        "Michael Brown".to_string(),
        "emily davis".to_string(),
    ]))
}

fn date_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        (1u32..=28).prop_map(|day| format!("2025-08-{day:02}")),
        Just("not a date".to_string()),
    ])
}

fn records_strategy() -> impl Strategy<Value = Vec<ClaimRecord>> {
    prop::collection::vec(
        (
            status_strategy(),
            name_strategy(),
            prop::option::of(0u32..50),
            prop::option::of(0u32..5000),
            date_strategy(),
        ),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(idx, (status, name, age, cents, date))| {
                let mut record = ClaimRecord::new(format!("C{idx:03}"));
                record.status = status;
                record.patient_name = name;
                record.age = age;
                record.total_amount = cents.map(|c| f64::from(c) / 10.0);
                record.submission_date = date;
                record
            })
            .collect()
    })
}

fn filters_strategy() -> impl Strategy<Value = FilterSet> {
    (
        prop::collection::vec(status_strategy(), 0..3),
        prop::option::of(prop::sample::select(vec!["smith", "JOHN", "a", "zzz"])),
        prop::option::of(0.0f64..300.0),
        prop::option::of(0.0f64..300.0),
        prop::option::of(1u32..=28),
    )
        .prop_map(|(statuses, needle, min, max, from_day)| {
            let mut filters = FilterSet::new();
            filters.set_quick(FieldKey::Status, statuses.iter().map(ClaimStatus::as_str));
            if let Some(needle) = needle {
                filters.set(
                    FilterOrigin::Advanced,
                    FieldKey::PatientName,
                    FilterSpec::text(needle),
                );
            }
            filters.set(
                FilterOrigin::Advanced,
                FieldKey::TotalAmount,
                FilterSpec::NumberRange { min, max },
            );
            filters.set(
                FilterOrigin::Advanced,
                FieldKey::SubmissionDate,
                FilterSpec::DateRange {
                    from: from_day.and_then(|day| chrono::NaiveDate::from_ymd_opt(2025, 8, day)),
                    to: None,
                },
            );
            filters
        })
}

fn sort_key_strategy() -> impl Strategy<Value = FieldKey> {
    prop::sample::select(vec![
        FieldKey::TotalAmount,
        FieldKey::Age,
        FieldKey::PatientName,
        FieldKey::Status,
        FieldKey::SubmissionDate,
    ])
}

fn direction_strategy() -> impl Strategy<Value = SortDirection> {
    prop::sample::select(vec![SortDirection::Ascending, SortDirection::Descending])
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Filtering returns an order-preserving subset; survivors satisfy every
    /// predicate and every excluded record fails at least one.
    #[test]
    fn prop_filter_is_sound_and_complete(
        records in records_strategy(),
        filters in filters_strategy(),
    ) {
        let kept = apply_filters(&records, &filters);
        prop_assert!(kept.len() <= records.len());

        let kept_ids: Vec<&str> = kept.iter().map(|r| r.id.as_str()).collect();
        let expected: Vec<&str> = records
            .iter()
            .filter(|r| filters.matches(r))
            .map(|r| r.id.as_str())
            .collect();
        prop_assert_eq!(&kept_ids, &expected);

        for record in &records {
            let passes = filters
                .iter()
                .all(|(column, _, spec)| spec.matches(record.field(column).as_ref()));
            prop_assert_eq!(passes, kept_ids.contains(&record.id.as_str()));
        }
    }

    /// Sorting keeps equal keys in input order and puts absent values last
    /// in both directions.
    #[test]
    fn prop_sort_is_stable_with_nulls_last(
        records in records_strategy(),
        key in sort_key_strategy(),
        direction in direction_strategy(),
    ) {
        let sort = SortState { key, direction };
        let mut rows: Vec<&ClaimRecord> = records.iter().collect();
        sort_records(&mut rows, Some(sort));
        prop_assert_eq!(rows.len(), records.len());

        let first_null = rows.iter().position(|r| r.field(key).is_none());
        if let Some(first_null) = first_null {
            prop_assert!(rows[first_null..].iter().all(|r| r.field(key).is_none()));
        }

        for pair in rows.windows(2) {
            let ordering = sort.compare(pair[0], pair[1]);
            prop_assert_ne!(ordering, std::cmp::Ordering::Greater);
            if ordering == std::cmp::Ordering::Equal {
                // Ids are generated in input order.
                prop_assert!(pair[0].id < pair[1].id);
            }
        }
    }

    /// Concatenating every page reproduces the sequence exactly once.
    #[test]
    fn prop_pages_concatenate_to_whole(
        records in records_strategy(),
        page_size in 1usize..15,
    ) {
        let rows: Vec<&ClaimRecord> = records.iter().collect();
        let (_, first) = paginate(&rows, 1, page_size);
        let mut joined: Vec<&ClaimRecord> = Vec::new();
        for page in 1..=first.total_pages {
            let (slice, info) = paginate(&rows, page, page_size);
            prop_assert_eq!(info.page, page);
            prop_assert!(slice.len() <= page_size);
            joined.extend_from_slice(slice);
        }
        let joined_ids: Vec<&str> = joined.iter().map(|r| r.id.as_str()).collect();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        prop_assert_eq!(joined_ids, ids);
    }

    /// Out-of-range page requests clamp to a valid, non-empty page when
    /// there is data.
    #[test]
    fn prop_page_requests_clamp(
        total in 0usize..200,
        page in 0usize..50,
        page_size in 1usize..30,
    ) {
        let items: Vec<usize> = (0..total).collect();
        let (slice, info) = paginate(&items, page, page_size);
        prop_assert!(info.page >= 1 && info.page <= info.total_pages);
        prop_assert_eq!(slice.is_empty(), total == 0);
    }

    /// Visible columns never include hidden keys, pinned columns come first,
    /// and toggling a group twice changes nothing.
    #[test]
    fn prop_visibility_invariants(
        expanded in prop::collection::vec(
            prop::sample::select(vec![
                "patient_info", "claim_status", "diagnosis_codes", "user_fields", "financial",
            ]),
            0..5,
        ),
        hidden in prop::collection::vec(prop::sample::select(FieldKey::ALL.to_vec()), 0..6),
        pinned in prop::collection::vec(prop::sample::select(FieldKey::ALL.to_vec()), 0..6),
        toggled in prop::sample::select(vec![
            "patient_info", "claim_status", "diagnosis_codes", "user_fields", "financial",
        ]),
    ) {
        let registry = claims_registry().unwrap();
        let mut layout = ColumnLayout::with_expanded(expanded);
        for key in &hidden {
            layout.hide(*key);
        }
        for key in &pinned {
            layout.toggle_pin(*key);
        }

        let visible = layout.visible_columns(&registry);
        for column in &visible {
            prop_assert!(!hidden.contains(&column.key));
        }
        let first_unpinned = visible
            .iter()
            .position(|c| !layout.prefs(c.key).pinned)
            .unwrap_or(visible.len());
        prop_assert!(visible[first_unpinned..].iter().all(|c| !layout.prefs(c.key).pinned));

        let before: Vec<FieldKey> = visible.iter().map(|c| c.key).collect();
        let mut twice = layout.clone();
        twice.toggle_group(toggled);
        twice.toggle_group(toggled);
        let after: Vec<FieldKey> = twice.visible_columns(&registry).iter().map(|c| c.key).collect();
        prop_assert_eq!(before, after);
    }
}
