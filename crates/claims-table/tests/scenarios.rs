//! Table behaviour over the built-in claims.

use claims_model::{ClaimRecord, ClaimStatus, FieldKey};
use claims_standards::{claims_registry, load_seed_claims};
use claims_table::{
    ColumnLayout, ExportFormat, FilterOrigin, FilterSet, FilterSpec, SortState, TableAction,
    TableViewState, apply_filters, compute_view, distinct_values, export_delimited, sort_records,
};

#[test]
fn status_quick_filter_on_seed_claims() {
    let claims = load_seed_claims().unwrap();
    let state = TableViewState::default().reduce(TableAction::SetQuickFilter {
        column: FieldKey::Status,
        values: vec!["Approved".to_string()],
    });
    let filtered = state.filtered_sorted(&claims);
    let approved = claims
        .iter()
        .filter(|c| c.status == ClaimStatus::Approved)
        .count();
    assert_eq!(filtered.len(), approved);
    assert!(filtered.iter().all(|c| c.status == ClaimStatus::Approved));
}

#[test]
fn eight_of_thirty_approved() {
    let claims: Vec<ClaimRecord> = (0..30)
        .map(|i| {
            let mut claim = ClaimRecord::new(format!("C{i:02}"));
            if i < 8 {
                claim.status = ClaimStatus::Approved;
            }
            claim
        })
        .collect();

    let mut filters = FilterSet::new();
    filters.set_quick(FieldKey::Status, ["Approved"]);
    let filtered = apply_filters(&claims, &filters);
    assert_eq!(filtered.len(), 8);
    assert_eq!(filtered[7].id, "C07");
}

#[test]
fn amount_descending_puts_missing_last() {
    let amounts = [Some(10.0), None, Some(5.0)];
    let claims: Vec<ClaimRecord> = amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| {
            let mut claim = ClaimRecord::new(format!("C{i}"));
            claim.total_amount = *amount;
            claim
        })
        .collect();
    let mut rows: Vec<&ClaimRecord> = claims.iter().collect();
    sort_records(&mut rows, Some(SortState::descending(FieldKey::TotalAmount)));
    let order: Vec<Option<f64>> = rows.iter().map(|c| c.total_amount).collect();
    assert_eq!(order, vec![Some(10.0), Some(5.0), None]);
}

#[test]
fn third_page_of_twenty_five() {
    let claims: Vec<ClaimRecord> = (0..25)
        .map(|i| ClaimRecord::new(format!("C{i:02}")))
        .collect();
    let registry = claims_registry().unwrap();
    let state = TableViewState::default().reduce(TableAction::SetPage(3));
    let view = compute_view(&claims, &registry, &state);
    let ids: Vec<&str> = view.rows.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["C20", "C21", "C22", "C23", "C24"]);
    assert_eq!(view.page.page, 3);
    assert_eq!(view.filtered_count, 25);

    let beyond = state.reduce(TableAction::SetPage(9));
    let view = compute_view(&claims, &registry, &beyond);
    assert_eq!(view.page.page, 3);
    assert_eq!(view.rows.len(), 5);
}

#[test]
fn quick_and_advanced_filters_conjoin() {
    let claims = load_seed_claims().unwrap();
    let state = TableViewState::default()
        .reduce(TableAction::SetQuickFilter {
            column: FieldKey::Department,
            values: distinct_values(&claims, FieldKey::Department),
        })
        .reduce(TableAction::SetFilter {
            column: FieldKey::Department,
            spec: FilterSpec::text("cardio"),
        });
    let filtered = state.filtered_sorted(&claims);
    assert!(!filtered.is_empty());
    assert!(
        filtered
            .iter()
            .all(|c| c.department.as_deref() == Some("Cardiology"))
    );

    let cleared = state.reduce(TableAction::ClearFilter {
        column: FieldKey::Department,
        origin: FilterOrigin::Advanced,
    });
    assert_eq!(cleared.filtered_sorted(&claims).len(), claims.len());
}

#[test]
fn export_follows_visible_columns() {
    let claims = load_seed_claims().unwrap();
    let registry = claims_registry().unwrap();
    let state = TableViewState::new(
        ColumnLayout::with_expanded(Vec::<String>::new()),
        10,
    )
    .reduce(TableAction::TogglePin(FieldKey::TotalAmount))
    .reduce(TableAction::HideColumn(FieldKey::Udf1))
    .reduce(TableAction::SetQuickFilter {
        column: FieldKey::Id,
        values: vec!["CLM001".to_string(), "CLM002".to_string()],
    });
    let view = compute_view(&claims, &registry, &state);
    let text = export_delimited(&view.rows, &view.columns, ExportFormat::Csv).unwrap();
    insta::assert_snapshot!(text, @r"
    Total Amount,Patient ID,Claim ID,Primary Diagnosis
    1250,PAT12345,CLM001,Z51.11
    850.75,PAT67890,CLM002,M79.3
    ");
}
