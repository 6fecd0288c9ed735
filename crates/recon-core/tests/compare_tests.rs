//! Tests for collection comparison

use pretty_assertions::assert_eq;
use recon_core::{ComparisonOutcome, Record, RecordType, compare};
use serde_json::{Value, json};

fn records(values: Vec<Value>) -> Vec<Record> {
    values
        .into_iter()
        .map(|v| Record::from_json(v).unwrap())
        .collect()
}

#[test]
fn test_footer_missing_in_destination() {
    let source = records(vec![
        json!({"identifier": "footer", "title": "Footer", "content": "A"}),
    ]);

    let report = compare(&source, &[], RecordType::Block);

    assert_eq!(report.total_source, 1);
    assert_eq!(report.total_destination, 0);
    assert_eq!(report.missing_in_destination, 1);
    assert_eq!(report.exists_in_both, 0);
    assert_eq!(report.entries.len(), 1);

    let entry = &report.entries[0];
    assert_eq!(entry.identifier, "footer");
    assert_eq!(entry.title, "Footer");
    assert_eq!(entry.outcome, ComparisonOutcome::MissingInDestination);
    assert_eq!(entry.source.as_ref(), Some(&source[0]));
    assert!(entry.destination.is_none());
}

#[test]
fn test_all_four_outcomes() {
    let source = records(vec![
        json!({"identifier": "same", "title": "Same", "content": "x", "store_id": [0]}),
        json!({"identifier": "changed", "title": "Old", "content": "x"}),
        json!({"identifier": "only-source", "title": "New"}),
    ]);
    let destination = records(vec![
        json!({"identifier": "same", "title": "Same", "content": "x", "store_id": [0]}),
        json!({"identifier": "changed", "title": "New", "content": "x"}),
        json!({"identifier": "only-destination", "title": "Stale"}),
    ]);

    let report = compare(&source, &destination, RecordType::Block);

    assert_eq!(report.exists_in_both, 2);
    assert_eq!(report.different, 1);
    assert_eq!(report.missing_in_destination, 1);
    assert_eq!(report.missing_in_source, 1);

    let outcomes: Vec<(&str, ComparisonOutcome)> = report
        .entries
        .iter()
        .map(|e| (e.identifier.as_str(), e.outcome))
        .collect();
    assert_eq!(
        outcomes,
        vec![
            ("changed", ComparisonOutcome::ExistsBothDifferent),
            ("only-destination", ComparisonOutcome::MissingInSource),
            ("only-source", ComparisonOutcome::MissingInDestination),
            ("same", ComparisonOutcome::ExistsBothEqual),
        ]
    );

    let changed = report
        .entries_with(ComparisonOutcome::ExistsBothDifferent)
        .next()
        .unwrap();
    assert_eq!(changed.differences, vec!["title".to_string()]);
    assert_eq!(report.count(ComparisonOutcome::ExistsBothEqual), 1);
}

#[test]
fn test_entries_are_sorted_regardless_of_input_order() {
    let source = records(vec![
        json!({"identifier": "b"}),
        json!({"identifier": "a"}),
        json!({"identifier": "c"}),
    ]);
    let mut reversed = source.clone();
    reversed.reverse();

    let forward = compare(&source, &[], RecordType::Block);
    let backward = compare(&reversed, &[], RecordType::Block);

    let ids: Vec<&str> = forward.entries.iter().map(|e| e.identifier.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(forward, backward);
}

#[test]
fn test_store_assignment_alone_makes_records_different() {
    let source = records(vec![json!({"identifier": "x", "store_id": [0, 1]})]);
    let destination = records(vec![json!({"identifier": "x", "store_id": [1]})]);

    let report = compare(&source, &destination, RecordType::Block);

    assert_eq!(report.different, 1);
    assert_eq!(report.entries[0].differences, vec!["store_id".to_string()]);
}

#[test]
fn test_bookkeeping_timestamps_count_for_blocks_only() {
    let source = records(vec![json!({"identifier": "x", "update_time": "2024-01-01"})]);
    let destination = records(vec![json!({"identifier": "x", "update_time": "2024-02-01"})]);

    assert_eq!(compare(&source, &destination, RecordType::Block).different, 1);
    assert_eq!(compare(&source, &destination, RecordType::Page).different, 0);
}

#[test]
fn test_pages_match_across_schema_generations() {
    let source = records(vec![json!({"identifier": "about-us", "title": "About"})]);
    let destination = records(vec![json!({"url_key": "about-us", "title": "About"})]);

    let report = compare(&source, &destination, RecordType::Page);

    assert_eq!(report.exists_in_both, 1);
    assert_eq!(report.entries[0].outcome, ComparisonOutcome::ExistsBothEqual);
}

#[test]
fn test_duplicate_identifiers_last_wins() {
    let source = records(vec![
        json!({"identifier": "dup", "title": "first"}),
        json!({"identifier": "dup", "title": "second"}),
    ]);
    let destination = records(vec![json!({"identifier": "dup", "title": "second"})]);

    let report = compare(&source, &destination, RecordType::Block);

    assert_eq!(report.total_source, 2);
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].outcome, ComparisonOutcome::ExistsBothEqual);
}

#[test]
fn test_title_falls_back_to_destination_and_heading() {
    let destination = records(vec![json!({"identifier": "x", "content_heading": "Heading"})]);

    let report = compare(&[], &destination, RecordType::Page);

    assert_eq!(report.entries[0].title, "Heading");
    assert_eq!(report.entries[0].outcome, ComparisonOutcome::MissingInSource);
}

#[test]
fn test_report_serializes_outcome_names() {
    let source = records(vec![json!({"identifier": "x"})]);
    let report = compare(&source, &[], RecordType::Block);
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["record_type"], json!("blocks"));
    assert_eq!(value["entries"][0]["outcome"], json!("MISSING_IN_DESTINATION"));
}
