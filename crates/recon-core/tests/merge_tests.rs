//! Tests for the sync item merger

use pretty_assertions::assert_eq;
use recon_core::{FieldValue, Record, RecordType, StoreViewMapping, prepare};
use serde_json::json;

fn record(value: serde_json::Value) -> Record {
    Record::from_json(value).unwrap()
}

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_create_payload_is_the_source_record() {
    let source = record(json!({"identifier": "footer", "title": "Footer", "content": "A"}));

    let merged = prepare(&source, None, None, None, RecordType::Block);

    assert_eq!(merged, source);
}

#[test]
fn test_full_update_takes_destination_identity() {
    let source = record(json!({
        "id": 1, "block_id": 1, "identifier": "footer", "title": "New", "content": "B"
    }));
    let destination = record(json!({
        "id": 42, "block_id": 42, "identifier": "footer", "title": "Old", "content": "A",
        "extra": "destination only"
    }));

    let merged = prepare(&source, Some(&destination), None, None, RecordType::Block);

    assert_eq!(
        merged,
        record(json!({
            "id": 42, "block_id": 42, "identifier": "footer", "title": "New", "content": "B"
        }))
    );
}

#[test]
fn test_page_id_copied_only_when_present() {
    let source = record(json!({"id": 1, "page_id": 1, "identifier": "home"}));
    let without = record(json!({"id": 7, "identifier": "home"}));
    let with = record(json!({"id": 7, "page_id": 7, "identifier": "home"}));

    let merged = prepare(&source, Some(&without), None, None, RecordType::Page);
    assert_eq!(merged.get("id"), &FieldValue::from(7));
    assert_eq!(merged.get("page_id"), &FieldValue::from(1));

    let merged = prepare(&source, Some(&with), None, None, RecordType::Page);
    assert_eq!(merged.get("page_id"), &FieldValue::from(7));
}

#[test]
fn test_field_subset_keeps_every_other_destination_field() {
    let source = record(json!({
        "id": 1, "identifier": "home", "title": "New title", "content": "new", "is_active": false
    }));
    let destination = record(json!({
        "id": 9, "page_id": 9, "identifier": "home", "title": "Old title", "content": "old",
        "is_active": true, "meta_title": "Meta"
    }));

    let subset = fields(&["title"]);
    let merged = prepare(
        &source,
        Some(&destination),
        Some(subset.as_slice()),
        None,
        RecordType::Page,
    );

    let mut expected = destination.clone();
    expected.insert("title", "New title");
    assert_eq!(merged, expected);
}

#[test]
fn test_field_subset_skips_fields_missing_on_source() {
    let source = record(json!({"identifier": "home", "title": "New"}));
    let destination = record(json!({"id": 9, "identifier": "home", "title": "Old", "content": "keep"}));

    let subset = fields(&["title", "content"]);
    let merged = prepare(
        &source,
        Some(&destination),
        Some(subset.as_slice()),
        None,
        RecordType::Page,
    );

    assert_eq!(merged.get("content").as_str(), Some("keep"));
    assert_eq!(merged.get("title").as_str(), Some("New"));
}

#[test]
fn test_field_subset_without_destination_is_full_create() {
    let source = record(json!({"identifier": "home", "title": "New", "content": "body"}));

    let subset = fields(&["title"]);
    let merged = prepare(&source, None, Some(subset.as_slice()), None, RecordType::Page);

    assert_eq!(merged, source);
}

#[test]
fn test_store_mapping_replaces_mapped_ids() {
    let source = record(json!({"identifier": "footer", "store_id": [1, 2]}));
    let mapping = StoreViewMapping::new().with("1", "10");

    let merged = prepare(&source, None, None, Some(&mapping), RecordType::Block);

    assert_eq!(merged.get("store_id"), &FieldValue::from(json!([10, 2])));
}

#[test]
fn test_store_mapping_ignored_without_store_field() {
    let source = record(json!({"identifier": "footer"}));
    let mapping = StoreViewMapping::new().with("1", "10");

    let merged = prepare(&source, None, None, Some(&mapping), RecordType::Block);

    assert!(!merged.has_field("store_id"));
}

#[test]
fn test_bookkeeping_fields_are_stripped() {
    let source = record(json!({
        "identifier": "footer",
        "creation_time": "2024-01-01 00:00:00",
        "update_time": "2024-01-02 00:00:00",
        "created_at": "x",
        "updated_at": "y"
    }));
    let destination = record(json!({"id": 3, "identifier": "footer", "update_time": "z"}));

    let merged = prepare(&source, Some(&destination), None, None, RecordType::Block);

    assert_eq!(merged, record(json!({"id": 3, "identifier": "footer"})));
}

#[test]
fn test_inputs_are_not_modified() {
    let source = record(json!({"identifier": "footer", "update_time": "t", "store_id": [1]}));
    let destination = record(json!({"id": 3, "identifier": "footer"}));
    let source_before = source.clone();
    let destination_before = destination.clone();
    let mapping = StoreViewMapping::new().with("1", "2");

    let _ = prepare(&source, Some(&destination), None, Some(&mapping), RecordType::Block);

    assert_eq!(source, source_before);
    assert_eq!(destination, destination_before);
}
