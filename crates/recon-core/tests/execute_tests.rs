//! Tests for sync execution against an in-memory destination

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use recon_core::{
    Error, ExecuteOptions, FieldValue, Record, RecordType, RemoteContent, RemoteError,
    RemoteResult, SyncItemRequest, execute,
};
use serde_json::json;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Create(Record),
    Update(String, Record),
}

#[derive(Default)]
struct MemoryRemote {
    records: Vec<Record>,
    fail_listing: bool,
    /// Identifiers whose create/update calls fail
    failing: HashSet<String>,
    /// Identifiers whose calls are slowed down
    slow: HashSet<String>,
    calls: Mutex<Vec<Call>>,
    list_calls: AtomicUsize,
}

impl MemoryRemote {
    fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn respond(&self, record: &Record) -> RemoteResult<Record> {
        let identifier = record.get("identifier").text_form().unwrap_or_default();
        if self.slow.contains(&identifier) {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        if self.failing.contains(&identifier) {
            return Err(RemoteError::Http {
                status: 400,
                message: "The block identifier is invalid".into(),
            });
        }
        Ok(record.clone())
    }
}

#[async_trait]
impl RemoteContent for MemoryRemote {
    async fn list(&self, _record_type: RecordType) -> RemoteResult<Vec<Record>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(RemoteError::Transport("connection refused".into()));
        }
        Ok(self.records.clone())
    }

    async fn create(&self, _record_type: RecordType, record: &Record) -> RemoteResult<Record> {
        self.calls.lock().unwrap().push(Call::Create(record.clone()));
        self.respond(record).await
    }

    async fn update(
        &self,
        _record_type: RecordType,
        id: &str,
        record: &Record,
    ) -> RemoteResult<Record> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Update(id.to_string(), record.clone()));
        self.respond(record).await
    }
}

fn record(value: serde_json::Value) -> Record {
    Record::from_json(value).unwrap()
}

fn blocks(ids: &[&str]) -> Vec<Record> {
    ids.iter()
        .map(|id| record(json!({"identifier": id, "title": id.to_uppercase()})))
        .collect()
}

#[tokio::test]
async fn test_missing_source_fails_only_that_item() {
    let source = blocks(&["a", "c"]);
    let remote = MemoryRemote::default();
    let items = vec![
        SyncItemRequest::create("a"),
        SyncItemRequest::create("b"),
        SyncItemRequest::create("c"),
    ];

    let outcomes = execute(
        &source,
        &remote,
        RecordType::Block,
        &items,
        None,
        ExecuteOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].success);
    assert!(!outcomes[1].success);
    assert_eq!(outcomes[1].error.as_deref(), Some("Source item not found: b"));
    assert!(outcomes[2].success);
    assert_eq!(outcomes[2].message.as_deref(), Some("Created block successfully"));
    assert_eq!(remote.calls().len(), 2);
}

#[tokio::test]
async fn test_update_uses_destination_primary_key() {
    let source = vec![record(json!({"id": 1, "block_id": 1, "identifier": "footer", "title": "New"}))];
    let remote = MemoryRemote::with_records(vec![record(json!({
        "id": 77, "block_id": 77, "identifier": "footer", "title": "Old"
    }))]);
    let items = vec![SyncItemRequest::update("footer")];

    let outcomes = execute(&source, &remote, RecordType::Block, &items, None, ExecuteOptions::default())
        .await
        .unwrap();

    assert!(outcomes[0].success);
    assert_eq!(outcomes[0].message.as_deref(), Some("Updated block successfully"));
    let calls = remote.calls();
    assert_eq!(calls.len(), 1);
    let Call::Update(id, payload) = &calls[0] else {
        panic!("expected an update call, got {:?}", calls[0]);
    };
    assert_eq!(id, "77");
    assert_eq!(payload.get("block_id"), &FieldValue::from(77));
    assert_eq!(payload.get("title").as_str(), Some("New"));
}

#[tokio::test]
async fn test_invalid_combinations_make_no_remote_call() {
    let source = blocks(&["exists", "absent"]);
    let remote = MemoryRemote::with_records(vec![record(json!({"id": 1, "identifier": "exists"}))]);
    let items = vec![
        SyncItemRequest::create("exists"),
        SyncItemRequest::update("absent"),
    ];

    let outcomes = execute(&source, &remote, RecordType::Block, &items, None, ExecuteOptions::default())
        .await
        .unwrap();

    assert!(outcomes.iter().all(|o| !o.success));
    assert_eq!(
        outcomes[0].error.as_deref(),
        Some("Cannot create block 'exists': it already exists in the destination")
    );
    assert_eq!(
        outcomes[1].error.as_deref(),
        Some("Cannot update block 'absent': it does not exist in the destination")
    );
    assert!(remote.calls().is_empty());
}

#[tokio::test]
async fn test_update_without_destination_id_fails() {
    let source = blocks(&["x"]);
    let remote = MemoryRemote::with_records(vec![record(json!({"identifier": "x"}))]);
    let items = vec![SyncItemRequest::update("x")];

    let outcomes = execute(&source, &remote, RecordType::Block, &items, None, ExecuteOptions::default())
        .await
        .unwrap();

    assert!(!outcomes[0].success);
    assert!(outcomes[0].error.as_deref().unwrap().contains("has no 'id'"));
    assert!(remote.calls().is_empty());
}

#[tokio::test]
async fn test_remote_error_is_recorded_per_item() {
    let source = blocks(&["a", "bad", "c"]);
    let remote = MemoryRemote {
        failing: HashSet::from(["bad".to_string()]),
        ..Default::default()
    };
    let items = vec![
        SyncItemRequest::create("a"),
        SyncItemRequest::create("bad"),
        SyncItemRequest::create("c"),
    ];

    let outcomes = execute(&source, &remote, RecordType::Block, &items, None, ExecuteOptions::default())
        .await
        .unwrap();

    let flags: Vec<bool> = outcomes.iter().map(|o| o.success).collect();
    assert_eq!(flags, vec![true, false, true]);
    assert_eq!(
        outcomes[1].error.as_deref(),
        Some("HTTP 400: The block identifier is invalid")
    );
    assert_eq!(remote.calls().len(), 3);
}

#[tokio::test]
async fn test_listing_failure_aborts_before_any_item() {
    let source = blocks(&["a"]);
    let remote = MemoryRemote {
        fail_listing: true,
        ..Default::default()
    };
    let items = vec![SyncItemRequest::create("a")];

    let err = execute(&source, &remote, RecordType::Page, &items, None, ExecuteOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DestinationListing { record_type: RecordType::Page, .. }));
    assert!(remote.calls().is_empty());
}

#[tokio::test]
async fn test_destination_is_listed_once() {
    let source = blocks(&["a", "b", "c"]);
    let remote = MemoryRemote::default();
    let items: Vec<_> = ["a", "b", "c"].into_iter().map(SyncItemRequest::create).collect();

    execute(&source, &remote, RecordType::Block, &items, None, ExecuteOptions::default())
        .await
        .unwrap();

    assert_eq!(remote.list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_execution_preserves_order() {
    let ids = ["a", "b", "c", "d", "e"];
    let source = blocks(&ids);
    let remote = MemoryRemote {
        slow: HashSet::from(["a".to_string(), "c".to_string()]),
        failing: HashSet::from(["d".to_string()]),
        ..Default::default()
    };
    let items: Vec<_> = ids.into_iter().map(SyncItemRequest::create).collect();

    let outcomes = execute(
        &source,
        &remote,
        RecordType::Block,
        &items,
        None,
        ExecuteOptions::with_concurrency(4),
    )
    .await
    .unwrap();

    let order: Vec<&str> = outcomes.iter().map(|o| o.identifier.as_str()).collect();
    assert_eq!(order, ids.to_vec());
    let flags: Vec<bool> = outcomes.iter().map(|o| o.success).collect();
    assert_eq!(flags, vec![true, true, true, false, true]);
}

#[tokio::test]
async fn test_zero_concurrency_behaves_as_sequential() {
    let source = blocks(&["a"]);
    let remote = MemoryRemote::default();
    let items = vec![SyncItemRequest::create("a")];

    let outcomes = execute(
        &source,
        &remote,
        RecordType::Block,
        &items,
        None,
        ExecuteOptions::with_concurrency(0),
    )
    .await
    .unwrap();

    assert!(outcomes[0].success);
}
