//! End-to-end reconciliation against an in-memory destination
//!
//! This test exercises the complete flow: snapshot -> compare -> plan ->
//! tracked sync run -> run history -> compare again.

use pretty_assertions::assert_eq;
use recon_core::{
    ComparisonOutcome, ComparisonReport, ExecuteOptions, FieldValue, RecordType, RemoteError, StoreViewMapping,
    SyncItemRequest, SyncRun, SyncStatus, compare, plan, run_sync,
};
use recon_test_utils::{FakeRemote, RemoteCall, TestWorkspace, block};

fn source_blocks() -> Vec<recon_core::Record> {
    vec![
        block("footer", "Footer", "<p>New footer</p>"),
        block("header", "Header", "<p>Header</p>"),
        block("same", "Same", "<p>Same</p>"),
    ]
}

fn destination() -> FakeRemote {
    FakeRemote::new().with_records(
        RecordType::Block,
        vec![
            block("footer", "Footer", "<p>Old footer</p>"),
            block("same", "Same", "<p>Same</p>"),
        ],
    )
}

/// Creates for records missing in the destination, updates for different ones
fn requests_from(report: &ComparisonReport) -> Vec<SyncItemRequest> {
    report
        .entries
        .iter()
        .filter_map(|entry| match entry.outcome {
            ComparisonOutcome::MissingInDestination => Some(SyncItemRequest::create(&entry.identifier)),
            ComparisonOutcome::ExistsBothDifferent => Some(SyncItemRequest::update(&entry.identifier)),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_compare_plan_sync_converges() {
    let ws = TestWorkspace::new();
    let source = source_blocks();
    let remote = destination();
    ws.seed_snapshot("staging", RecordType::Block, source.clone());

    let report = compare(&source, &remote.records(RecordType::Block), RecordType::Block);
    assert_eq!(report.different, 1);
    assert_eq!(report.missing_in_destination, 1);
    let requests = requests_from(&report);
    assert_eq!(
        requests,
        vec![SyncItemRequest::update("footer"), SyncItemRequest::create("header")]
    );

    let preview = plan(
        &source,
        &remote.records(RecordType::Block),
        RecordType::Block,
        &requests,
        None,
    );
    assert_eq!((preview.total_changes, preview.creates, preview.updates), (2, 1, 1));
    assert!(remote.writes().is_empty());

    let stored_source = ws.snapshots().load("staging", RecordType::Block).unwrap().unwrap();
    let mut run = SyncRun::new("staging", "prod", RecordType::Block, requests);
    ws.runs().save(&run).unwrap();
    run_sync(&mut run, &stored_source, &remote, None, ExecuteOptions::default()).await;
    ws.runs().save(&run).unwrap();

    assert_eq!(run.status, SyncStatus::Completed);
    assert_eq!((run.items_synced, run.items_failed), (2, 0));

    // The planned payloads are exactly what was written
    let writes = remote.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(
        writes[0],
        RemoteCall::Update(RecordType::Block, "1".into(), preview.entries[0].result.clone())
    );
    assert_eq!(
        writes[1],
        RemoteCall::Create(RecordType::Block, preview.entries[1].result.clone())
    );

    // Timestamps belong to the destination; everything else now matches
    let after = compare(&source, &remote.records(RecordType::Block), RecordType::Block);
    assert_eq!(after.missing_in_destination, 0);
    for entry in &after.entries {
        assert!(
            entry
                .differences
                .iter()
                .all(|f| f == "creation_time" || f == "update_time"),
            "{} still differs in {:?}",
            entry.identifier,
            entry.differences
        );
    }

    let history = ws.runs().list(None).unwrap();
    assert_eq!(history, vec![run.clone()]);
    assert_eq!(ws.runs().get(&run.id).unwrap(), Some(run));
}

#[tokio::test]
async fn test_partial_failure_is_a_completed_run() {
    let source = source_blocks();
    let remote = destination().failing_on("header");

    let mut run = SyncRun::new(
        "staging",
        "prod",
        RecordType::Block,
        vec![SyncItemRequest::create("header"), SyncItemRequest::update("footer")],
    );
    run_sync(&mut run, &source, &remote, None, ExecuteOptions::with_concurrency(2)).await;

    assert_eq!(run.status, SyncStatus::Completed);
    assert_eq!((run.items_synced, run.items_failed), (1, 1));
    assert_eq!(run.outcomes[0].identifier, "header");
    assert!(run.outcomes[0].error.as_deref().unwrap().contains("HTTP 400"));
    assert!(run.outcomes[1].success);
}

#[tokio::test]
async fn test_listing_failure_fails_the_run() {
    let ws = TestWorkspace::new();
    let remote = destination().failing_list(RemoteError::Transport("connection refused".into()));

    let mut run = SyncRun::new("staging", "prod", RecordType::Block, vec![SyncItemRequest::create("header")]);
    run_sync(&mut run, &source_blocks(), &remote, None, ExecuteOptions::default()).await;
    ws.runs().save(&run).unwrap();

    assert_eq!(run.status, SyncStatus::Failed);
    assert!(run.error_message.as_deref().unwrap().contains("connection refused"));
    assert!(remote.writes().is_empty());
    assert_eq!(ws.runs().get(&run.id).unwrap().unwrap().status, SyncStatus::Failed);
}

#[tokio::test]
async fn test_store_mapping_reaches_the_destination() {
    let source = vec![block("header", "Header", "<p>Header</p>")];
    let remote = FakeRemote::new();
    let mapping = StoreViewMapping::new().with("0", "5");

    let mut run = SyncRun::new("staging", "prod", RecordType::Block, vec![SyncItemRequest::create("header")]);
    run_sync(&mut run, &source, &remote, Some(&mapping), ExecuteOptions::default()).await;

    let created = remote.records(RecordType::Block);
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].get("store_id"), &FieldValue::from(serde_json::json!([5])));
}
