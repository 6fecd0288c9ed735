//! Dry-run sync planning

use serde::{Deserialize, Serialize};

use crate::identifier::RecordIndex;
use crate::record::Record;
use crate::record_type::RecordType;

use super::merge::prepare;
use super::request::{StoreViewMapping, SyncAction, SyncItemRequest};

/// Reason recorded for a request whose source record does not exist
pub const SOURCE_NOT_FOUND: &str = "source not found";

/// What a sync would write for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub identifier: String,
    pub action: SyncAction,
    pub source: Record,
    pub destination: Option<Record>,
    /// The exact payload the sync would send
    pub result: Record,
}

/// A request the planner could not turn into an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub identifier: String,
    pub action: SyncAction,
    pub reason: String,
}

/// Dry-run output of [`plan`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    pub record_type: RecordType,
    pub entries: Vec<PlanEntry>,
    #[serde(default)]
    pub skipped: Vec<SkippedItem>,
    /// Number of entries
    pub total_changes: usize,
    /// Entries requesting `create`
    pub creates: usize,
    /// Entries requesting `update`
    pub updates: usize,
}

/// Compute what a sync would send without sending it.
///
/// Requests are handled in input order. A request whose source record is
/// missing becomes a [`SkippedItem`] and is not counted. Creates and updates
/// are counted from the requested action alone.
pub fn plan(
    source_records: &[Record],
    destination_records: &[Record],
    record_type: RecordType,
    sync_items: &[SyncItemRequest],
    store_view_mapping: Option<&StoreViewMapping>,
) -> PlanReport {
    let source_index = RecordIndex::build(source_records, record_type);
    let destination_index = RecordIndex::build(destination_records, record_type);

    let mut report = PlanReport {
        record_type,
        entries: Vec::with_capacity(sync_items.len()),
        skipped: Vec::new(),
        total_changes: 0,
        creates: 0,
        updates: 0,
    };

    for item in sync_items {
        let Some(source) = source_index.get(&item.identifier) else {
            tracing::debug!(identifier = %item.identifier, "Skipping plan item, source not found");
            report.skipped.push(SkippedItem {
                identifier: item.identifier.clone(),
                action: item.action,
                reason: SOURCE_NOT_FOUND.to_string(),
            });
            continue;
        };
        let destination = destination_index.get(&item.identifier);

        let result = prepare(
            source,
            destination,
            item.fields_to_sync.as_deref(),
            store_view_mapping,
            record_type,
        );

        match item.action {
            SyncAction::Create => report.creates += 1,
            SyncAction::Update => report.updates += 1,
        }

        report.entries.push(PlanEntry {
            identifier: item.identifier.clone(),
            action: item.action,
            source: source.clone(),
            destination: destination.cloned(),
            result,
        });
    }

    report.total_changes = report.entries.len();
    report
}
