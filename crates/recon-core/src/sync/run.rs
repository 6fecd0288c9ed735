//! Sync run lifecycle
//!
//! A [`SyncRun`] records one execution of a sync batch. The engine drives its
//! state; persisting it is the caller's business.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::Record;
use crate::record_type::RecordType;
use crate::remote::RemoteContent;

use super::execute::{ExecuteOptions, SyncOutcome, execute};
use super::request::{StoreViewMapping, SyncItemRequest};

/// Lifecycle state of a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl SyncStatus {
    /// Whether the run has reached a final state
    pub fn is_terminal(self) -> bool {
        matches!(self, SyncStatus::Completed | SyncStatus::Failed)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncStatus::Pending => "pending",
            SyncStatus::InProgress => "in_progress",
            SyncStatus::Completed => "completed",
            SyncStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One recorded sync execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRun {
    pub id: Uuid,
    pub source_instance: String,
    pub destination_instance: String,
    pub record_type: RecordType,
    pub status: SyncStatus,
    pub items_synced: usize,
    pub items_failed: usize,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub items: Vec<SyncItemRequest>,
    #[serde(default)]
    pub outcomes: Vec<SyncOutcome>,
}

impl SyncRun {
    /// Create a pending run
    pub fn new(
        source_instance: impl Into<String>,
        destination_instance: impl Into<String>,
        record_type: RecordType,
        items: Vec<SyncItemRequest>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_instance: source_instance.into(),
            destination_instance: destination_instance.into(),
            record_type,
            status: SyncStatus::Pending,
            items_synced: 0,
            items_failed: 0,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            error_message: None,
            items,
            outcomes: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.status = SyncStatus::InProgress;
        self.started_at = Some(Utc::now());
    }

    /// Record the outcomes and derive the counts from their success flags
    pub fn complete(&mut self, outcomes: Vec<SyncOutcome>) {
        self.items_synced = outcomes.iter().filter(|o| o.success).count();
        self.items_failed = outcomes.len() - self.items_synced;
        self.outcomes = outcomes;
        self.status = SyncStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = SyncStatus::Failed;
        self.error_message = Some(message.into());
        self.completed_at = Some(Utc::now());
    }
}

/// Execute a run's items and record the result on the run.
///
/// Item-level failures are part of a completed run. The run is marked failed
/// only when execution as a whole does not finish: the upfront destination
/// listing fails, or the executor panics.
pub async fn run_sync<C>(
    run: &mut SyncRun,
    source_records: &[Record],
    client: &C,
    store_view_mapping: Option<&StoreViewMapping>,
    options: ExecuteOptions,
) where
    C: RemoteContent + ?Sized,
{
    run.start();
    tracing::info!(run_id = %run.id, items = run.items.len(), "Starting sync run");

    let result = AssertUnwindSafe(execute(
        source_records,
        client,
        run.record_type,
        &run.items,
        store_view_mapping,
        options,
    ))
    .catch_unwind()
    .await;

    match result {
        Ok(Ok(outcomes)) => {
            run.complete(outcomes);
            tracing::info!(
                run_id = %run.id,
                synced = run.items_synced,
                failed = run.items_failed,
                "Sync run completed"
            );
        }
        Ok(Err(e)) => {
            tracing::warn!(run_id = %run.id, error = %e, "Sync run failed");
            run.fail(e.to_string());
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            tracing::warn!(run_id = %run.id, error = %message, "Sync run panicked");
            run.fail(message);
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Sync execution panicked".to_string()
    }
}
