//! Sync execution against a live destination

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use crate::identifier::RecordIndex;
use crate::record::Record;
use crate::record_type::RecordType;
use crate::remote::RemoteContent;
use crate::{Error, Result};

use super::merge::prepare;
use super::request::{StoreViewMapping, SyncAction, SyncItemRequest};

/// Result of attempting one sync item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub identifier: String,
    pub action: SyncAction,
    pub success: bool,
    /// Set on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Set on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncOutcome {
    pub fn succeeded(item: &SyncItemRequest, message: impl Into<String>) -> Self {
        Self {
            identifier: item.identifier.clone(),
            action: item.action,
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(item: &SyncItemRequest, error: impl Into<String>) -> Self {
        Self {
            identifier: item.identifier.clone(),
            action: item.action,
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Tuning for [`execute`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Maximum number of items in flight; values below 1 are treated as 1
    pub concurrency: usize,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

impl ExecuteOptions {
    pub fn with_concurrency(concurrency: usize) -> Self {
        Self { concurrency }
    }
}

/// Push the requested items to the destination.
///
/// The destination collection is listed once up front and not refreshed
/// while items run. Every request yields exactly one [`SyncOutcome`], in
/// input order, whatever happened to the others.
///
/// # Errors
///
/// Returns [`Error::DestinationListing`] if the upfront listing fails. No
/// item has been attempted at that point.
pub async fn execute<C>(
    source_records: &[Record],
    client: &C,
    record_type: RecordType,
    sync_items: &[SyncItemRequest],
    store_view_mapping: Option<&StoreViewMapping>,
    options: ExecuteOptions,
) -> Result<Vec<SyncOutcome>>
where
    C: RemoteContent + ?Sized,
{
    let destination_records = client
        .list(record_type)
        .await
        .map_err(|source| Error::DestinationListing {
            record_type,
            source,
        })?;

    let source_index = RecordIndex::build(source_records, record_type);
    let destination_index = RecordIndex::build(&destination_records, record_type);
    let ctx = ItemContext {
        source_index: &source_index,
        destination_index: &destination_index,
        client,
        record_type,
        store_view_mapping,
    };

    let ctx = &ctx;
    let outcomes: Vec<SyncOutcome> = stream::iter(sync_items)
        .map(move |item| ctx.run(item))
        .buffered(options.concurrency.max(1))
        .collect()
        .await;

    let synced = outcomes.iter().filter(|o| o.success).count();
    tracing::info!(
        record_type = %record_type,
        synced,
        failed = outcomes.len() - synced,
        "Sync batch finished"
    );

    Ok(outcomes)
}

struct ItemContext<'a, C: ?Sized> {
    source_index: &'a RecordIndex<'a>,
    destination_index: &'a RecordIndex<'a>,
    client: &'a C,
    record_type: RecordType,
    store_view_mapping: Option<&'a StoreViewMapping>,
}

impl<C: RemoteContent + ?Sized> ItemContext<'_, C> {
    async fn run(&self, item: &SyncItemRequest) -> SyncOutcome {
        let spec = self.record_type.spec();
        let identifier = &item.identifier;

        let Some(source) = self.source_index.get(identifier) else {
            tracing::warn!(%identifier, "Source item not found");
            return SyncOutcome::failed(item, format!("Source item not found: {identifier}"));
        };
        let destination = self.destination_index.get(identifier);

        let payload = prepare(
            source,
            destination,
            item.fields_to_sync.as_deref(),
            self.store_view_mapping,
            self.record_type,
        );

        let result = match (item.action, destination) {
            (SyncAction::Create, None) => {
                tracing::debug!(%identifier, "Creating {}", spec.singular);
                self.client
                    .create(self.record_type, &payload)
                    .await
                    .map(|_| format!("Created {} successfully", spec.singular))
            }
            (SyncAction::Update, Some(existing)) => {
                let Some(id) = existing.get(spec.primary_key).text_form() else {
                    return SyncOutcome::failed(
                        item,
                        format!(
                            "Cannot update {} '{identifier}': destination record has no '{}'",
                            spec.singular, spec.primary_key
                        ),
                    );
                };
                tracing::debug!(%identifier, %id, "Updating {}", spec.singular);
                self.client
                    .update(self.record_type, &id, &payload)
                    .await
                    .map(|_| format!("Updated {} successfully", spec.singular))
            }
            (SyncAction::Create, Some(_)) => {
                return SyncOutcome::failed(
                    item,
                    format!(
                        "Cannot create {} '{identifier}': it already exists in the destination",
                        spec.singular
                    ),
                );
            }
            (SyncAction::Update, None) => {
                return SyncOutcome::failed(
                    item,
                    format!(
                        "Cannot update {} '{identifier}': it does not exist in the destination",
                        spec.singular
                    ),
                );
            }
        };

        match result {
            Ok(message) => SyncOutcome::succeeded(item, message),
            Err(e) => {
                tracing::warn!(%identifier, error = %e, "Sync item failed");
                SyncOutcome::failed(item, e.to_string())
            }
        }
    }
}
