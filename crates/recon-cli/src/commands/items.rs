//! Turn `--items` / `--create` / `--update` arguments into sync requests

use std::fs;

use recon_core::{StoreViewMapping, SyncItemRequest};

use crate::cli::ItemArgs;
use crate::error::{CliError, Result};

impl ItemArgs {
    /// Requests in argument order: creates first, then updates.
    ///
    /// `--fields` applies to updates only.
    pub fn requests(&self) -> Result<Vec<SyncItemRequest>> {
        let requests = match &self.items {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    CliError::user(format!("Cannot read items file {}: {e}", path.display()))
                })?;
                serde_json::from_str::<Vec<SyncItemRequest>>(&content).map_err(|e| {
                    CliError::user(format!("Invalid items file {}: {e}", path.display()))
                })?
            }
            None => {
                let creates = self.create.iter().map(SyncItemRequest::create);
                let updates = self.update.iter().map(|id| {
                    let request = SyncItemRequest::update(id);
                    if self.fields.is_empty() {
                        request
                    } else {
                        request.with_fields(&self.fields)
                    }
                });
                creates.chain(updates).collect()
            }
        };

        if requests.is_empty() {
            return Err(CliError::user(
                "No items given. Use --items, --create or --update.",
            ));
        }
        Ok(requests)
    }

    /// Store view mapping, if any `--store-map` was given
    pub fn mapping(&self) -> Option<StoreViewMapping> {
        if self.store_map.is_empty() {
            return None;
        }
        Some(self.store_map.iter().cloned().collect())
    }
}
