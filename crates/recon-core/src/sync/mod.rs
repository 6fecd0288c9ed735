//! Sync planning and execution
//!
//! - [`prepare`]: merge one source record onto its destination counterpart
//! - [`plan`]: dry run over a batch of requests
//! - [`execute`]: push a batch through a [`RemoteContent`](crate::RemoteContent)
//! - [`run_sync`]: execute a batch on behalf of a tracked [`SyncRun`]

mod execute;
mod merge;
mod plan;
mod request;
mod run;

pub use execute::{ExecuteOptions, SyncOutcome, execute};
pub use merge::prepare;
pub use plan::{PlanEntry, PlanReport, SOURCE_NOT_FOUND, SkippedItem, plan};
pub use request::{StoreViewMapping, SyncAction, SyncItemRequest};
pub use run::{SyncRun, SyncStatus, run_sync};
