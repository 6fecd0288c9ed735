//! Reconciliation engine for CMS content records
//!
//! Compares two collections of content records pulled from two instances of
//! the same content system, diffs single records field by field, and plans or
//! executes a sync from a source collection to a destination.
//!
//! - **Identifier resolution**: [`identifier_of`] and [`title_of`] walk the
//!   per-type field chains of the [`RecordTypeSpec`] table
//! - **Comparison**: [`compare`] partitions identifiers into equal, different
//!   and missing on either side
//! - **Field diff**: [`diff`] reports every comparable field of one pair
//! - **Sync**: [`prepare`], [`plan`], [`execute`] and the [`SyncRun`] tracker
//!
//! # Architecture
//!
//! ```text
//! identifier ──> diff ──> compare
//!      │
//!      └──────> merge ──> plan ──> execute ──> run
//!                                     │
//!                               RemoteContent
//! ```
//!
//! Everything except [`execute`] and [`run_sync`] is a pure function of its
//! inputs.
//!
//! # Example
//!
//! ```
//! use recon_core::{ComparisonOutcome, Record, RecordType, compare};
//!
//! let source = vec![Record::new().with("identifier", "footer").with("title", "Footer")];
//! let report = compare(&source, &[], RecordType::Block);
//! assert_eq!(report.missing_in_destination, 1);
//! assert_eq!(report.entries[0].outcome, ComparisonOutcome::MissingInDestination);
//! ```

pub mod compare;
pub mod diff;
pub mod error;
pub mod identifier;
pub mod record;
pub mod record_type;
pub mod remote;
pub mod sync;
pub mod value;

pub use compare::{ComparisonEntry, ComparisonOutcome, ComparisonReport, compare};
pub use diff::{FieldDifference, RecordDiff, diff, diff_by_identifier};
pub use error::{Error, Result};
pub use identifier::{COLLISION_POLICY, CollisionPolicy, RecordIndex, identifier_of, title_of};
pub use record::Record;
pub use record_type::{BOOKKEEPING_FIELDS, RecordType, RecordTypeSpec, STORE_FIELD};
pub use remote::{RemoteContent, RemoteError, RemoteResult};
pub use sync::{
    ExecuteOptions, PlanEntry, PlanReport, SkippedItem, StoreViewMapping, SyncAction,
    SyncItemRequest, SyncOutcome, SyncRun, SyncStatus, execute, plan, prepare, run_sync,
};
pub use value::FieldValue;
