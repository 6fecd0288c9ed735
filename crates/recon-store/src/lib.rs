//! Local persistence for the reconciliation tool
//!
//! Everything lives under one data directory:
//!
//! ```text
//! <data_dir>/
//! ├── instances.toml                 InstanceRegistry
//! ├── instances/<id>/<type>.json     SnapshotStore
//! └── runs/<run_id>.json             RunStore
//! ```
//!
//! All writes go through [`io::write_atomic`].

pub mod config;
pub mod error;
pub mod history;
pub mod io;
pub mod registry;
pub mod snapshot;

pub use config::{ConfigStore, Format};
pub use error::{Error, Result};
pub use history::RunStore;
pub use registry::{Instance, InstanceRegistry, InstanceUpdate, validate_instance_id, validate_url};
pub use snapshot::{SnapshotInfo, SnapshotStore};
