//! Shared test utilities for the cms-recon workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`records`]: block and page builders with realistic fields
//! - [`remote`]: [`FakeRemote`], an in-memory destination with failure injection
//! - [`workspace`]: [`TestWorkspace`], a temporary data directory

pub mod records;
pub mod remote;
pub mod workspace;

pub use records::{block, page};
pub use remote::{FakeRemote, RemoteCall};
pub use workspace::TestWorkspace;
