//! Magento REST client for the reconciliation tool
//!
//! [`MagentoClient`] implements [`recon_core::RemoteContent`] on top of the
//! Magento 2 `/rest/V1/` API:
//!
//! - `list` pages through `cmsBlock/search` / `cmsPage/search`
//! - `create` posts `{"block": ...}` / `{"page": ...}` to the resource
//! - `update` puts the same envelope to `<resource>/<id>`
//!
//! Retries of transient failures happen here, beneath the engine.

pub mod client;
pub mod config;
pub mod error;
pub mod retry;

pub use client::MagentoClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use retry::LinearBackoff;
