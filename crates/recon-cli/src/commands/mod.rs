//! Command implementations for recon-cli

pub mod compare;
pub mod diff;
pub mod history;
pub mod instance;
pub mod items;
pub mod plan;
pub mod refresh;
pub mod sync;

pub use compare::run_compare;
pub use diff::run_diff;
pub use history::{run_history, run_status};
pub use instance::run_instance;
pub use plan::run_plan;
pub use refresh::run_refresh;
pub use sync::run_sync;
