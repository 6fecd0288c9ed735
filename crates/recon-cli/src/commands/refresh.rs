//! Refresh command implementation

use colored::Colorize;
use recon_core::RecordType;

use crate::context::AppContext;
use crate::error::Result;

/// Fetch an instance's records and save them as its snapshot
pub async fn run_refresh(ctx: &AppContext, instance: &str, record_type: RecordType) -> Result<()> {
    let info = ctx.refresh(instance, record_type).await?;
    println!(
        "{} Saved {} {} from {}",
        "OK".green().bold(),
        info.item_count,
        record_type,
        instance.cyan()
    );
    Ok(())
}
