//! Sync command implementation

use colored::Colorize;
use recon_core::{ExecuteOptions, RecordType, SyncRun, SyncStatus};

use super::history::print_run;
use crate::cli::ItemArgs;
use crate::context::AppContext;
use crate::error::{CliError, Result};

/// Push records from the source snapshot to the destination instance.
///
/// The run is saved before execution and again with its final state. The
/// destination snapshot is refreshed afterwards when anything was written.
pub async fn run_sync(
    ctx: &AppContext,
    source: &str,
    destination: &str,
    record_type: RecordType,
    items: &ItemArgs,
    concurrency: Option<usize>,
    json: bool,
) -> Result<()> {
    let requests = items.requests()?;
    let mapping = items.mapping();
    let source_records = ctx.snapshot(source, record_type)?;
    let client = ctx.client(destination)?;
    let options = ExecuteOptions::with_concurrency(
        concurrency.unwrap_or(ctx.config.sync.concurrency),
    );

    let mut run = SyncRun::new(source, destination, record_type, requests);
    ctx.runs.save(&run)?;

    recon_core::run_sync(&mut run, &source_records, &client, mapping.as_ref(), options).await;
    ctx.runs.save(&run)?;

    if run.items_synced > 0 {
        if let Err(e) = ctx.refresh(destination, record_type).await {
            tracing::warn!(instance = destination, error = %e, "Could not refresh destination snapshot");
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        print_run(&run);
    }

    match run.status {
        SyncStatus::Failed => Err(CliError::user(format!(
            "Sync run {} failed: {}",
            run.id,
            run.error_message.as_deref().unwrap_or("unknown error")
        ))),
        _ if run.items_failed > 0 => Err(CliError::user(format!(
            "{} of {} items failed (run {})",
            run.items_failed,
            run.items.len(),
            run.id
        ))),
        _ => {
            if !json {
                println!();
                println!("{} Sync completed.", "OK".green().bold());
            }
            Ok(())
        }
    }
}
