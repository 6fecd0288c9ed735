//! History and status commands

use colored::{ColoredString, Colorize};
use recon_core::{SyncRun, SyncStatus};
use uuid::Uuid;

use crate::context::AppContext;
use crate::error::{CliError, Result};

/// List recorded runs, newest first
pub fn run_history(ctx: &AppContext, limit: usize, json: bool) -> Result<()> {
    let runs = ctx.runs.list(Some(limit))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&runs)?);
        return Ok(());
    }

    if runs.is_empty() {
        println!("{}", "No sync runs recorded.".dimmed());
        return Ok(());
    }

    println!("{}", "Sync runs".bold());
    println!();
    for run in &runs {
        println!(
            "  {} {} {} {} {} {} {}/{} {}",
            run.id.to_string().dimmed(),
            run.created_at.format("%Y-%m-%d %H:%M:%S"),
            run.record_type.to_string().cyan(),
            run.source_instance,
            "->".dimmed(),
            run.destination_instance,
            run.items_synced,
            run.items.len(),
            status_label(run.status)
        );
    }
    Ok(())
}

/// Show one run
pub fn run_status(ctx: &AppContext, run_id: &Uuid, json: bool) -> Result<()> {
    let run = ctx
        .runs
        .get(run_id)?
        .ok_or_else(|| CliError::user(format!("Sync run not found: {run_id}")))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        print_run(&run);
    }
    Ok(())
}

/// Human-readable summary of a run and its outcomes
pub fn print_run(run: &SyncRun) {
    println!(
        "{} {} {}",
        "Run".blue().bold(),
        run.id.to_string().yellow(),
        status_label(run.status)
    );
    println!(
        "  {}: {} {} {} ({})",
        "Sync".dimmed(),
        run.source_instance,
        "->".dimmed(),
        run.destination_instance,
        run.record_type
    );
    println!(
        "  {}: {}   {}: {}",
        "Synced".dimmed(),
        run.items_synced,
        "Failed".dimmed(),
        run.items_failed
    );
    if let Some(completed) = run.completed_at {
        println!("  {}: {}", "Finished".dimmed(), completed.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(message) = &run.error_message {
        println!("  {}: {}", "Error".red(), message);
    }

    if !run.outcomes.is_empty() {
        println!();
        for outcome in &run.outcomes {
            if outcome.success {
                println!(
                    "  {} {} {}",
                    "+".green(),
                    outcome.identifier,
                    outcome.message.as_deref().unwrap_or_default().dimmed()
                );
            } else {
                println!(
                    "  {} {} {}",
                    "!".red(),
                    outcome.identifier,
                    outcome.error.as_deref().unwrap_or_default().red()
                );
            }
        }
    }
}

fn status_label(status: SyncStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        SyncStatus::Completed => label.green(),
        SyncStatus::Failed => label.red(),
        SyncStatus::InProgress => label.yellow(),
        SyncStatus::Pending => label.dimmed(),
    }
}
