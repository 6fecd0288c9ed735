//! Plan command implementation
//!
//! Dry run of a sync against the stored snapshots.

use colored::Colorize;
use recon_core::{PlanEntry, PlanReport, RecordType, SyncAction, plan};

use super::diff::format_value;
use crate::cli::ItemArgs;
use crate::context::AppContext;
use crate::error::Result;

/// Preview what a sync would write
pub fn run_plan(
    ctx: &AppContext,
    source: &str,
    destination: &str,
    record_type: RecordType,
    items: &ItemArgs,
    json: bool,
) -> Result<()> {
    let requests = items.requests()?;
    let mapping = items.mapping();
    let source_records = ctx.snapshot(source, record_type)?;
    let destination_records = ctx.snapshot(destination, record_type)?;

    let report = plan(
        &source_records,
        &destination_records,
        record_type,
        &requests,
        mapping.as_ref(),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_plan(&report, source, destination);
    }
    Ok(())
}

fn print_plan(report: &PlanReport, source: &str, destination: &str) {
    println!(
        "{} {} {} {} {}",
        "Plan".blue().bold(),
        report.record_type.to_string().cyan(),
        source.yellow(),
        "->".dimmed(),
        destination.yellow()
    );
    println!();

    for entry in &report.entries {
        print_entry(entry);
    }
    for skipped in &report.skipped {
        println!(
            "  {} {} {} ({})",
            "!".red(),
            skipped.action,
            skipped.identifier,
            skipped.reason.red()
        );
    }

    println!();
    println!(
        "{} changes: {} creates, {} updates, {} skipped",
        report.total_changes,
        report.creates.to_string().green(),
        report.updates.to_string().yellow(),
        report.skipped.len()
    );
    if report.total_changes > 0 {
        println!("Run {} to apply these changes.", "recon sync".cyan());
    }
}

fn print_entry(entry: &PlanEntry) {
    let marker = match entry.action {
        SyncAction::Create => "+".green(),
        SyncAction::Update => "~".yellow(),
    };
    let note = if entry.action == SyncAction::Create && entry.destination.is_some() {
        " (already exists in destination)".red().to_string()
    } else if entry.action == SyncAction::Update && entry.destination.is_none() {
        " (missing in destination)".red().to_string()
    } else {
        String::new()
    };
    println!("  {} {} {}{}", marker, entry.action, entry.identifier.bold(), note);

    // Fields whose value would change on the destination
    for (field, value) in entry.result.fields() {
        let current = entry
            .destination
            .as_ref()
            .map(|d| d.get(field))
            .filter(|v| !v.is_absent());
        match current {
            Some(current) if current == value => {}
            Some(current) => println!(
                "      {}: {} {} {}",
                field,
                short(format_value(current)).red(),
                "->".dimmed(),
                short(format_value(value)).green()
            ),
            None => println!("      {}: {}", field, short(format_value(value)).green()),
        }
    }
}

fn short(text: String) -> String {
    const MAX: usize = 60;
    if text.chars().count() <= MAX {
        return text;
    }
    let mut cut: String = text.chars().take(MAX - 3).collect();
    cut.push_str("...");
    cut
}
