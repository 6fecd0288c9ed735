//! Compare command implementation

use colored::{ColoredString, Colorize};
use recon_core::{ComparisonEntry, ComparisonOutcome, ComparisonReport, RecordType, compare};

use crate::context::AppContext;
use crate::error::Result;

/// Compare the snapshots of two instances
pub async fn run_compare(
    ctx: &AppContext,
    source: &str,
    destination: &str,
    record_type: RecordType,
    refresh: bool,
    show: Option<ComparisonOutcome>,
    json: bool,
) -> Result<()> {
    if refresh {
        ctx.refresh(source, record_type).await?;
        ctx.refresh(destination, record_type).await?;
    }

    let source_records = ctx.snapshot(source, record_type)?;
    let destination_records = ctx.snapshot(destination, record_type)?;
    let mut report = compare(&source_records, &destination_records, record_type);

    if let Some(outcome) = show {
        report.entries.retain(|e| e.outcome == outcome);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, source, destination, show.is_some());
    }
    Ok(())
}

fn print_report(report: &ComparisonReport, source: &str, destination: &str, filtered: bool) {
    println!(
        "{} {} {} {} {}",
        "Compare".blue().bold(),
        report.record_type.to_string().cyan(),
        source.yellow(),
        "->".dimmed(),
        destination.yellow()
    );
    println!();
    println!(
        "  {}: {}   {}: {}",
        "Source".dimmed(),
        report.total_source,
        "Destination".dimmed(),
        report.total_destination
    );
    println!(
        "  {}: {}   {}: {}   {}: {}   {}: {}",
        "In both".dimmed(),
        report.exists_in_both,
        "Different".dimmed(),
        report.different,
        "Missing in destination".dimmed(),
        report.missing_in_destination,
        "Missing in source".dimmed(),
        report.missing_in_source
    );
    println!();

    // Without a filter, equal records are noise
    let shown: Vec<&ComparisonEntry> = report
        .entries
        .iter()
        .filter(|e| filtered || e.outcome != ComparisonOutcome::ExistsBothEqual)
        .collect();

    if shown.is_empty() {
        if filtered {
            println!("{}", "No matching records.".dimmed());
        } else {
            println!("{} Instances are in sync.", "OK".green().bold());
        }
        return;
    }

    for entry in shown {
        let mut line = format!("  {} {}", marker(entry.outcome), entry.identifier);
        if !entry.title.is_empty() && entry.title != entry.identifier {
            line.push_str(&format!(" {}", format!("({})", entry.title).dimmed()));
        }
        if !entry.differences.is_empty() {
            line.push_str(&format!(" [{}]", entry.differences.join(", ").yellow()));
        }
        println!("{line}");
    }
}

fn marker(outcome: ComparisonOutcome) -> ColoredString {
    match outcome {
        ComparisonOutcome::ExistsBothEqual => "=".normal(),
        ComparisonOutcome::ExistsBothDifferent => "~".yellow(),
        ComparisonOutcome::MissingInDestination => "+".green(),
        ComparisonOutcome::MissingInSource => "-".red(),
    }
}
