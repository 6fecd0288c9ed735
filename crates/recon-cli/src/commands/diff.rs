//! Diff command implementation
//!
//! Prints every comparable field of one record pair. Differing text that
//! spans lines is shown as a line diff.

use colored::Colorize;
use recon_core::{FieldDifference, FieldValue, RecordDiff, RecordType, diff_by_identifier};
use similar::{ChangeTag, TextDiff};

use crate::context::AppContext;
use crate::error::Result;

/// Text longer than this is diffed line by line instead of printed inline
const INLINE_LIMIT: usize = 80;

/// Show a field-by-field diff of one record
pub fn run_diff(
    ctx: &AppContext,
    source: &str,
    destination: &str,
    record_type: RecordType,
    identifier: &str,
    json: bool,
) -> Result<()> {
    let source_records = ctx.snapshot(source, record_type)?;
    let destination_records = ctx.snapshot(destination, record_type)?;
    let diff = diff_by_identifier(&source_records, &destination_records, record_type, identifier)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
    } else {
        print_diff(&diff, source, destination);
    }
    Ok(())
}

/// Render a field value for terminal output
pub fn format_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Absent => "(absent)".to_string(),
        FieldValue::Text(s) => format!("{s:?}"),
        other => other
            .text_form()
            .unwrap_or_else(|| other.clone().into_json().to_string()),
    }
}

fn print_diff(diff: &RecordDiff, source: &str, destination: &str) {
    println!(
        "{} {} {} ({} {} {})",
        "Diff".blue().bold(),
        diff.record_type.spec().singular,
        diff.identifier.cyan(),
        source.yellow(),
        "->".dimmed(),
        destination.yellow()
    );
    println!();

    for field in &diff.fields {
        print_field(field);
    }

    let stores = |values: &[FieldValue]| {
        values
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let marker = if diff.stores_differ { "~".yellow() } else { "=".normal() };
    println!(
        "  {} {}: [{}] {} [{}]",
        marker,
        "stores".bold(),
        stores(&diff.source_stores),
        "->".dimmed(),
        stores(&diff.destination_stores)
    );

    println!();
    if diff.has_differences() {
        println!(
            "Differs in: {}",
            diff.differing_fields().join(", ").yellow()
        );
    } else {
        println!("{} Records are identical.", "OK".green().bold());
    }
}

fn print_field(field: &FieldDifference) {
    if !field.differs {
        println!(
            "  {} {}: {}",
            "=".normal(),
            field.field_name.bold(),
            format_value(&field.source_value).dimmed()
        );
        return;
    }

    match (field.source_value.as_str(), field.destination_value.as_str()) {
        (Some(src), Some(dst)) if is_long(src) || is_long(dst) => {
            println!("  {} {}:", "~".yellow(), field.field_name.bold());
            print_text_diff(dst, src);
        }
        _ => println!(
            "  {} {}: {} {} {}",
            "~".yellow(),
            field.field_name.bold(),
            format_value(&field.source_value).green(),
            "->".dimmed(),
            format_value(&field.destination_value).red()
        ),
    }
}

fn is_long(text: &str) -> bool {
    text.contains('\n') || text.len() > INLINE_LIMIT
}

/// Lines only in the destination are removed by a sync, lines only in the
/// source are added
fn print_text_diff(destination: &str, source: &str) {
    let diff = TextDiff::from_lines(destination, source);
    for change in diff.iter_all_changes() {
        let line = change.value().trim_end_matches('\n');
        match change.tag() {
            ChangeTag::Delete => println!("      {} {}", "-".red(), line.red()),
            ChangeTag::Insert => println!("      {} {}", "+".green(), line.green()),
            ChangeTag::Equal => println!("        {}", line.dimmed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&FieldValue::Absent), "(absent)");
        assert_eq!(format_value(&FieldValue::from("Footer")), "\"Footer\"");
        assert_eq!(format_value(&FieldValue::from(true)), "true");
        assert_eq!(format_value(&FieldValue::from(vec![0, 1])), "[0,1]");
    }

    #[test]
    fn test_is_long() {
        assert!(!is_long("short"));
        assert!(is_long("two\nlines"));
        assert!(is_long(&"x".repeat(INLINE_LIMIT + 1)));
    }
}
