//! Set-based comparison of two record collections

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::diff::diff;
use crate::identifier::{RecordIndex, title_of};
use crate::record::Record;
use crate::record_type::RecordType;

/// Classification of one identifier in a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonOutcome {
    ExistsBothEqual,
    ExistsBothDifferent,
    MissingInDestination,
    MissingInSource,
}

impl ComparisonOutcome {
    pub const ALL: [ComparisonOutcome; 4] = [
        ComparisonOutcome::ExistsBothEqual,
        ComparisonOutcome::ExistsBothDifferent,
        ComparisonOutcome::MissingInDestination,
        ComparisonOutcome::MissingInSource,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOutcome::ExistsBothEqual => "EXISTS_BOTH_EQUAL",
            ComparisonOutcome::ExistsBothDifferent => "EXISTS_BOTH_DIFFERENT",
            ComparisonOutcome::MissingInDestination => "MISSING_IN_DESTINATION",
            ComparisonOutcome::MissingInSource => "MISSING_IN_SOURCE",
        }
    }

    /// Whether the identifier exists on both sides
    pub fn in_both(self) -> bool {
        matches!(
            self,
            ComparisonOutcome::ExistsBothEqual | ComparisonOutcome::ExistsBothDifferent
        )
    }
}

impl fmt::Display for ComparisonOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonOutcome {
    type Err = Error;

    /// Accepts the wire names and their lowercase/kebab forms
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|outcome| outcome.as_str() == normalized)
            .ok_or_else(|| Error::InvalidOutcome {
                value: s.to_string(),
            })
    }
}

/// Per-identifier line of a comparison report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub identifier: String,
    /// Display title, from the source record when present
    pub title: String,
    pub outcome: ComparisonOutcome,
    /// Comparable fields that differ (only for `EXISTS_BOTH_DIFFERENT`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub differences: Vec<String>,
    pub source: Option<Record>,
    pub destination: Option<Record>,
}

/// Result of comparing two collections of one record type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub record_type: RecordType,
    /// Records in the source collection (before identifier de-duplication)
    pub total_source: usize,
    /// Records in the destination collection (before identifier de-duplication)
    pub total_destination: usize,
    pub exists_in_both: usize,
    pub different: usize,
    pub missing_in_destination: usize,
    pub missing_in_source: usize,
    /// One entry per identifier, sorted by identifier
    pub entries: Vec<ComparisonEntry>,
}

impl ComparisonReport {
    /// Number of entries with the given outcome
    pub fn count(&self, outcome: ComparisonOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    /// Entries with the given outcome, in report order
    pub fn entries_with(&self, outcome: ComparisonOutcome) -> impl Iterator<Item = &ComparisonEntry> {
        self.entries.iter().filter(move |e| e.outcome == outcome)
    }

    /// True when both sides hold the same identifiers with equal content
    pub fn is_in_sync(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.outcome == ComparisonOutcome::ExistsBothEqual)
    }
}

/// Compare a source collection with a destination collection.
///
/// Identifiers from both sides are visited in sorted order, so identical
/// inputs always produce identical reports. Duplicate identifiers within a
/// side follow [`COLLISION_POLICY`](crate::COLLISION_POLICY).
pub fn compare(
    source_records: &[Record],
    destination_records: &[Record],
    record_type: RecordType,
) -> ComparisonReport {
    let source_index = RecordIndex::build(source_records, record_type);
    let destination_index = RecordIndex::build(destination_records, record_type);

    let identifiers: BTreeSet<&str> = source_index
        .identifiers()
        .chain(destination_index.identifiers())
        .collect();

    let mut report = ComparisonReport {
        record_type,
        total_source: source_records.len(),
        total_destination: destination_records.len(),
        exists_in_both: 0,
        different: 0,
        missing_in_destination: 0,
        missing_in_source: 0,
        entries: Vec::with_capacity(identifiers.len()),
    };

    for identifier in identifiers {
        let source = source_index.get(identifier);
        let destination = destination_index.get(identifier);

        let (outcome, differences) = match (source, destination) {
            (Some(s), Some(d)) => {
                report.exists_in_both += 1;
                let record_diff = diff(Some(s), Some(d), record_type);
                if record_diff.has_differences() {
                    report.different += 1;
                    (
                        ComparisonOutcome::ExistsBothDifferent,
                        record_diff.differing_fields(),
                    )
                } else {
                    (ComparisonOutcome::ExistsBothEqual, Vec::new())
                }
            }
            (Some(_), None) => {
                report.missing_in_destination += 1;
                (ComparisonOutcome::MissingInDestination, Vec::new())
            }
            (None, Some(_)) => {
                report.missing_in_source += 1;
                (ComparisonOutcome::MissingInSource, Vec::new())
            }
            (None, None) => continue,
        };

        let title = source
            .or(destination)
            .map(|record| title_of(record, record_type))
            .unwrap_or_default();

        report.entries.push(ComparisonEntry {
            identifier: identifier.to_string(),
            title,
            outcome,
            differences,
            source: source.cloned(),
            destination: destination.cloned(),
        });
    }

    tracing::debug!(
        record_type = %record_type,
        exists_in_both = report.exists_in_both,
        different = report.different,
        missing_in_destination = report.missing_in_destination,
        missing_in_source = report.missing_in_source,
        "Compared collections"
    );

    report
}
