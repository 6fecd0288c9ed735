//! Identifier and title resolution, and identifier lookup tables

use std::collections::BTreeMap;

use crate::record::Record;
use crate::record_type::RecordType;

/// How duplicate identifiers within one collection are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// The first record with an identifier is kept
    FirstWins,
    /// Each later record with the same identifier replaces the earlier one
    LastWins,
}

/// Policy used by every index the engine builds.
///
/// Comparison, planning and execution share it, so the record that was
/// compared is the record that gets synced. Callers that want first-wins
/// must de-duplicate their input.
pub const COLLISION_POLICY: CollisionPolicy = CollisionPolicy::LastWins;

/// Resolve the identifier of a record.
///
/// Walks the type's identifier chain and returns the first value with a
/// non-empty text form; empty text if none does. A page with
/// `identifier: ""` and `url_key: "about-us"` resolves to `"about-us"`.
pub fn identifier_of(record: &Record, record_type: RecordType) -> String {
    first_non_empty(record, record_type.spec().identifier_chain)
}

/// Resolve a human-readable title (`title`, else `content_heading`).
pub fn title_of(record: &Record, record_type: RecordType) -> String {
    first_non_empty(record, record_type.spec().title_chain)
}

fn first_non_empty(record: &Record, chain: &[&str]) -> String {
    chain
        .iter()
        .filter_map(|field| record.get(field).text_form())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

/// Identifier to record lookup table over a borrowed collection
#[derive(Debug, Clone)]
pub struct RecordIndex<'a> {
    record_type: RecordType,
    by_identifier: BTreeMap<String, &'a Record>,
}

impl<'a> RecordIndex<'a> {
    /// Build an index using [`COLLISION_POLICY`]
    pub fn build(records: &'a [Record], record_type: RecordType) -> Self {
        Self::build_with_policy(records, record_type, COLLISION_POLICY)
    }

    /// Build an index with an explicit collision policy
    pub fn build_with_policy(
        records: &'a [Record],
        record_type: RecordType,
        policy: CollisionPolicy,
    ) -> Self {
        let mut by_identifier = BTreeMap::new();
        for record in records {
            let identifier = identifier_of(record, record_type);
            match policy {
                CollisionPolicy::LastWins => {
                    by_identifier.insert(identifier, record);
                }
                CollisionPolicy::FirstWins => {
                    by_identifier.entry(identifier).or_insert(record);
                }
            }
        }
        Self {
            record_type,
            by_identifier,
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn get(&self, identifier: &str) -> Option<&'a Record> {
        self.by_identifier.get(identifier).copied()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.by_identifier.contains_key(identifier)
    }

    /// Identifiers in sorted order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.by_identifier.keys().map(String::as_str)
    }

    /// Number of distinct identifiers
    pub fn len(&self) -> usize {
        self.by_identifier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_identifier.is_empty()
    }
}
