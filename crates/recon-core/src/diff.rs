//! Field-level diffing of a single record pair

use serde::{Deserialize, Serialize};

use crate::identifier::identifier_of;
use crate::record::Record;
use crate::record_type::{RecordType, STORE_FIELD};
use crate::value::FieldValue;
use crate::{Error, Result};

/// One comparable field read from both sides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDifference {
    pub field_name: String,
    pub source_value: FieldValue,
    pub destination_value: FieldValue,
    pub differs: bool,
}

/// Detailed diff of one record pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDiff {
    /// Resolved identifier (from source if present, else destination)
    pub identifier: String,
    pub record_type: RecordType,
    /// One entry per comparable field, in declared order
    pub fields: Vec<FieldDifference>,
    /// Store assignment of the source record
    pub source_stores: Vec<FieldValue>,
    /// Store assignment of the destination record
    pub destination_stores: Vec<FieldValue>,
    /// Whether the two store assignments differ as sets
    pub stores_differ: bool,
}

impl RecordDiff {
    /// Whether any field or the store assignment differs
    pub fn has_differences(&self) -> bool {
        self.stores_differ || self.fields.iter().any(|f| f.differs)
    }

    /// Names of the differing comparable fields in declared order, followed by
    /// `store_id` when the store assignment differs
    pub fn differing_fields(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .fields
            .iter()
            .filter(|f| f.differs)
            .map(|f| f.field_name.clone())
            .collect();
        if self.stores_differ {
            names.push(STORE_FIELD.to_string());
        }
        names
    }
}

/// Diff two optional records of the same type.
///
/// Every comparable field is reported, including fields absent on one or both
/// sides. An absent record reads as [`FieldValue::Absent`] for every field.
pub fn diff(source: Option<&Record>, destination: Option<&Record>, record_type: RecordType) -> RecordDiff {
    let fields = record_type
        .spec()
        .comparable_fields
        .iter()
        .map(|&field| {
            let source_value = read(source, field);
            let destination_value = read(destination, field);
            FieldDifference {
                field_name: field.to_string(),
                differs: source_value != destination_value,
                source_value,
                destination_value,
            }
        })
        .collect();

    let source_stores = store_assignment(source);
    let destination_stores = store_assignment(destination);
    let stores_differ = !same_set(&source_stores, &destination_stores);

    let identifier = source
        .or(destination)
        .map(|record| identifier_of(record, record_type))
        .unwrap_or_default();

    RecordDiff {
        identifier,
        record_type,
        fields,
        source_stores,
        destination_stores,
        stores_differ,
    }
}

/// Look up `identifier` in both collections and diff the pair.
///
/// Each side uses the first record for which any field of the identifier
/// chain equals `identifier`, so a page can be found by its `url_key` even
/// when it also carries an `identifier`.
///
/// # Errors
///
/// Returns [`Error::RecordNotFound`] if neither collection has the identifier.
pub fn diff_by_identifier(
    source_records: &[Record],
    destination_records: &[Record],
    record_type: RecordType,
    identifier: &str,
) -> Result<RecordDiff> {
    let source = first_match(source_records, record_type, identifier);
    let destination = first_match(destination_records, record_type, identifier);
    if source.is_none() && destination.is_none() {
        return Err(Error::RecordNotFound {
            identifier: identifier.to_string(),
        });
    }

    let mut result = diff(source, destination, record_type);
    result.identifier = identifier.to_string();
    Ok(result)
}

fn first_match<'a>(records: &'a [Record], record_type: RecordType, identifier: &str) -> Option<&'a Record> {
    records.iter().find(|r| record_type.matches(r, identifier))
}

fn read(record: Option<&Record>, field: &str) -> FieldValue {
    record.map(|r| r.get(field).clone()).unwrap_or_default()
}

/// Store ids of a record as a list; a scalar is a one-element list
fn store_assignment(record: Option<&Record>) -> Vec<FieldValue> {
    match record.map(|r| r.get(STORE_FIELD)) {
        None | Some(FieldValue::Absent) => Vec::new(),
        Some(FieldValue::List(items)) => items.clone(),
        Some(scalar) => vec![scalar.clone()],
    }
}

/// Set equality under [`FieldValue`] equality (order and duplicates ignored)
fn same_set(a: &[FieldValue], b: &[FieldValue]) -> bool {
    a.iter().all(|x| b.contains(x)) && b.iter().all(|y| a.contains(y))
}
