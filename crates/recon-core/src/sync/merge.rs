//! Sync item merger
//!
//! Builds the exact record a sync pushes to the destination from a source
//! record, the matching destination record (if any), an optional field
//! subset and an optional store view mapping.

use crate::record::Record;
use crate::record_type::{BOOKKEEPING_FIELDS, RecordType, STORE_FIELD};
use crate::value::FieldValue;

use super::request::StoreViewMapping;

/// Prepare the payload for one sync item.
///
/// - Full sync: the source body with the destination's identity fields
///   (`id` and `block_id`/`page_id`, when present on the destination).
/// - Partial sync (`fields_to_sync` non-empty and a destination exists): the
///   destination body with only the named fields taken from the source.
///
/// Store ids are then mapped and bookkeeping timestamps stripped. The inputs
/// are never modified.
pub fn prepare(
    source: &Record,
    destination: Option<&Record>,
    fields_to_sync: Option<&[String]>,
    store_view_mapping: Option<&StoreViewMapping>,
    record_type: RecordType,
) -> Record {
    let mut merged = source.clone();

    if let Some(destination) = destination {
        for &field in record_type.spec().identity_fields {
            if destination.has_field(field) {
                merged.insert(field, destination.get(field).clone());
            }
        }

        if let Some(fields) = fields_to_sync.filter(|f| !f.is_empty()) {
            merged = destination.clone();
            for field in fields {
                if source.has_field(field) {
                    merged.insert(field.clone(), source.get(field).clone());
                }
            }
        }
    }

    if let Some(mapping) = store_view_mapping.filter(|m| !m.is_empty()) {
        if let Some(stores) = merged.remove(STORE_FIELD) {
            merged.insert(STORE_FIELD, map_stores(stores, mapping));
        }
    }

    for field in BOOKKEEPING_FIELDS {
        merged.remove(field);
    }

    merged
}

fn map_stores(stores: FieldValue, mapping: &StoreViewMapping) -> FieldValue {
    match stores {
        FieldValue::List(ids) => {
            FieldValue::List(ids.into_iter().map(|id| map_store_id(id, mapping)).collect())
        }
        FieldValue::Absent => FieldValue::Absent,
        scalar => map_store_id(scalar, mapping),
    }
}

/// Map one store id by its text form; unmapped ids pass through
fn map_store_id(id: FieldValue, mapping: &StoreViewMapping) -> FieldValue {
    let Some(mapped) = id.text_form().and_then(|key| mapping.get(&key)) else {
        return id;
    };
    match (&id, mapped.parse::<i64>()) {
        (FieldValue::Number(_), Ok(n)) => FieldValue::from(n),
        _ => FieldValue::from(mapped),
    }
}
