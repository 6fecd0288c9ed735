//! Record type configuration table
//!
//! Every type-specific rule the engine applies (identifier fallback chain,
//! comparable fields, identity fields, remote resource names) lives in a
//! [`RecordTypeSpec`]. The algorithms only ever read the table, so adding a
//! record type means adding a row here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::record::Record;

/// Field holding a record's store view assignment
pub const STORE_FIELD: &str = "store_id";

/// Destination-assigned bookkeeping fields that are never pushed on sync
pub const BOOKKEEPING_FIELDS: &[&str] = &["creation_time", "update_time", "created_at", "updated_at"];

/// Static configuration for one record type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordTypeSpec {
    /// Singular display name ("block")
    pub singular: &'static str,
    /// Plural display name ("blocks")
    pub plural: &'static str,
    /// Fields tried in order when resolving the identifier
    pub identifier_chain: &'static [&'static str],
    /// Fields compared for equality, in report order
    pub comparable_fields: &'static [&'static str],
    /// Fields tried in order when resolving a display title
    pub title_chain: &'static [&'static str],
    /// Destination fields copied onto an update payload, when present
    pub identity_fields: &'static [&'static str],
    /// Field holding the remote primary key used in update calls
    pub primary_key: &'static str,
    /// Remote API resource ("cmsBlock")
    pub api_resource: &'static str,
    /// Key wrapping the record in create/update payloads ("block")
    pub payload_envelope: &'static str,
}

pub const BLOCK_SPEC: RecordTypeSpec = RecordTypeSpec {
    singular: "block",
    plural: "blocks",
    identifier_chain: &["identifier"],
    comparable_fields: &[
        "title",
        "content",
        "is_active",
        "creation_time",
        "update_time",
        "sort_order",
    ],
    title_chain: &["title", "content_heading"],
    identity_fields: &["id", "block_id"],
    primary_key: "id",
    api_resource: "cmsBlock",
    payload_envelope: "block",
};

pub const PAGE_SPEC: RecordTypeSpec = RecordTypeSpec {
    singular: "page",
    plural: "pages",
    // `identifier` on current schema generations, `url_key` on older ones
    identifier_chain: &["identifier", "url_key"],
    comparable_fields: &[
        "title",
        "content",
        "content_heading",
        "page_layout",
        "meta_title",
        "meta_keywords",
        "meta_description",
        "is_active",
        "sort_order",
        "layout_update_xml",
        "custom_theme",
        "custom_root_template",
        "custom_layout_update_xml",
    ],
    title_chain: &["title", "content_heading"],
    identity_fields: &["id", "page_id"],
    primary_key: "id",
    api_resource: "cmsPage",
    payload_envelope: "page",
};

/// Kind of content record being reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordType {
    #[serde(rename = "blocks", alias = "block")]
    Block,
    #[serde(rename = "pages", alias = "page")]
    Page,
}

impl RecordType {
    /// All supported record types
    pub const ALL: [RecordType; 2] = [RecordType::Block, RecordType::Page];

    /// Configuration row for this type
    pub fn spec(self) -> &'static RecordTypeSpec {
        match self {
            RecordType::Block => &BLOCK_SPEC,
            RecordType::Page => &PAGE_SPEC,
        }
    }

    /// Whether any field of the identifier chain equals `identifier`.
    ///
    /// Looser than resolving the identifier: a page whose `identifier` is set
    /// still matches a lookup by its `url_key`.
    pub fn matches(self, record: &Record, identifier: &str) -> bool {
        self.spec()
            .identifier_chain
            .iter()
            .filter_map(|field| record.get(field).text_form())
            .any(|value| value == identifier)
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blocks" | "block" => Ok(RecordType::Block),
            "pages" | "page" => Ok(RecordType::Page),
            _ => Err(Error::InvalidRecordType {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.spec().plural)
    }
}
