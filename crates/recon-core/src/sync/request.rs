//! Sync item requests and store view mapping

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Requested sync action for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Create,
    Update,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAction::Create => write!(f, "create"),
            SyncAction::Update => write!(f, "update"),
        }
    }
}

impl FromStr for SyncAction {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(SyncAction::Create),
            "update" => Ok(SyncAction::Update),
            _ => Err(Error::InvalidAction {
                value: s.to_string(),
            }),
        }
    }
}

/// One item a caller wants synced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncItemRequest {
    pub identifier: String,
    pub action: SyncAction,
    /// Restrict an update to these fields; `None` syncs the whole record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_to_sync: Option<Vec<String>>,
}

impl SyncItemRequest {
    pub fn create(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            action: SyncAction::Create,
            fields_to_sync: None,
        }
    }

    pub fn update(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            action: SyncAction::Update,
            fields_to_sync: None,
        }
    }

    /// Restrict the request to a field subset
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields_to_sync = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

/// Source store id (text form) to destination store id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreViewMapping(BTreeMap<String, String>);

impl StoreViewMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.insert(from, to);
        self
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.0.insert(from.into(), to.into());
    }

    pub fn get(&self, from: &str) -> Option<&str> {
        self.0.get(from).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StoreViewMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
