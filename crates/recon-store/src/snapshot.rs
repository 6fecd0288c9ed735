//! Point-in-time record snapshots per instance and record type
//!
//! Layout under the data directory:
//!
//! ```text
//! instances/<instance_id>/blocks.json        records
//! instances/<instance_id>/blocks.meta.json   SnapshotInfo
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use recon_core::{Record, RecordType};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::ConfigStore;
use crate::registry::validate_instance_id;
use crate::{Error, Result, io};

/// Description of a stored snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub instance_id: String,
    pub record_type: RecordType,
    pub item_count: usize,
    pub created_at: DateTime<Utc>,
    /// `sha256:<hex>` of the records file
    pub checksum: String,
    /// Free-form extras, such as the instance's store views
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Snapshot files under `<data_dir>/instances`
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
    store: ConfigStore,
}

impl SnapshotStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            root: data_dir.as_ref().join("instances"),
            store: ConfigStore::new(),
        }
    }

    /// Replace the snapshot of one instance and record type
    pub fn save(
        &self,
        instance_id: &str,
        record_type: RecordType,
        records: &[Record],
        metadata: BTreeMap<String, serde_json::Value>,
    ) -> Result<SnapshotInfo> {
        let records_path = self.records_path(instance_id, record_type)?;
        let content = serde_json::to_string_pretty(records).map_err(|e| Error::Serialize {
            path: records_path.clone(),
            format: "JSON".into(),
            message: e.to_string(),
        })?;
        io::write_atomic(&records_path, content.as_bytes())?;

        let info = SnapshotInfo {
            instance_id: instance_id.to_string(),
            record_type,
            item_count: records.len(),
            created_at: Utc::now(),
            checksum: checksum(&content),
            metadata,
        };
        self.store
            .save(&self.meta_path(instance_id, record_type)?, &info)?;

        tracing::info!(
            instance = instance_id,
            record_type = %record_type,
            items = records.len(),
            "Saved snapshot"
        );
        Ok(info)
    }

    /// Load a snapshot's records, or `None` if none was saved
    pub fn load(&self, instance_id: &str, record_type: RecordType) -> Result<Option<Vec<Record>>> {
        let path = self.records_path(instance_id, record_type)?;
        self.store.load_optional(&path)
    }

    /// Load a snapshot's description, or `None` if none was saved
    pub fn info(&self, instance_id: &str, record_type: RecordType) -> Result<Option<SnapshotInfo>> {
        let path = self.meta_path(instance_id, record_type)?;
        self.store.load_optional(&path)
    }

    /// Delete every snapshot of an instance
    pub fn remove_instance(&self, instance_id: &str) -> Result<()> {
        validate_instance_id(instance_id)?;
        let dir = self.root.join(instance_id);
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(dir, e)),
        }
    }

    fn records_path(&self, instance_id: &str, record_type: RecordType) -> Result<PathBuf> {
        validate_instance_id(instance_id)?;
        Ok(self.root.join(instance_id).join(format!("{record_type}.json")))
    }

    fn meta_path(&self, instance_id: &str, record_type: RecordType) -> Result<PathBuf> {
        validate_instance_id(instance_id)?;
        Ok(self
            .root
            .join(instance_id)
            .join(format!("{record_type}.meta.json")))
    }
}

fn checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("sha256:{:x}", hasher.finalize())
}
