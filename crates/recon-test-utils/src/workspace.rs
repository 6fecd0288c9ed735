//! [`TestWorkspace`]: a temporary data directory for store and CLI tests

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use recon_core::{Record, RecordType};
use recon_store::{Instance, InstanceRegistry, RunStore, SnapshotStore};
use tempfile::TempDir;

/// A temporary data directory with helpers to seed instances and snapshots.
///
/// # Example
///
/// ```rust,no_run
/// use recon_core::RecordType;
/// use recon_test_utils::{TestWorkspace, block};
///
/// let ws = TestWorkspace::new();
/// ws.add_instance("staging");
/// ws.seed_snapshot("staging", RecordType::Block, vec![block("footer", "Footer", "A")]);
/// ws.assert_file_exists("instances/staging/blocks.json");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root of the data directory
    pub fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn registry(&self) -> InstanceRegistry {
        InstanceRegistry::new(self.data_dir())
    }

    pub fn snapshots(&self) -> SnapshotStore {
        SnapshotStore::new(self.data_dir())
    }

    pub fn runs(&self) -> RunStore {
        RunStore::new(self.data_dir())
    }

    /// Register an instance pointing at `https://<id>.example.com`
    pub fn add_instance(&self, id: &str) -> Instance {
        self.add_instance_at(id, &format!("https://{id}.example.com"))
    }

    /// Register an instance pointing at `url`
    pub fn add_instance_at(&self, id: &str, url: &str) -> Instance {
        self.registry()
            .add(Instance::new(id, url, format!("{id}-token")))
            .unwrap()
    }

    /// Store a snapshot without metadata
    pub fn seed_snapshot(&self, instance_id: &str, record_type: RecordType, records: Vec<Record>) {
        self.snapshots()
            .save(instance_id, record_type, &records, BTreeMap::new())
            .unwrap();
    }

    /// Write a file relative to the data directory
    pub fn write_file(&self, path: &str, content: &str) {
        let full_path = self.data_dir().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }

    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.data_dir().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
