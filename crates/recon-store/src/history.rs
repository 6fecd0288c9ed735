//! Sync run history, one JSON file per run under `<data_dir>/runs`

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use recon_core::SyncRun;
use uuid::Uuid;

use crate::config::ConfigStore;
use crate::{Error, Result};

/// Persisted [`SyncRun`] records
#[derive(Debug, Clone)]
pub struct RunStore {
    root: PathBuf,
    store: ConfigStore,
}

impl RunStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            root: data_dir.as_ref().join("runs"),
            store: ConfigStore::new(),
        }
    }

    /// Write (or overwrite) a run
    pub fn save(&self, run: &SyncRun) -> Result<()> {
        self.store.save(&self.run_path(&run.id), run)
    }

    pub fn get(&self, id: &Uuid) -> Result<Option<SyncRun>> {
        self.store.load_optional(&self.run_path(id))
    }

    /// Runs sorted newest first, at most `limit` of them.
    ///
    /// Files that fail to parse are logged and skipped.
    pub fn list(&self, limit: Option<usize>) -> Result<Vec<SyncRun>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io(&self.root, e)),
        };

        let mut runs = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::io(&self.root, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match self.store.load::<SyncRun>(&path) {
                Ok(run) => runs.push(run),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable run"),
            }
        }

        runs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            runs.truncate(limit);
        }
        Ok(runs)
    }

    fn run_path(&self, id: &Uuid) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }
}
