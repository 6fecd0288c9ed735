//! Shared state of one CLI invocation
//!
//! Resolves the configuration and data directory once, then hands out the
//! stores and per-instance API clients the commands need.

use std::collections::BTreeMap;
use std::path::Path;

use recon_client::MagentoClient;
use recon_core::{Record, RecordType, RemoteContent};
use recon_store::{InstanceRegistry, RunStore, SnapshotInfo, SnapshotStore};

use crate::config::{self, AppConfig};
use crate::error::{CliError, Result};

pub struct AppContext {
    pub config: AppConfig,
    pub registry: InstanceRegistry,
    pub snapshots: SnapshotStore,
    pub runs: RunStore,
}

impl AppContext {
    pub fn load(config_path: Option<&Path>, data_dir: Option<&Path>) -> Result<Self> {
        let (config, data_dir) = config::resolve(config_path, data_dir)?;
        Ok(Self {
            registry: InstanceRegistry::new(&data_dir),
            snapshots: SnapshotStore::new(&data_dir),
            runs: RunStore::new(&data_dir),
            config,
        })
    }

    /// API client for a registered, active instance
    pub fn client(&self, instance_id: &str) -> Result<MagentoClient> {
        let instance = self.registry.get_instance(instance_id)?;
        if !instance.is_active {
            return Err(CliError::user(format!("Instance '{instance_id}' is inactive")));
        }
        Ok(MagentoClient::new(
            &instance.url,
            instance.api_token,
            self.config.client.to_client_config(),
        )?)
    }

    /// Records of the stored snapshot; a missing snapshot is a user error
    pub fn snapshot(&self, instance_id: &str, record_type: RecordType) -> Result<Vec<Record>> {
        self.registry.get_instance(instance_id)?;
        self.snapshots.load(instance_id, record_type)?.ok_or_else(|| {
            CliError::user(format!(
                "No {record_type} snapshot for '{instance_id}'. Run `recon refresh {instance_id} --type {record_type}` first."
            ))
        })
    }

    /// Fetch an instance's records and replace its snapshot.
    ///
    /// Store views are saved as snapshot metadata when the instance lists
    /// them; failing to list them does not fail the refresh.
    pub async fn refresh(&self, instance_id: &str, record_type: RecordType) -> Result<SnapshotInfo> {
        let client = self.client(instance_id)?;
        let records = client.list(record_type).await?;

        let mut metadata = BTreeMap::new();
        match client.store_views().await {
            Ok(views) => {
                metadata.insert("store_views".to_string(), serde_json::Value::Array(views));
            }
            Err(e) => tracing::warn!(instance = instance_id, error = %e, "Could not list store views"),
        }

        Ok(self
            .snapshots
            .save(instance_id, record_type, &records, metadata)?)
    }
}
