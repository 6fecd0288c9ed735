//! Application configuration (`recon.toml`)

use std::path::{Path, PathBuf};
use std::time::Duration;

use recon_client::ClientConfig;
use recon_store::ConfigStore;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// Config file looked up inside the data directory
pub const CONFIG_FILE: &str = "recon.toml";

/// Settings read from the config file; every field has a default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Overrides the platform data directory unless `--data-dir` is given
    pub data_dir: Option<PathBuf>,
    pub client: ClientSettings,
    pub sync: SyncSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub timeout_secs: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub page_size: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        let defaults = ClientConfig::default();
        Self {
            timeout_secs: defaults.timeout.as_secs(),
            retry_attempts: defaults.retry_attempts,
            retry_delay_ms: defaults.retry_delay.as_millis() as u64,
            page_size: defaults.page_size,
        }
    }
}

impl ClientSettings {
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            retry_attempts: self.retry_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            page_size: self.page_size.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Items pushed to the destination at once
    pub concurrency: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// `<platform data dir>/recon`, or `./data` when the platform has none
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("recon"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Load the configuration and settle the data directory.
///
/// An explicit `config_path` must exist; the implicit
/// `<data_dir>/recon.toml` may be missing. An explicit `data_dir` beats the
/// one in the file.
pub fn resolve(config_path: Option<&Path>, data_dir: Option<&Path>) -> Result<(AppConfig, PathBuf)> {
    let base_dir = data_dir.map(Path::to_path_buf).unwrap_or_else(default_data_dir);
    let store = ConfigStore::new();

    let config: AppConfig = match config_path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::user(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            store.load(path)?
        }
        None => store
            .load_optional(&base_dir.join(CONFIG_FILE))?
            .unwrap_or_default(),
    };

    let resolved = match (data_dir, &config.data_dir) {
        (Some(dir), _) => dir.to_path_buf(),
        (None, Some(dir)) => dir.clone(),
        (None, None) => base_dir,
    };
    tracing::debug!(data_dir = %resolved.display(), "Resolved data directory");
    Ok((config, resolved))
}
