//! Instance registry
//!
//! Connection details for every registered content instance, persisted as
//! `instances.toml` in the data directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ConfigStore;
use crate::{Error, Result};

/// File name of the registry inside the data directory
pub const REGISTRY_FILE: &str = "instances.toml";

/// A registered content instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    pub name: String,
    /// Base URL of the instance (without `/rest/V1`)
    pub url: String,
    pub api_token: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Instance {
    /// Create an active instance named after its id
    pub fn new(id: impl Into<String>, url: impl Into<String>, api_token: impl Into<String>) -> Self {
        let id = id.into();
        let now = Utc::now();
        Self {
            name: id.clone(),
            id,
            url: url.into(),
            api_token: api_token.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Partial update of an [`Instance`]; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceUpdate {
    pub name: Option<String>,
    pub url: Option<String>,
    pub api_token: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    instances: Vec<Instance>,
}

/// Reject ids that are empty or could escape the data directory.
///
/// Instance ids become directory names for snapshots.
pub fn validate_instance_id(id: &str) -> Result<()> {
    let reason = if id.is_empty() {
        Some("must not be empty")
    } else if id.contains('/') || id.contains('\\') {
        Some("must not contain path separators")
    } else if id.contains("..") {
        Some("must not contain '..'")
    } else if id.starts_with('.') {
        Some("must not start with '.'")
    } else if id.chars().any(char::is_control) {
        Some("must not contain control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidInstanceId {
            id: id.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Require an absolute http(s) URL
pub fn validate_url(raw: &str) -> Result<()> {
    let parsed = url::Url::parse(raw).map_err(|e| Error::InvalidUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::InvalidUrl {
            url: raw.to_string(),
            message: format!("unsupported scheme '{other}' (expected http or https)"),
        }),
    }
}

/// Registered instances, read from and written to disk on every call
#[derive(Debug, Clone)]
pub struct InstanceRegistry {
    path: PathBuf,
    store: ConfigStore,
}

impl InstanceRegistry {
    /// Registry stored in `<data_dir>/instances.toml`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(REGISTRY_FILE),
            store: ConfigStore::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a new instance.
    ///
    /// # Errors
    ///
    /// Fails on an invalid id or URL, or if the id is already registered.
    pub fn add(&self, instance: Instance) -> Result<Instance> {
        validate_instance_id(&instance.id)?;
        validate_url(&instance.url)?;

        let mut file = self.read()?;
        if file.instances.iter().any(|i| i.id == instance.id) {
            return Err(Error::InstanceExists { id: instance.id });
        }
        file.instances.push(instance.clone());
        self.write(&mut file)?;

        tracing::info!(id = %instance.id, url = %instance.url, "Registered instance");
        Ok(instance)
    }

    /// Look up an instance by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InstanceNotFound`] for an unknown id.
    pub fn get_instance(&self, id: &str) -> Result<Instance> {
        self.read()?
            .instances
            .into_iter()
            .find(|i| i.id == id)
            .ok_or_else(|| Error::InstanceNotFound { id: id.to_string() })
    }

    /// All instances, sorted by id
    pub fn list(&self) -> Result<Vec<Instance>> {
        let mut instances = self.read()?.instances;
        instances.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(instances)
    }

    /// Apply a partial update and bump `updated_at`
    pub fn update(&self, id: &str, update: InstanceUpdate) -> Result<Instance> {
        if let Some(url) = &update.url {
            validate_url(url)?;
        }

        let mut file = self.read()?;
        let instance = file
            .instances
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| Error::InstanceNotFound { id: id.to_string() })?;

        if let Some(name) = update.name {
            instance.name = name;
        }
        if let Some(url) = update.url {
            instance.url = url;
        }
        if let Some(api_token) = update.api_token {
            instance.api_token = api_token;
        }
        if let Some(is_active) = update.is_active {
            instance.is_active = is_active;
        }
        instance.updated_at = Utc::now();
        let updated = instance.clone();

        self.write(&mut file)?;
        Ok(updated)
    }

    /// Remove an instance, returning it
    pub fn remove(&self, id: &str) -> Result<Instance> {
        let mut file = self.read()?;
        let position = file
            .instances
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| Error::InstanceNotFound { id: id.to_string() })?;
        let removed = file.instances.remove(position);
        self.write(&mut file)?;

        tracing::info!(id = %removed.id, "Removed instance");
        Ok(removed)
    }

    fn read(&self) -> Result<RegistryFile> {
        Ok(self.store.load_optional(&self.path)?.unwrap_or_default())
    }

    fn write(&self, file: &mut RegistryFile) -> Result<()> {
        file.instances.sort_by(|a, b| a.id.cmp(&b.id));
        self.store.save(&self.path, file)
    }
}
