//! Infrastructure implementation of the `InstalledRegistry` port.
//!
//! `JsonRegistry` keeps every installed app in one JSON file, using
//! `tokio::task::spawn_blocking` for I/O and an atomic write (temp file +
//! rename) so a crash never leaves a truncated registry.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use appctl_common::InstalledApp;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::application::ports::InstalledRegistry;
use crate::domain::validate_app_id;
use crate::infra::fs::write_atomic;

/// Owner read/write only.
const REGISTRY_FILE_MODE: u32 = 0o600;

/// On-disk shape of `installed.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    apps: BTreeMap<String, InstalledApp>,
}

/// JSON file registry.
///
/// Writes for different apps can run concurrently under the per-app locks,
/// so read-modify-write cycles are serialized here.
pub struct JsonRegistry {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonRegistry {
    /// Registry stored at `path` (normally `<data-root>/state/installed.json`).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<RegistryFile> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || load_sync(&path))
            .await
            .context("registry load task panicked")?
    }

    async fn modify(&self, f: impl FnOnce(&mut RegistryFile) + Send + 'static) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let mut file = load_sync(&path)?;
            f(&mut file);
            save_sync(&path, &file)
        })
        .await
        .context("registry save task panicked")?
    }
}

fn load_sync(path: &Path) -> Result<RegistryFile> {
    if !path.exists() {
        return Ok(RegistryFile::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading registry {}", path.display()))?;
    let file: RegistryFile = serde_json::from_str(&content)
        .with_context(|| format!("parsing registry {}", path.display()))?;
    for id in file.apps.keys() {
        validate_app_id(id).with_context(|| format!("corrupt registry {}", path.display()))?;
    }
    Ok(file)
}

fn save_sync(path: &Path, file: &RegistryFile) -> Result<()> {
    let content = serde_json::to_string_pretty(file).context("serializing registry")?;
    write_atomic(path, content.as_bytes(), REGISTRY_FILE_MODE)
}

impl InstalledRegistry for JsonRegistry {
    async fn get(&self, app_id: &str) -> Result<Option<InstalledApp>> {
        Ok(self.load().await?.apps.remove(app_id))
    }

    async fn list(&self) -> Result<Vec<InstalledApp>> {
        Ok(self.load().await?.apps.into_values().collect())
    }

    async fn upsert(&self, app: &InstalledApp) -> Result<()> {
        validate_app_id(&app.id)?;
        let app = app.clone();
        self.modify(move |file| {
            file.apps.insert(app.id.clone(), app);
        })
        .await
    }

    async fn remove(&self, app_id: &str) -> Result<()> {
        let app_id = app_id.to_string();
        self.modify(move |file| {
            file.apps.remove(&app_id);
        })
        .await
    }
}
