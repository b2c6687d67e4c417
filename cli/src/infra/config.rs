//! Infrastructure implementation of the `ConfigStore` port, plus the layered
//! settings resolution used at startup.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppctlConfig, ManagerConfig};
use crate::infra::fs::write_atomic;

/// Environment variable prefix for settings (`APPCTL_DATA_ROOT`, ...).
pub const ENV_PREFIX: &str = "APPCTL_";

/// Owner read/write only.
const CONFIG_FILE_MODE: u32 = 0o600;

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
pub struct YamlConfigStore;

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<AppctlConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(AppctlConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, config: &AppctlConfig) -> Result<()> {
        let path = self.path()?;
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;
        write_atomic(&path, content.as_bytes(), CONFIG_FILE_MODE)
            .with_context(|| format!("cannot write {}", path.display()))
    }

    fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var("APPCTL_CONFIG") {
            return Ok(PathBuf::from(val));
        }
        Ok(home_dir()?.join(".appctl").join("config.yaml"))
    }
}

/// Settings taken from `APPCTL_*` environment variables.
///
/// # Errors
///
/// Returns an error if a variable is set to a value of the wrong type, such
/// as a non-numeric `APPCTL_SCRIPT_TIMEOUT_SECS`.
pub fn env_config() -> Result<AppctlConfig> {
    envy::prefixed(ENV_PREFIX)
        .from_env::<AppctlConfig>()
        .context("invalid APPCTL_* environment variable")
}

/// Resolve the manager settings: `cli` flags, then environment, then the
/// config file, then defaults under the home directory.
///
/// # Errors
///
/// Returns an error if the environment or config file is malformed, a merged
/// value is out of range, or the home directory is needed but cannot be determined.
pub fn resolve_config(store: &impl ConfigStore, cli: AppctlConfig) -> Result<ManagerConfig> {
    let merged = cli.or(env_config()?).or(store.load()?);
    merged.validate()?;
    Ok(merged.resolve(&home_dir()?))
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))
}
