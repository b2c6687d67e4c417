//! Domain types and validators for appctl configuration.
//!
//! Pure functions only; nothing here touches the filesystem.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &["data_root", "catalog_root", "script_timeout_secs"];

/// Default lifecycle script timeout: 15 minutes.
pub const DEFAULT_SCRIPT_TIMEOUT_SECS: u64 = 900;

// ── Config schema ────────────────────────────────────────────────────────────

/// Settings stored in `~/.appctl/config.yaml`. Every field is optional so a
/// partial file only overrides what it names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppctlConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_timeout_secs: Option<u64>,
}

impl AppctlConfig {
    /// Fill unset fields from `lower`; fields already set here win.
    #[must_use]
    pub fn or(self, lower: AppctlConfig) -> Self {
        Self {
            data_root: self.data_root.or(lower.data_root),
            catalog_root: self.catalog_root.or(lower.catalog_root),
            script_timeout_secs: self.script_timeout_secs.or(lower.script_timeout_secs),
        }
    }

    /// Resolve into concrete settings, defaulting the roots under `home`.
    ///
    /// Defaults: `<home>/.appctl` for data, `<home>/.appctl/catalog` for the catalog.
    #[must_use]
    pub fn resolve(self, home: &std::path::Path) -> ManagerConfig {
        let base = home.join(".appctl");
        ManagerConfig {
            catalog_root: self.catalog_root.unwrap_or_else(|| base.join("catalog")),
            data_root: self.data_root.unwrap_or(base),
            script_timeout: Duration::from_secs(
                self.script_timeout_secs
                    .unwrap_or(DEFAULT_SCRIPT_TIMEOUT_SECS),
            ),
        }
    }

    /// Check values that arrived without going through [`Self::set`], such as
    /// flags, environment variables or a hand-edited file.
    ///
    /// # Errors
    ///
    /// Returns the first value that fails [`validate_config_value`].
    pub fn validate(&self) -> Result<()> {
        if let Some(secs) = self.script_timeout_secs {
            validate_config_value("script_timeout_secs", &secs.to_string())?;
        }
        Ok(())
    }

    /// Apply a validated `key = value` pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or value fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "data_root" => self.data_root = Some(PathBuf::from(value)),
            "catalog_root" => self.catalog_root = Some(PathBuf::from(value)),
            "script_timeout_secs" => self.script_timeout_secs = Some(value.parse()?),
            _ => anyhow::bail!("Unknown setting: {key}"),
        }
        Ok(())
    }
}

/// Fully resolved settings the manager is constructed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagerConfig {
    pub data_root: PathBuf,
    pub catalog_root: PathBuf,
    pub script_timeout: Duration,
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };
    match key {
        "data_root" | "catalog_root" if value.trim().is_empty() => {
            Err(invalid("Path must not be empty").into())
        }
        "script_timeout_secs" => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(()),
            _ => Err(invalid("Expected a positive number of seconds").into()),
        },
        _ => Ok(()),
    }
}
