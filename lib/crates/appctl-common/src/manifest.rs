// lib/crates/appctl-common/src/manifest.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Installable app manifest (`config.json`).
///
/// Loaded fresh on every call; callers must not cache it across operations
/// because the local override may change underneath them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppManifest {
    pub id: String,
    pub name: String,
    /// Human-facing version string (e.g. `"1.4.2"`).
    #[serde(default)]
    pub version: Option<String>,
    /// Monotonic catalog version compared against the installed marker.
    #[serde(default = "default_available_version")]
    pub available_version: u32,
    /// Host ports the app binds for its own exclusive use.
    #[serde(default)]
    pub required_ports: Vec<u16>,
    #[serde(default)]
    pub form_fields: Vec<FormField>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub exposable: bool,
    #[serde(default)]
    pub short_desc: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Display metadata this crate doesn't interpret. Kept so a pinned
    /// override round-trips without losing keys.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One entry of `formFields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Env variable name written to `app.env`.
    pub key: String,
    #[serde(default)]
    pub required: bool,
    /// Value is generated and persisted by the manager, never supplied by the caller.
    #[serde(default)]
    pub random_generate: bool,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub default: Option<String>,
}

/// Errors raised while parsing or validating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid manifest JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("manifest id must not be empty")]
    EmptyId,

    #[error("form field at position {0} has an empty key")]
    EmptyFieldKey(usize),

    #[error("form field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("required port 0 is not a valid TCP port")]
    InvalidPort,
}

fn default_available_version() -> u32 {
    1
}

impl AppManifest {
    /// Parse and validate a manifest from its JSON text.
    pub fn from_json(content: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Structural checks serde can't express.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.id.trim().is_empty() {
            return Err(ManifestError::EmptyId);
        }
        if self.required_ports.contains(&0) {
            return Err(ManifestError::InvalidPort);
        }
        let mut seen = HashSet::new();
        for (idx, field) in self.form_fields.iter().enumerate() {
            if field.key.trim().is_empty() {
                return Err(ManifestError::EmptyFieldKey(idx));
            }
            if !seen.insert(field.key.as_str()) {
                return Err(ManifestError::DuplicateField(field.key.clone()));
            }
        }
        Ok(())
    }

    /// Keys that must hold a non-empty value in the env file, in declared order.
    pub fn required_keys(&self) -> impl Iterator<Item = &str> {
        self.form_fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.key.as_str())
    }

    /// Fields whose value the manager generates.
    pub fn random_fields(&self) -> impl Iterator<Item = &FormField> {
        self.form_fields.iter().filter(|f| f.random_generate)
    }
}
