//! App identity and on-disk layout. Pure path computation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::AppError;

/// Checked before any path interpolation to prevent path-traversal (CWE-22).
pub static APP_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: constant pattern, cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").expect("valid regex")
});

/// Manifest file name, identical for catalog and override copies.
pub const MANIFEST_FILE: &str = "config.json";
/// Persisted environment file name.
pub const ENV_FILE: &str = "app.env";
/// Lifecycle script file name inside the app's catalog directory.
pub const SCRIPT_FILE: &str = "app.sh";

/// Returns `true` if `id` is a valid app id.
///
/// Valid ids match `^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$`: lowercase
/// alphanumeric with interior hyphens, 1–63 characters total.
#[must_use]
pub fn is_valid_app_id(id: &str) -> bool {
    APP_ID_RE.is_match(id)
}

/// Validate an app id, returning [`AppError::InvalidAppId`] when malformed.
///
/// # Errors
///
/// Returns an error if `id` does not match [`APP_ID_RE`].
pub fn validate_app_id(id: &str) -> Result<(), AppError> {
    if is_valid_app_id(id) {
        Ok(())
    } else {
        Err(AppError::InvalidAppId(id.to_string()))
    }
}

/// Lifecycle verbs passed as the first script argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Install,
    Start,
    Stop,
    Update,
    Uninstall,
}

impl Verb {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Update => "update",
            Self::Uninstall => "uninstall",
        }
    }

    /// `[verb, app_id]`, the fixed argument prefix of every invocation.
    #[must_use]
    pub fn args(self, app_id: &str) -> Vec<String> {
        vec![self.as_str().to_string(), app_id.to_string()]
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filesystem layout rooted at the data root and the catalog root.
///
/// ```text
/// <data-root>/app-data/<id>/app.env
/// <data-root>/app-data/<id>/config.json   (override, installed apps only)
/// <data-root>/state/installed.json
/// <catalog-root>/apps/<id>/config.json
/// <catalog-root>/apps/<id>/app.sh
/// ```
///
/// Every per-app method expects an id already checked by [`validate_app_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    data_root: PathBuf,
    catalog_root: PathBuf,
}

impl AppPaths {
    #[must_use]
    pub fn new(data_root: impl Into<PathBuf>, catalog_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            catalog_root: catalog_root.into(),
        }
    }

    #[must_use]
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    #[must_use]
    pub fn catalog_root(&self) -> &Path {
        &self.catalog_root
    }

    /// Directory holding one sub-directory per catalog app.
    #[must_use]
    pub fn catalog_apps_dir(&self) -> PathBuf {
        self.catalog_root.join("apps")
    }

    #[must_use]
    pub fn catalog_app_dir(&self, id: &str) -> PathBuf {
        self.catalog_apps_dir().join(id)
    }

    #[must_use]
    pub fn catalog_manifest(&self, id: &str) -> PathBuf {
        self.catalog_app_dir(id).join(MANIFEST_FILE)
    }

    #[must_use]
    pub fn script(&self, id: &str) -> PathBuf {
        self.catalog_app_dir(id).join(SCRIPT_FILE)
    }

    /// Per-app data directory; removed on uninstall.
    #[must_use]
    pub fn app_data_dir(&self, id: &str) -> PathBuf {
        self.data_root.join("app-data").join(id)
    }

    #[must_use]
    pub fn override_manifest(&self, id: &str) -> PathBuf {
        self.app_data_dir(id).join(MANIFEST_FILE)
    }

    #[must_use]
    pub fn env_file(&self, id: &str) -> PathBuf {
        self.app_data_dir(id).join(ENV_FILE)
    }

    #[must_use]
    pub fn registry_file(&self) -> PathBuf {
        self.data_root.join("state").join("installed.json")
    }
}
