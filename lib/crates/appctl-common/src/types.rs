use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::manifest::AppManifest;

/// Version assumed for an installed app whose registry record carries no marker.
pub const DEFAULT_INSTALLED_VERSION: u32 = 1;

/// Where a resolved manifest was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// `<catalog-root>/apps/<id>/config.json`
    Catalog,
    /// `<data-root>/app-data/<id>/config.json`, pinned at install time.
    LocalOverride,
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Catalog => write!(f, "catalog"),
            Self::LocalOverride => write!(f, "local override"),
        }
    }
}

/// A manifest together with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedManifest {
    pub manifest: AppManifest,
    pub source: ResolutionSource,
}

/// Installed vs. catalog version for an installed app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInfo {
    pub current: u32,
    pub latest: u32,
}

impl UpdateInfo {
    #[must_use]
    pub fn update_available(&self) -> bool {
        self.latest > self.current
    }
}

/// Registry record for one installed app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledApp {
    pub id: String,
    /// Installed version marker. Older records may lack it.
    #[serde(default)]
    pub version: Option<u32>,
    pub installed_at: DateTime<Utc>,
}

impl InstalledApp {
    /// Create a record stamped with the current time.
    #[must_use]
    pub fn new(id: impl Into<String>, version: Option<u32>) -> Self {
        Self {
            id: id.into(),
            version,
            installed_at: Utc::now(),
        }
    }

    /// Recorded marker, or [`DEFAULT_INSTALLED_VERSION`] when absent.
    #[must_use]
    pub fn current_version(&self) -> u32 {
        self.version.unwrap_or(DEFAULT_INSTALLED_VERSION)
    }
}
