//! Application service — catalog enumeration.
//!
//! A single malformed entry never fails the listing: it is skipped and
//! logged so one broken app can't hide the rest of the catalog.

use anyhow::Result;
use appctl_common::AppManifest;

use crate::application::ports::LocalFs;
use crate::application::services::manifest_store::load_manifest_file;
use crate::domain::app::MANIFEST_FILE;
use crate::domain::{AppPaths, is_valid_app_id};

/// Every parseable manifest under `<catalog-root>/apps/`, one per app id,
/// sorted by id.
///
/// # Errors
///
/// Returns an error only if the apps directory exists but cannot be listed.
pub fn list_available_apps(fs: &impl LocalFs, paths: &AppPaths) -> Result<Vec<AppManifest>> {
    let apps_dir = paths.catalog_apps_dir();
    if !fs.is_dir(&apps_dir) {
        tracing::debug!(dir = %apps_dir.display(), "catalog apps directory missing");
        return Ok(Vec::new());
    }

    let mut apps = Vec::new();
    for entry in fs.read_dir(&apps_dir)? {
        if !fs.is_dir(&entry) {
            continue;
        }
        let Some(dir_name) = entry.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !is_valid_app_id(dir_name) {
            tracing::warn!(entry = %entry.display(), "skipping catalog entry with invalid app id");
            continue;
        }
        let manifest_path = entry.join(MANIFEST_FILE);
        if !fs.exists(&manifest_path) {
            tracing::debug!(app_id = dir_name, "skipping catalog entry without manifest");
            continue;
        }
        match load_manifest_file(fs, &manifest_path, dir_name) {
            Ok(manifest) => apps.push(manifest),
            Err(e) => {
                tracing::warn!(app_id = dir_name, error = %format!("{e:#}"), "skipping malformed catalog manifest");
            }
        }
    }
    apps.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(apps)
}
