//! Application service — update detection.

use anyhow::Result;
use appctl_common::UpdateInfo;

use crate::application::ports::{InstalledRegistry, LocalFs};
use crate::application::services::app_info::get_app_info;
use crate::application::services::manifest_store::load_catalog_manifest;
use crate::domain::{AppPaths, validate_app_id};

/// Compare the installed version marker with the catalog's `availableVersion`.
///
/// Returns `Ok(None)` when the app is not installed. `latest` comes from the
/// catalog copy so a pinned override can't hide a newer release; if the app
/// has since left the catalog, the resolved manifest is used instead.
///
/// # Errors
///
/// Returns [`crate::domain::AppError::LoadError`] when no manifest resolves,
/// or a registry error.
pub async fn get_update_info(
    fs: &impl LocalFs,
    paths: &AppPaths,
    registry: &impl InstalledRegistry,
    app_id: &str,
) -> Result<Option<UpdateInfo>> {
    validate_app_id(app_id)?;
    let Some(installed) = registry.get(app_id).await? else {
        return Ok(None);
    };

    let latest = match load_catalog_manifest(fs, paths, app_id) {
        Ok(manifest) => manifest.available_version,
        Err(e) => {
            tracing::debug!(app_id, error = %e, "catalog manifest unavailable, using resolved manifest");
            get_app_info(fs, paths, app_id)?.manifest.available_version
        }
    };

    Ok(Some(UpdateInfo {
        current: installed.current_version(),
        latest,
    }))
}
