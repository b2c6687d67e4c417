//! Application service — app info resolution.

use anyhow::Result;
use appctl_common::ResolvedManifest;

use crate::application::ports::LocalFs;
use crate::application::services::manifest_store::{load_error, resolve_manifest};
use crate::domain::{AppError, AppPaths, validate_app_id};

/// Return the authoritative manifest for `app_id` and where it came from.
///
/// Unlike the other services, an app missing from both locations is a
/// [`AppError::LoadError`] here rather than `AppNotFound`.
///
/// # Errors
///
/// Returns [`AppError::InvalidAppId`] or [`AppError::LoadError`].
pub fn get_app_info(
    fs: &impl LocalFs,
    paths: &AppPaths,
    app_id: &str,
) -> Result<ResolvedManifest> {
    validate_app_id(app_id)?;
    match resolve_manifest(fs, paths, app_id) {
        Ok(Some(resolved)) => Ok(resolved),
        Ok(None) => Err(AppError::LoadError {
            app_id: app_id.to_string(),
            reason: "no manifest in the catalog or the local override".to_string(),
        }
        .into()),
        Err(e) => Err(load_error(app_id, &e).into()),
    }
}
