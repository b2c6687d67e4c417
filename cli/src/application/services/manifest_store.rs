//! Application service — manifest loading with override precedence.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through the injected `LocalFs` port.

use std::path::Path;

use anyhow::{Context, Result};
use appctl_common::{AppManifest, ResolutionSource, ResolvedManifest};

use crate::application::ports::LocalFs;
use crate::domain::{AppError, AppPaths, validate_app_id};

/// Pinned manifests hold no secrets.
const OVERRIDE_FILE_MODE: u32 = 0o644;

/// Read and validate one manifest file, checking its `id` matches `expected_id`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, does not parse, or names a
/// different app.
pub fn load_manifest_file(
    fs: &impl LocalFs,
    path: &Path,
    expected_id: &str,
) -> Result<AppManifest> {
    let content = fs
        .read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let manifest = AppManifest::from_json(&content)
        .with_context(|| format!("parsing {}", path.display()))?;
    anyhow::ensure!(
        manifest.id == expected_id,
        "{} declares id '{}' but lives under '{expected_id}'",
        path.display(),
        manifest.id
    );
    Ok(manifest)
}

/// Resolve the authoritative manifest for `app_id`.
///
/// The local override wins when it exists and parses. A broken override is
/// logged and the catalog copy is tried instead. `Ok(None)` means neither
/// location has a manifest file.
///
/// # Errors
///
/// Returns an error if a manifest file exists but no source yields a valid one.
pub fn resolve_manifest(
    fs: &impl LocalFs,
    paths: &AppPaths,
    app_id: &str,
) -> Result<Option<ResolvedManifest>> {
    validate_app_id(app_id)?;

    let mut override_error = None;
    let override_path = paths.override_manifest(app_id);
    if fs.exists(&override_path) {
        match load_manifest_file(fs, &override_path, app_id) {
            Ok(manifest) => {
                tracing::debug!(app_id, "using local override manifest");
                return Ok(Some(ResolvedManifest {
                    manifest,
                    source: ResolutionSource::LocalOverride,
                }));
            }
            Err(e) => {
                tracing::warn!(app_id, error = %format!("{e:#}"), "ignoring unreadable override manifest");
                override_error = Some(e);
            }
        }
    }

    let catalog_path = paths.catalog_manifest(app_id);
    if !fs.exists(&catalog_path) {
        return match override_error {
            Some(e) => Err(e),
            None => Ok(None),
        };
    }
    let manifest = load_manifest_file(fs, &catalog_path, app_id)?;
    tracing::debug!(app_id, "using catalog manifest");
    Ok(Some(ResolvedManifest {
        manifest,
        source: ResolutionSource::Catalog,
    }))
}

/// Resolve a manifest, mapping "nowhere" to [`AppError::AppNotFound`] and a
/// broken file to [`AppError::LoadError`].
///
/// # Errors
///
/// See above; also [`AppError::InvalidAppId`].
pub fn require_manifest(
    fs: &impl LocalFs,
    paths: &AppPaths,
    app_id: &str,
) -> Result<ResolvedManifest> {
    validate_app_id(app_id)?;
    match resolve_manifest(fs, paths, app_id) {
        Ok(Some(resolved)) => Ok(resolved),
        Ok(None) => Err(AppError::AppNotFound(app_id.to_string()).into()),
        Err(e) => Err(load_error(app_id, &e).into()),
    }
}

/// Load the catalog copy only, ignoring any override.
///
/// # Errors
///
/// Returns [`AppError::AppNotFound`] when the catalog has no such app, or
/// [`AppError::LoadError`] when its manifest is broken.
pub fn load_catalog_manifest(
    fs: &impl LocalFs,
    paths: &AppPaths,
    app_id: &str,
) -> Result<AppManifest> {
    validate_app_id(app_id)?;
    let path = paths.catalog_manifest(app_id);
    if !fs.exists(&path) {
        return Err(AppError::AppNotFound(app_id.to_string()).into());
    }
    load_manifest_file(fs, &path, app_id).map_err(|e| load_error(app_id, &e).into())
}

/// Persist `manifest` as the local override for its app.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn pin_override(fs: &impl LocalFs, paths: &AppPaths, manifest: &AppManifest) -> Result<()> {
    validate_app_id(&manifest.id)?;
    let dir = paths.app_data_dir(&manifest.id);
    fs.create_dir_all(&dir)?;
    let content = serde_json::to_string_pretty(manifest).context("serializing manifest")?;
    fs.write(&paths.override_manifest(&manifest.id), content, OVERRIDE_FILE_MODE)
        .context("writing override manifest")?;
    tracing::debug!(app_id = %manifest.id, "pinned override manifest");
    Ok(())
}

pub(crate) fn load_error(app_id: &str, cause: &anyhow::Error) -> AppError {
    AppError::LoadError {
        app_id: app_id.to_string(),
        reason: format!("{cause:#}"),
    }
}
