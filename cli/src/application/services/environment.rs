//! Application service — environment resolution, validation and generation.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;
use appctl_common::AppManifest;

use crate::application::ports::LocalFs;
use crate::application::services::env_store::{read_env, write_env};
use crate::application::services::manifest_store::require_manifest;
use crate::domain::secret::generate_secret;
use crate::domain::{AppError, AppPaths, EnvMap, missing_required, plan_environment};

/// Current persisted environment of `app_id`; empty when never generated.
///
/// # Errors
///
/// Returns an error for an invalid id or an unreadable env file.
pub fn get_environment(fs: &impl LocalFs, paths: &AppPaths, app_id: &str) -> Result<EnvMap> {
    read_env(fs, paths, app_id)
}

/// Fail with [`AppError::ConfigOutdated`] when a required field has no value.
///
/// # Errors
///
/// Also returns manifest resolution errors (`AppNotFound`, `LoadError`).
pub fn validate_environment(fs: &impl LocalFs, paths: &AppPaths, app_id: &str) -> Result<()> {
    let resolved = require_manifest(fs, paths, app_id)?;
    let env = read_env(fs, paths, app_id)?;
    let missing = missing_required(&resolved.manifest, &env);
    if missing.is_empty() {
        return Ok(());
    }
    tracing::info!(app_id, ?missing, "environment is outdated");
    Err(AppError::ConfigOutdated {
        app_id: app_id.to_string(),
        missing,
    }
    .into())
}

/// Generate and persist the env file for `app_id` from `user_fields`.
///
/// Persisted random values are kept; see [`plan_environment`] for the full
/// policy. Callers serialize calls per app; `AppManager` does so with `AppLocks`.
///
/// # Errors
///
/// Returns `AppNotFound`, `LoadError`, `MissingField`, `InvalidField`, or an
/// I/O error. Nothing is written on failure.
pub fn generate_environment(
    fs: &impl LocalFs,
    paths: &AppPaths,
    app_id: &str,
    user_fields: &EnvMap,
) -> Result<EnvMap> {
    let resolved = require_manifest(fs, paths, app_id)?;
    generate_for_manifest(fs, paths, &resolved.manifest, user_fields)
}

/// [`generate_environment`] against a manifest the caller already loaded.
///
/// # Errors
///
/// Returns `MissingField`, `InvalidField`, or an I/O error.
pub fn generate_for_manifest(
    fs: &impl LocalFs,
    paths: &AppPaths,
    manifest: &AppManifest,
    user_fields: &EnvMap,
) -> Result<EnvMap> {
    let app_id = manifest.id.as_str();
    let existing = read_env(fs, paths, app_id)?;

    let mut generated = 0usize;
    let env = plan_environment(manifest, &existing, user_fields, || {
        generated += 1;
        generate_secret()
    })?;

    write_env(fs, paths, app_id, &env)?;
    tracing::info!(app_id, keys = env.len(), generated, "environment written");
    Ok(env)
}
