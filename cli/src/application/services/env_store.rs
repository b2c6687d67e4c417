//! Application service — per-app `app.env` persistence.

use anyhow::{Context, Result};

use crate::application::ports::LocalFs;
use crate::domain::{AppPaths, EnvMap, validate_app_id};

/// Owner read/write only; the file holds generated secrets.
const ENV_FILE_MODE: u32 = 0o600;

/// Read the env file for `app_id`. A missing file is an empty map.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn read_env(fs: &impl LocalFs, paths: &AppPaths, app_id: &str) -> Result<EnvMap> {
    validate_app_id(app_id)?;
    let path = paths.env_file(app_id);
    if !fs.exists(&path) {
        return Ok(EnvMap::new());
    }
    let content = fs
        .read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(EnvMap::parse(&content))
}

/// Replace the env file for `app_id` with `env`.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_env(fs: &impl LocalFs, paths: &AppPaths, app_id: &str, env: &EnvMap) -> Result<()> {
    validate_app_id(app_id)?;
    fs.create_dir_all(&paths.app_data_dir(app_id))?;
    let path = paths.env_file(app_id);
    fs.write(&path, env.render(), ENV_FILE_MODE)
        .with_context(|| format!("writing {}", path.display()))
}
