//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed JSON document
//! on stdout. Failures use the error object from [`format_error`].

use std::path::Path;

use anyhow::{Context, Result};
use appctl_common::{AppManifest, InstalledApp, ResolvedManifest, UpdateInfo};
use serde::Serialize;

use crate::domain::config::{AppctlConfig, ManagerConfig};
use crate::domain::{AppError, EnvMap, RequirementReport};
use crate::output::human::MASK;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Machine-readable code for `err`: the [`AppError`] code when one is in the
/// chain, `INTERNAL` otherwise.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<AppError>())
        .map_or("INTERNAL", AppError::code)
}

/// Renders domain types as JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    fn print(value: &impl Serialize) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
        println!("{json}");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_catalog(&self, apps: &[AppManifest], installed: &[InstalledApp]) -> Result<()> {
        let entries: Vec<_> = apps
            .iter()
            .map(|app| {
                serde_json::json!({
                    "id": app.id,
                    "name": app.name,
                    "version": app.version,
                    "availableVersion": app.available_version,
                    "shortDesc": app.short_desc,
                    "installed": installed.iter().any(|i| i.id == app.id),
                })
            })
            .collect();
        Self::print(&serde_json::json!({ "apps": entries }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_installed(&self, apps: &[InstalledApp]) -> Result<()> {
        Self::print(&serde_json::json!({ "installed": apps }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_app_info(
        &self,
        resolved: &ResolvedManifest,
        installed: Option<&InstalledApp>,
    ) -> Result<()> {
        Self::print(&serde_json::json!({
            "manifest": resolved.manifest,
            "source": resolved.source,
            "installed": installed,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_requirements(&self, report: &RequirementReport) -> Result<()> {
        Self::print(&serde_json::json!({
            "app_id": report.app_id,
            "satisfied": report.is_satisfied(),
            "required_ports": report.required_ports,
            "busy_ports": report.busy_ports,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_env(&self, app_id: &str, env: &EnvMap, masked: &[String]) -> Result<()> {
        let shown: EnvMap = env
            .iter()
            .map(|(k, v)| {
                if masked.iter().any(|m| m == k) {
                    (k, MASK)
                } else {
                    (k, v)
                }
            })
            .collect();
        Self::print(&serde_json::json!({ "app_id": app_id, "env": shown }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_update_info(&self, app_id: &str, info: Option<&UpdateInfo>) -> Result<()> {
        Self::print(&serde_json::json!({
            "app_id": app_id,
            "installed": info.is_some(),
            "current": info.map(|i| i.current),
            "latest": info.map(|i| i.latest),
            "update_available": info.is_some_and(UpdateInfo::update_available),
        }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_action(&self, app_id: &str, action: &str) -> Result<()> {
        Self::print(&serde_json::json!({ "app_id": app_id, "action": action, "ok": true }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(
        &self,
        config: &AppctlConfig,
        resolved: &ManagerConfig,
        path: &Path,
    ) -> Result<()> {
        Self::print(&serde_json::json!({
            "path": path,
            "stored": config,
            "effective": {
                "data_root": resolved.data_root,
                "catalog_root": resolved.catalog_root,
                "script_timeout_secs": resolved.script_timeout.as_secs(),
            },
        }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        Self::print(&serde_json::json!({ "version": version }))
    }
}
