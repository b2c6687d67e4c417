//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator. Callers recover the variant with
//! `err.downcast_ref::<AppError>()`.

use thiserror::Error;

/// Failures surfaced by the app lifecycle manager.
///
/// A busy port during `check_requirements` is NOT an error; only the
/// orchestrated `install`/`start` paths turn it into [`AppError::PortsUnavailable`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("App '{0}' not found in the catalog.")]
    AppNotFound(String),

    #[error("Failed to load manifest for app '{app_id}': {reason}")]
    LoadError { app_id: String, reason: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field '{0}' has an invalid key or a multi-line value")]
    InvalidField(String),

    #[error(
        "Configuration for '{app_id}' is outdated, missing: {}. Run 'appctl reconfigure {app_id}'.",
        missing.join(", ")
    )]
    ConfigOutdated { app_id: String, missing: Vec<String> },

    #[error("Lifecycle script exited with code {code}: {detail}")]
    ScriptFailed { code: i32, detail: String },

    #[error("Lifecycle script for '{app_id}' was cancelled after {after_secs}s")]
    Cancelled { app_id: String, after_secs: u64 },

    #[error("Lifecycle script not found: {0}")]
    ScriptNotFound(String),

    #[error("Invalid app id '{0}': must match ^[a-z0-9]([a-z0-9-]{{0,61}}[a-z0-9])?$")]
    InvalidAppId(String),

    #[error("App '{0}' is not installed.")]
    NotInstalled(String),

    #[error("App '{0}' is already installed. Uninstall it first: appctl uninstall {0}")]
    AlreadyInstalled(String),

    #[error("App '{app_id}' needs ports that are already in use: {}", format_ports(ports))]
    PortsUnavailable { app_id: String, ports: Vec<u16> },

    #[error("App '{0}' is already at the latest version.")]
    NoUpdateAvailable(String),
}

fn format_ports(ports: &[u16]) -> String {
    ports
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl AppError {
    /// Stable machine-readable code for `--json` error objects.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AppNotFound(_) => "APP_NOT_FOUND",
            Self::LoadError { .. } => "LOAD_ERROR",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidField(_) => "INVALID_FIELD",
            Self::ConfigOutdated { .. } => "CONFIG_OUTDATED",
            Self::ScriptFailed { .. } => "SCRIPT_FAILED",
            Self::Cancelled { .. } => "CANCELLED",
            Self::ScriptNotFound(_) => "SCRIPT_NOT_FOUND",
            Self::InvalidAppId(_) => "INVALID_APP_ID",
            Self::NotInstalled(_) => "NOT_INSTALLED",
            Self::AlreadyInstalled(_) => "ALREADY_INSTALLED",
            Self::PortsUnavailable { .. } => "PORTS_UNAVAILABLE",
            Self::NoUpdateAvailable(_) => "NO_UPDATE_AVAILABLE",
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\n{reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}
