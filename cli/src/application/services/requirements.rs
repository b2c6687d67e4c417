//! Application service — host requirement checks.

use anyhow::{Context, Result};
use appctl_common::AppManifest;

use crate::application::ports::{LocalFs, PortProbe};
use crate::application::services::manifest_store::require_manifest;
use crate::domain::{AppPaths, RequirementReport};

/// Probe every port `app_id` requires and report which are busy.
///
/// # Errors
///
/// Returns `AppNotFound`/`LoadError` for manifest problems, or an error when
/// the probe itself fails. Busy ports are reported, never raised.
pub async fn requirement_report(
    fs: &impl LocalFs,
    paths: &AppPaths,
    probe: &impl PortProbe,
    app_id: &str,
) -> Result<RequirementReport> {
    let resolved = require_manifest(fs, paths, app_id)?;
    manifest_report(probe, &resolved.manifest).await
}

/// Probe the ports `manifest` declares; duplicates are probed once.
///
/// # Errors
///
/// Returns an error when the probe itself fails.
pub async fn manifest_report(
    probe: &impl PortProbe,
    manifest: &AppManifest,
) -> Result<RequirementReport> {
    let app_id = manifest.id.as_str();
    let mut required_ports = manifest.required_ports.clone();
    let mut seen = std::collections::HashSet::new();
    required_ports.retain(|port| seen.insert(*port));

    let mut busy_ports = Vec::new();
    for &port in &required_ports {
        let bound = probe
            .is_port_bound(port)
            .await
            .with_context(|| format!("probing port {port}"))?;
        if bound {
            tracing::info!(app_id, port, "required port is in use");
            busy_ports.push(port);
        }
    }

    Ok(RequirementReport {
        app_id: app_id.to_string(),
        required_ports,
        busy_ports,
    })
}

/// `true` when every required port is free (or none are declared).
///
/// # Errors
///
/// See [`requirement_report`].
pub async fn check_requirements(
    fs: &impl LocalFs,
    paths: &AppPaths,
    probe: &impl PortProbe,
    app_id: &str,
) -> Result<bool> {
    Ok(requirement_report(fs, paths, probe, app_id)
        .await?
        .is_satisfied())
}
