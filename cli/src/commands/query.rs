//! Read-only commands: `list`, `info`, `check`, `env`, `update-status`.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::domain::validate_app_id;

/// Arguments for `appctl list`.
#[derive(Args, Default)]
pub struct ListArgs {
    /// Show installed apps instead of the catalog
    #[arg(long)]
    pub installed: bool,
}

/// Arguments for `appctl env`.
#[derive(Args)]
pub struct EnvArgs {
    /// App id
    pub app_id: String,
    /// Print generated secrets instead of masking them
    #[arg(long)]
    pub show_secrets: bool,
}

/// Run `appctl list`.
///
/// # Errors
///
/// Returns an error if the catalog or registry cannot be read.
pub async fn list(app: &AppContext, args: &ListArgs) -> Result<ExitCode> {
    let installed = app.manager.list_installed().await?;
    if args.installed {
        app.renderer().render_installed(&installed)?;
    } else {
        let apps = app.manager.list_available_apps()?;
        app.renderer().render_catalog(&apps, &installed)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Run `appctl info <id>`.
///
/// # Errors
///
/// Returns `LoadError` if no manifest can be resolved.
pub async fn info(app: &AppContext, app_id: &str) -> Result<ExitCode> {
    let resolved = app.manager.get_app_info(app_id)?;
    let installed = app.manager.registry_record(app_id).await?;
    app.renderer()
        .render_app_info(&resolved, installed.as_ref())?;
    Ok(ExitCode::SUCCESS)
}

/// Run `appctl check <id>`. Exits non-zero when a required port is busy.
///
/// # Errors
///
/// Returns an error if the manifest cannot be resolved or a probe fails.
pub async fn check(app: &AppContext, app_id: &str) -> Result<ExitCode> {
    let report = app.manager.requirement_report(app_id).await?;
    app.renderer().render_requirements(&report)?;
    Ok(if report.is_satisfied() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Run `appctl env <id>`.
///
/// # Errors
///
/// Returns an error if the env file exists but cannot be read.
pub fn env(app: &AppContext, args: &EnvArgs) -> Result<ExitCode> {
    let env = app.manager.get_environment(&args.app_id)?;
    let masked: Vec<String> = if args.show_secrets {
        Vec::new()
    } else {
        app.manager
            .get_app_info(&args.app_id)
            .map(|resolved| {
                resolved
                    .manifest
                    .random_fields()
                    .map(|f| f.key.clone())
                    .collect()
            })
            // No manifest left to say which keys are secrets: mask everything.
            .unwrap_or_else(|_| env.iter().map(|(k, _)| k.to_string()).collect())
    };
    app.renderer().render_env(&args.app_id, &env, &masked)?;
    Ok(ExitCode::SUCCESS)
}

/// Run `appctl update-status <id>`.
///
/// # Errors
///
/// Returns an error if the registry or manifests cannot be read.
pub async fn update_status(app: &AppContext, app_id: &str) -> Result<ExitCode> {
    validate_app_id(app_id)?;
    let info = app.manager.get_update_info(app_id).await?;
    app.renderer().render_update_info(app_id, info.as_ref())?;
    Ok(ExitCode::SUCCESS)
}
