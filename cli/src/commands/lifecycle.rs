//! Lifecycle commands: `install`, `start`, `stop`, `restart`, `reconfigure`,
//! `update`, `uninstall`.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::domain::EnvMap;

/// Arguments shared by commands that take form values.
#[derive(Args)]
pub struct FieldArgs {
    /// App id
    pub app_id: String,
    /// Form value as KEY=VALUE (repeatable)
    #[arg(short = 'f', long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

impl FieldArgs {
    fn env(&self) -> EnvMap {
        self.fields.iter().cloned().collect()
    }
}

/// Arguments for `appctl uninstall`.
#[derive(Args)]
pub struct UninstallArgs {
    /// App id
    pub app_id: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Parse one `KEY=VALUE` pair; the value may itself contain `=`.
///
/// # Errors
///
/// Returns an error when there is no `=` or the key is empty.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

/// Run `appctl install <id> [-f KEY=VALUE...]`.
///
/// # Errors
///
/// Propagates every install failure (ports, fields, script).
pub async fn install(app: &AppContext, args: &FieldArgs) -> Result<ExitCode> {
    let reporter = app.reporter();
    app.manager
        .install(&args.app_id, &args.env(), &reporter)
        .await?;
    app.renderer().render_action(&args.app_id, "install")?;
    Ok(ExitCode::SUCCESS)
}

/// Run `appctl start <id>`.
///
/// # Errors
///
/// Returns an error if the app is not installed, its environment is
/// outdated, or the script fails.
pub async fn start(app: &AppContext, app_id: &str) -> Result<ExitCode> {
    app.manager.start(app_id, &app.reporter()).await?;
    app.renderer().render_action(app_id, "start")?;
    Ok(ExitCode::SUCCESS)
}

/// Run `appctl stop <id>`.
///
/// # Errors
///
/// Returns an error if the app is not installed or the script fails.
pub async fn stop(app: &AppContext, app_id: &str) -> Result<ExitCode> {
    app.manager.stop(app_id, &app.reporter()).await?;
    app.renderer().render_action(app_id, "stop")?;
    Ok(ExitCode::SUCCESS)
}

/// Run `appctl restart <id>`.
///
/// # Errors
///
/// Returns an error if either the stop or the start step fails.
pub async fn restart(app: &AppContext, app_id: &str) -> Result<ExitCode> {
    app.manager.restart(app_id, &app.reporter()).await?;
    app.renderer().render_action(app_id, "restart")?;
    Ok(ExitCode::SUCCESS)
}

/// Run `appctl reconfigure <id> [-f KEY=VALUE...]`.
///
/// Generated secrets are kept; the app must be restarted to pick up changes.
///
/// # Errors
///
/// Returns an error if the app is not installed or a required field is missing.
pub async fn reconfigure(app: &AppContext, args: &FieldArgs) -> Result<ExitCode> {
    app.manager
        .reconfigure(&args.app_id, &args.env(), &app.reporter())
        .await?;
    if !app.is_json() {
        app.output.info(&format!(
            "Restart to apply: appctl restart {}",
            args.app_id
        ));
    }
    app.renderer().render_action(&args.app_id, "reconfigure")?;
    Ok(ExitCode::SUCCESS)
}

/// Run `appctl update <id>`.
///
/// # Errors
///
/// Returns an error if no update is available or the script fails.
pub async fn update(app: &AppContext, app_id: &str) -> Result<ExitCode> {
    app.manager.update(app_id, &app.reporter()).await?;
    app.renderer().render_action(app_id, "update")?;
    Ok(ExitCode::SUCCESS)
}

/// Run `appctl uninstall <id> [--yes]`.
///
/// # Errors
///
/// Returns an error if the app is not installed or the script fails.
pub async fn uninstall(app: &AppContext, args: &UninstallArgs) -> Result<ExitCode> {
    let proceed = args.yes
        || app.non_interactive
        || app.confirm(
            &format!(
                "Uninstall '{}' and delete its data? This cannot be undone",
                args.app_id
            ),
            false,
        )?;
    if !proceed {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    app.manager.uninstall(&args.app_id, &app.reporter()).await?;
    app.renderer().render_action(&args.app_id, "uninstall")?;
    Ok(ExitCode::SUCCESS)
}
