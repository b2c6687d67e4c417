//! Application service — lifecycle script invocation.
//!
//! The script is opaque: this module only resolves its path, launches it
//! through the `ScriptExecutor` port, and classifies the outcome.

use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{ExecOutcome, ExecRequest, LocalFs, ScriptExecutor};
use crate::domain::{AppError, AppPaths, validate_app_id};

/// Lines of stderr kept in a `ScriptFailed` error.
const EXCERPT_LINES: usize = 20;
/// Upper bound on the excerpt length, in characters.
const EXCERPT_CHARS: usize = 2000;

/// Run the lifecycle script with `args` = `[verb, app_id, extra...]`.
///
/// Blocks (asynchronously) until the child exits. No retry.
///
/// # Errors
///
/// - [`AppError::InvalidAppId`] / [`AppError::ScriptNotFound`] before launch
/// - [`AppError::ScriptFailed`] on non-zero exit
/// - [`AppError::Cancelled`] when `timeout` elapses (the child is killed)
pub async fn run_script(
    fs: &impl LocalFs,
    paths: &AppPaths,
    executor: &impl ScriptExecutor,
    timeout: Duration,
    args: &[String],
) -> Result<Output> {
    let [verb, app_id, ..] = args else {
        anyhow::bail!("lifecycle script needs at least a verb and an app id, got {args:?}");
    };
    validate_app_id(app_id)?;

    let script = paths.script(app_id);
    if !fs.exists(&script) {
        return Err(AppError::ScriptNotFound(script.display().to_string()).into());
    }

    let request = ExecRequest {
        program: script,
        args: args.to_vec(),
        cwd: Some(paths.catalog_app_dir(app_id)),
        env: script_env(paths, app_id),
        timeout,
    };

    tracing::info!(%verb, %app_id, "running lifecycle script");
    match executor.execute(&request).await? {
        ExecOutcome::TimedOut => {
            tracing::warn!(%verb, %app_id, secs = timeout.as_secs(), "lifecycle script timed out");
            Err(AppError::Cancelled {
                app_id: app_id.clone(),
                after_secs: timeout.as_secs(),
            }
            .into())
        }
        ExecOutcome::Completed(output) if output.status.success() => {
            tracing::debug!(%verb, %app_id, "lifecycle script finished");
            Ok(output)
        }
        ExecOutcome::Completed(output) => {
            let code = output.status.code().unwrap_or(-1);
            tracing::warn!(%verb, %app_id, code, "lifecycle script failed");
            Err(AppError::ScriptFailed {
                code,
                detail: output_excerpt(&output),
            }
            .into())
        }
    }
}

/// Variables exported to every script so it can find the app's data.
fn script_env(paths: &AppPaths, app_id: &str) -> Vec<(String, String)> {
    vec![
        ("APPCTL_APP_ID".to_string(), app_id.to_string()),
        (
            "APPCTL_DATA_ROOT".to_string(),
            paths.data_root().display().to_string(),
        ),
        (
            "APPCTL_APP_DATA_DIR".to_string(),
            paths.app_data_dir(app_id).display().to_string(),
        ),
        (
            "APPCTL_ENV_FILE".to_string(),
            paths.env_file(app_id).display().to_string(),
        ),
    ]
}

/// Tail of stderr (or stdout when stderr is empty), bounded in lines and chars.
#[must_use]
pub fn output_excerpt(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let text = if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout)
    } else {
        stderr
    };
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let tail = lines[lines.len().saturating_sub(EXCERPT_LINES)..].join("\n");
    if tail.trim().is_empty() {
        return "no output".to_string();
    }
    let count = tail.chars().count();
    if count <= EXCERPT_CHARS {
        tail
    } else {
        tail.chars().skip(count - EXCERPT_CHARS).collect()
    }
}
