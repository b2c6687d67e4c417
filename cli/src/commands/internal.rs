//! Hidden commands for script authors.

use std::io::Write as _;
use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::app::AppContext;

/// Run `appctl _run-script <verb> <id> [extra...]` and relay the script's
/// captured output.
///
/// # Errors
///
/// Returns an error if the script is missing, fails, or times out.
pub async fn run_script(app: &AppContext, args: &[String]) -> Result<ExitCode> {
    let output = app.manager.run_script(args).await?;
    std::io::stdout()
        .write_all(&output.stdout)
        .context("writing script stdout")?;
    std::io::stderr()
        .write_all(&output.stderr)
        .context("writing script stderr")?;
    Ok(ExitCode::SUCCESS)
}
