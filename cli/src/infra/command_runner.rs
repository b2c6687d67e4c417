//! Infrastructure implementation of the `ScriptExecutor` port.
//!
//! `TokioScriptExecutor` runs lifecycle scripts with tokio, enforcing the
//! request timeout with an explicit kill on every platform.

use std::process::{Output, Stdio};

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::application::ports::{ExecOutcome, ExecRequest, ScriptExecutor};

/// Production `ScriptExecutor`.
///
/// `tokio::time::timeout` around `.output().await` only drops the future; the
/// OS process keeps running on some platforms. This uses `tokio::select!`
/// with an explicit `child.kill()` so a timed-out script is terminated, and
/// `kill_on_drop` so a cancelled caller does not leave it behind either.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScriptExecutor;

impl ScriptExecutor for TokioScriptExecutor {
    async fn execute(&self, request: &ExecRequest) -> Result<ExecOutcome> {
        let program = request.program.display().to_string();
        let mut command = tokio::process::Command::new(&request.program);
        command
            .args(&request.args)
            .envs(request.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &request.cwd {
            command.current_dir(cwd);
        }
        let mut child = command
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    drain(stdout_handle.as_mut()),
                    drain(stderr_handle.as_mut()),
                );
                Ok(ExecOutcome::Completed(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                }))
            } => result,
            () = tokio::time::sleep(request.timeout) => {
                if let Err(e) = child.kill().await {
                    tracing::warn!(%program, error = %e, "failed to kill timed-out script");
                }
                Ok(ExecOutcome::TimedOut)
            }
        }
    }
}

async fn drain<R: AsyncRead + Unpin>(handle: Option<&mut R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(h) = handle {
        let _ = h.read_to_end(&mut buf).await;
    }
    buf
}
