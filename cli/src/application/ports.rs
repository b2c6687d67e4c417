//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `appctl_common`, never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use appctl_common::InstalledApp;

use crate::domain::config::AppctlConfig;

// ── Port Prober ───────────────────────────────────────────────────────────────

/// Answers whether a TCP port is currently bound on the host.
#[allow(async_fn_in_trait)]
pub trait PortProbe {
    /// Returns `true` when something already listens on `port`.
    ///
    /// # Errors
    ///
    /// Returns an error only when the probe itself cannot run; a busy port
    /// is `Ok(true)`.
    async fn is_port_bound(&self, port: u16) -> Result<bool>;
}

// ── Script Executor ───────────────────────────────────────────────────────────

/// Launch parameters for one lifecycle script invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Working directory for the child.
    pub cwd: Option<PathBuf>,
    /// Extra environment variables layered over the inherited environment.
    pub env: Vec<(String, String)>,
    /// The child is killed when this elapses.
    pub timeout: Duration,
}

/// How a child process ended.
#[derive(Debug)]
pub enum ExecOutcome {
    /// The process exited on its own, successfully or not.
    Completed(Output),
    /// The timeout fired and the child was killed.
    TimedOut,
}

/// Abstracts process execution so the manager can be tested with a fake
/// that records invocations and returns scripted results.
#[allow(async_fn_in_trait)]
pub trait ScriptExecutor {
    /// Run `request.program` to completion, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or awaited. A
    /// non-zero exit is NOT an error at this level.
    async fn execute(&self, request: &ExecRequest) -> Result<ExecOutcome>;
}

// ── Installed Registry ────────────────────────────────────────────────────────

/// The persisted record of installed apps and their version markers.
#[allow(async_fn_in_trait)]
pub trait InstalledRegistry {
    /// Look up one app, `None` if it is not installed.
    async fn get(&self, app_id: &str) -> Result<Option<InstalledApp>>;
    /// All installed apps.
    async fn list(&self) -> Result<Vec<InstalledApp>>;
    /// Insert or replace the record for `app.id`.
    async fn upsert(&self, app: &InstalledApp) -> Result<()>;
    /// Remove a record; removing an absent record is not an error.
    async fn remove(&self, app_id: &str) -> Result<()>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts raw filesystem operations so stores can run against an
/// in-memory filesystem in tests.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    /// Replace `path` with `content` in a single step (no partially written
    /// file). The file carries `mode` from the moment it appears at `path`.
    fn write(&self, path: &Path, content: String, mode: u32) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Direct children of `path`, in enumeration order.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts the user configuration file.
pub trait ConfigStore {
    /// Load the file, returning defaults when it does not exist.
    fn load(&self) -> Result<AppctlConfig>;
    fn save(&self, config: &AppctlConfig) -> Result<()>;
    fn path(&self) -> Result<PathBuf>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
