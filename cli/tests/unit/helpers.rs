//! Shared test helpers: an on-disk fixture, recording fakes for the async
//! ports, and output constructors.

#![allow(dead_code)]
#![allow(clippy::expect_used)]

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use appctl_cli::application::ports::{
    ExecOutcome, ExecRequest, InstalledRegistry, PortProbe, ProgressReporter, ScriptExecutor,
};
use appctl_cli::application::services::AppManager;
use appctl_cli::domain::{AppPaths, EnvMap};
use appctl_cli::infra::OsFs;
use appctl_common::InstalledApp;
use tempfile::TempDir;

pub const TIMEOUT: Duration = Duration::from_secs(5);

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Manifests ────────────────────────────────────────────────────────────────

/// Manifest with one required field and one generated secret.
pub fn secret_manifest(id: &str) -> String {
    format!(
        r#"{{
  "id": "{id}",
  "name": "Test App",
  "availableVersion": 2,
  "requiredPorts": [8080],
  "formFields": [
    {{ "key": "TEST_FIELD", "required": true }},
    {{ "key": "RANDOM_FIELD", "required": true, "randomGenerate": true }}
  ]
}}"#
    )
}

/// Manifest with one required, non-random field and no ports.
pub fn simple_manifest(id: &str) -> String {
    format!(
        r#"{{
  "id": "{id}",
  "name": "Simple",
  "formFields": [ {{ "key": "TEST_FIELD", "required": true }} ]
}}"#
    )
}

// ── On-disk fixture ──────────────────────────────────────────────────────────

/// Data root and catalog root inside one temp directory.
pub struct Fixture {
    _dir: TempDir,
    pub paths: AppPaths,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = AppPaths::new(dir.path().join("data"), dir.path().join("catalog"));
        Self { _dir: dir, paths }
    }

    /// Add `<catalog>/apps/<id>/config.json` and an `app.sh` placeholder.
    pub fn add_catalog_app(&self, id: &str, manifest: &str) -> &Self {
        let dir = self.paths.catalog_app_dir(id);
        std::fs::create_dir_all(&dir).expect("create catalog app dir");
        std::fs::write(dir.join("config.json"), manifest).expect("write catalog manifest");
        std::fs::write(dir.join("app.sh"), "#!/bin/sh\n").expect("write script");
        self
    }

    pub fn write_override(&self, id: &str, manifest: &str) -> &Self {
        let path = self.paths.override_manifest(id);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create app data dir");
        std::fs::write(path, manifest).expect("write override");
        self
    }

    pub fn write_env(&self, id: &str, content: &str) -> &Self {
        let path = self.paths.env_file(id);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create app data dir");
        std::fs::write(path, content).expect("write env");
        self
    }

    pub fn read_env(&self, id: &str) -> String {
        std::fs::read_to_string(self.paths.env_file(id)).expect("read env")
    }

    pub fn catalog_path(&self, rel: &str) -> PathBuf {
        self.paths.catalog_apps_dir().join(rel)
    }

    pub fn manager(&self, fakes: &Fakes) -> TestManager {
        AppManager::new(
            OsFs,
            fakes.probe.clone(),
            fakes.executor.clone(),
            fakes.registry.clone(),
            self.paths.clone(),
            TIMEOUT,
        )
    }
}

pub type TestManager = AppManager<OsFs, FakeProbe, RecordingExecutor, MemoryRegistry>;

/// Shared handles to the fakes a [`TestManager`] was built with.
#[derive(Default)]
pub struct Fakes {
    pub probe: FakeProbe,
    pub executor: RecordingExecutor,
    pub registry: MemoryRegistry,
}

pub fn fields(pairs: &[(&str, &str)]) -> EnvMap {
    pairs.iter().copied().collect()
}

// ── Port probe ───────────────────────────────────────────────────────────────

/// Reports the configured ports as bound.
#[derive(Clone, Default)]
pub struct FakeProbe {
    busy: Arc<Mutex<HashSet<u16>>>,
    probed: Arc<Mutex<Vec<u16>>>,
}

impl FakeProbe {
    pub fn bind(&self, port: u16) {
        self.busy.lock().expect("lock").insert(port);
    }

    pub fn probed(&self) -> Vec<u16> {
        self.probed.lock().expect("lock").clone()
    }
}

impl PortProbe for FakeProbe {
    async fn is_port_bound(&self, port: u16) -> Result<bool> {
        self.probed.lock().expect("lock").push(port);
        Ok(self.busy.lock().expect("lock").contains(&port))
    }
}

// ── Script executor ──────────────────────────────────────────────────────────

/// What the fake executor does for one invocation.
#[derive(Clone, Debug)]
pub enum Scripted {
    Exit { code: i32, stderr: String },
    Timeout,
}

/// Records every request; replays queued results, then succeeds.
#[derive(Clone, Default)]
pub struct RecordingExecutor {
    calls: Arc<Mutex<Vec<ExecRequest>>>,
    queue: Arc<Mutex<VecDeque<Scripted>>>,
}

impl RecordingExecutor {
    pub fn push(&self, result: Scripted) {
        self.queue.lock().expect("lock").push_back(result);
    }

    pub fn fail_next(&self, code: i32, stderr: &str) {
        self.push(Scripted::Exit {
            code,
            stderr: stderr.to_string(),
        });
    }

    pub fn calls(&self) -> Vec<ExecRequest> {
        self.calls.lock().expect("lock").clone()
    }

    /// `args` of every call, e.g. `[["install", "whoami"], ...]`.
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.calls().into_iter().map(|c| c.args).collect()
    }
}

impl ScriptExecutor for RecordingExecutor {
    async fn execute(&self, request: &ExecRequest) -> Result<ExecOutcome> {
        self.calls.lock().expect("lock").push(request.clone());
        let next = self.queue.lock().expect("lock").pop_front();
        Ok(match next {
            None => ExecOutcome::Completed(ok_output(b"")),
            Some(Scripted::Exit { code: 0, .. }) => ExecOutcome::Completed(ok_output(b"")),
            Some(Scripted::Exit { code, stderr }) => {
                ExecOutcome::Completed(err_output(code, stderr.as_bytes()))
            }
            Some(Scripted::Timeout) => ExecOutcome::TimedOut,
        })
    }
}

// ── Installed registry ───────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MemoryRegistry {
    apps: Arc<Mutex<BTreeMap<String, InstalledApp>>>,
}

impl MemoryRegistry {
    pub fn seed(&self, app: InstalledApp) {
        self.apps.lock().expect("lock").insert(app.id.clone(), app);
    }

    pub fn snapshot(&self, id: &str) -> Option<InstalledApp> {
        self.apps.lock().expect("lock").get(id).cloned()
    }
}

impl InstalledRegistry for MemoryRegistry {
    async fn get(&self, app_id: &str) -> Result<Option<InstalledApp>> {
        Ok(self.snapshot(app_id))
    }

    async fn list(&self) -> Result<Vec<InstalledApp>> {
        Ok(self.apps.lock().expect("lock").values().cloned().collect())
    }

    async fn upsert(&self, app: &InstalledApp) -> Result<()> {
        self.seed(app.clone());
        Ok(())
    }

    async fn remove(&self, app_id: &str) -> Result<()> {
        self.apps.lock().expect("lock").remove(app_id);
        Ok(())
    }
}

// ── Reporter ─────────────────────────────────────────────────────────────────

pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

/// The `AppError` at the root of `err`, panicking if there is none.
pub fn app_error(err: &anyhow::Error) -> appctl_cli::domain::AppError {
    err.chain()
        .find_map(|c| c.downcast_ref::<appctl_cli::domain::AppError>())
        .cloned()
        .unwrap_or_else(|| panic!("expected an AppError, got: {err:#}"))
}
