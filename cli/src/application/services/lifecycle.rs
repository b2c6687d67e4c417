//! Application service — the app lifecycle manager.
//!
//! `AppManager` owns the injected ports and exposes both the individual
//! component operations (requirements, environment, scripts, info, updates,
//! listing) and the orchestrated lifecycle actions built from them.
//!
//! Imports only from `crate::domain` and `crate::application`.

use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use appctl_common::{
    AppManifest, InstalledApp, ResolutionSource, ResolvedManifest, UpdateInfo,
};

use crate::application::ports::{
    InstalledRegistry, LocalFs, PortProbe, ProgressReporter, ScriptExecutor,
};
use crate::application::services::locks::AppLocks;
use crate::application::services::{
    app_info, catalog, environment, manifest_store, requirements, scripts, updates,
};
use crate::domain::{AppError, AppPaths, EnvMap, RequirementReport, Verb, validate_app_id};

/// App lifecycle manager parameterized over its ports.
///
/// Lifecycle actions on the same app id are serialized through [`AppLocks`];
/// different apps proceed independently.
pub struct AppManager<F, P, E, R> {
    fs: F,
    probe: P,
    executor: E,
    registry: R,
    paths: AppPaths,
    script_timeout: Duration,
    locks: AppLocks,
}

impl<F, P, E, R> AppManager<F, P, E, R>
where
    F: LocalFs,
    P: PortProbe,
    E: ScriptExecutor,
    R: InstalledRegistry,
{
    #[must_use]
    pub fn new(
        fs: F,
        probe: P,
        executor: E,
        registry: R,
        paths: AppPaths,
        script_timeout: Duration,
    ) -> Self {
        Self {
            fs,
            probe,
            executor,
            registry,
            paths,
            script_timeout,
            locks: AppLocks::new(),
        }
    }

    #[must_use]
    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    // ── Component operations ─────────────────────────────────────────────────

    /// See [`requirements::check_requirements`].
    pub async fn check_requirements(&self, app_id: &str) -> Result<bool> {
        requirements::check_requirements(&self.fs, &self.paths, &self.probe, app_id).await
    }

    /// See [`requirements::requirement_report`].
    pub async fn requirement_report(&self, app_id: &str) -> Result<RequirementReport> {
        requirements::requirement_report(&self.fs, &self.paths, &self.probe, app_id).await
    }

    /// See [`environment::get_environment`].
    pub fn get_environment(&self, app_id: &str) -> Result<EnvMap> {
        environment::get_environment(&self.fs, &self.paths, app_id)
    }

    /// See [`environment::validate_environment`].
    pub fn validate_environment(&self, app_id: &str) -> Result<()> {
        environment::validate_environment(&self.fs, &self.paths, app_id)
    }

    /// [`environment::generate_environment`] under the per-app lock.
    pub async fn generate_environment(&self, app_id: &str, user_fields: &EnvMap) -> Result<EnvMap> {
        validate_app_id(app_id)?;
        let _guard = self.locks.acquire(app_id).await;
        environment::generate_environment(&self.fs, &self.paths, app_id, user_fields)
    }

    /// [`scripts::run_script`] under the lock of the app named by `args[1]`.
    pub async fn run_script(&self, args: &[String]) -> Result<Output> {
        let app_id = args.get(1).map(String::as_str).unwrap_or_default();
        validate_app_id(app_id)?;
        let _guard = self.locks.acquire(app_id).await;
        self.run_script_unlocked(args).await
    }

    /// See [`app_info::get_app_info`].
    pub fn get_app_info(&self, app_id: &str) -> Result<ResolvedManifest> {
        app_info::get_app_info(&self.fs, &self.paths, app_id)
    }

    /// See [`updates::get_update_info`].
    pub async fn get_update_info(&self, app_id: &str) -> Result<Option<UpdateInfo>> {
        updates::get_update_info(&self.fs, &self.paths, &self.registry, app_id).await
    }

    /// See [`catalog::list_available_apps`].
    pub fn list_available_apps(&self) -> Result<Vec<AppManifest>> {
        catalog::list_available_apps(&self.fs, &self.paths)
    }

    /// Registry records of every installed app.
    pub async fn list_installed(&self) -> Result<Vec<InstalledApp>> {
        self.registry.list().await
    }

    /// Registry record of one app, `None` when it is not installed.
    pub async fn registry_record(&self, app_id: &str) -> Result<Option<InstalledApp>> {
        validate_app_id(app_id)?;
        self.registry.get(app_id).await
    }

    // ── Lifecycle actions ────────────────────────────────────────────────────

    /// Install `app_id` from the catalog with the caller's form values.
    ///
    /// Steps: refuse if installed → check ports → write env → run `install`
    /// → pin the catalog manifest as the local override → record the version.
    /// Ports and fields are checked against the catalog manifest, never a
    /// pinned copy left behind by an earlier install.
    ///
    /// # Errors
    ///
    /// `AlreadyInstalled`, `AppNotFound`, `LoadError`, `PortsUnavailable`,
    /// `MissingField`, `ScriptFailed`, `Cancelled`, or an I/O error. The env
    /// file written before a failed script is kept so a retry reuses its secrets.
    pub async fn install(
        &self,
        app_id: &str,
        user_fields: &EnvMap,
        reporter: &impl ProgressReporter,
    ) -> Result<ResolvedManifest> {
        validate_app_id(app_id)?;
        let _guard = self.locks.acquire(app_id).await;

        if self.registry.get(app_id).await?.is_some() {
            return Err(AppError::AlreadyInstalled(app_id.to_string()).into());
        }
        let manifest = manifest_store::load_catalog_manifest(&self.fs, &self.paths, app_id)?;
        if self.fs.exists(&self.paths.override_manifest(app_id)) {
            tracing::warn!(app_id, "ignoring pinned manifest left by an earlier install");
            reporter.warn(&format!(
                "ignoring leftover pinned manifest for '{app_id}'; using the catalog copy"
            ));
        }

        reporter.step(&format!("checking requirements for '{app_id}'..."));
        let report = requirements::manifest_report(&self.probe, &manifest).await?;
        if !report.is_satisfied() {
            return Err(AppError::PortsUnavailable {
                app_id: app_id.to_string(),
                ports: report.busy_ports,
            }
            .into());
        }

        reporter.step("writing environment...");
        environment::generate_for_manifest(&self.fs, &self.paths, &manifest, user_fields)?;

        reporter.step(&format!("running install script for '{app_id}'..."));
        self.run_script_unlocked(&Verb::Install.args(app_id)).await?;

        manifest_store::pin_override(&self.fs, &self.paths, &manifest)?;
        self.registry
            .upsert(&InstalledApp::new(app_id, Some(manifest.available_version)))
            .await?;

        tracing::info!(app_id, version = manifest.available_version, "app installed");
        reporter.success(&format!("app '{app_id}' installed"));
        Ok(ResolvedManifest {
            manifest,
            source: ResolutionSource::LocalOverride,
        })
    }

    /// Start an installed app after confirming its environment is current.
    ///
    /// # Errors
    ///
    /// `NotInstalled`, `ConfigOutdated`, `ScriptFailed`, `Cancelled`.
    pub async fn start(&self, app_id: &str, reporter: &impl ProgressReporter) -> Result<()> {
        validate_app_id(app_id)?;
        let _guard = self.locks.acquire(app_id).await;
        self.start_unlocked(app_id, reporter).await
    }

    /// Stop an installed app.
    ///
    /// # Errors
    ///
    /// `NotInstalled`, `ScriptFailed`, `Cancelled`.
    pub async fn stop(&self, app_id: &str, reporter: &impl ProgressReporter) -> Result<()> {
        validate_app_id(app_id)?;
        let _guard = self.locks.acquire(app_id).await;
        self.stop_unlocked(app_id, reporter).await
    }

    /// Stop then start, holding the app lock across both.
    ///
    /// # Errors
    ///
    /// See [`Self::stop`] and [`Self::start`].
    pub async fn restart(&self, app_id: &str, reporter: &impl ProgressReporter) -> Result<()> {
        validate_app_id(app_id)?;
        let _guard = self.locks.acquire(app_id).await;
        self.stop_unlocked(app_id, reporter).await?;
        self.start_unlocked(app_id, reporter).await
    }

    /// Regenerate the env file of an installed app with new form values.
    ///
    /// # Errors
    ///
    /// `NotInstalled`, `MissingField`, `InvalidField`, manifest or I/O errors.
    pub async fn reconfigure(
        &self,
        app_id: &str,
        user_fields: &EnvMap,
        reporter: &impl ProgressReporter,
    ) -> Result<EnvMap> {
        validate_app_id(app_id)?;
        let _guard = self.locks.acquire(app_id).await;
        self.ensure_installed(app_id).await?;

        reporter.step(&format!("writing environment for '{app_id}'..."));
        let env = environment::generate_environment(&self.fs, &self.paths, app_id, user_fields)?;
        reporter.success(&format!("app '{app_id}' reconfigured"));
        Ok(env)
    }

    /// Update an installed app to the catalog version.
    ///
    /// Returns the version pair observed before the update.
    ///
    /// # Errors
    ///
    /// `NotInstalled`, `NoUpdateAvailable`, `ScriptFailed`, `Cancelled`,
    /// manifest or registry errors.
    pub async fn update(&self, app_id: &str, reporter: &impl ProgressReporter) -> Result<UpdateInfo> {
        validate_app_id(app_id)?;
        let _guard = self.locks.acquire(app_id).await;
        let mut record = self.ensure_installed(app_id).await?;

        let info = self
            .get_update_info(app_id)
            .await?
            .ok_or_else(|| AppError::NotInstalled(app_id.to_string()))?;
        if !info.update_available() {
            return Err(AppError::NoUpdateAvailable(app_id.to_string()).into());
        }

        reporter.step(&format!(
            "updating '{app_id}' from version {} to {}...",
            info.current, info.latest
        ));
        self.run_script_unlocked(&Verb::Update.args(app_id)).await?;

        let manifest = manifest_store::load_catalog_manifest(&self.fs, &self.paths, app_id)?;
        manifest_store::pin_override(&self.fs, &self.paths, &manifest)?;
        record.version = Some(manifest.available_version);
        self.registry.upsert(&record).await?;

        tracing::info!(app_id, from = info.current, to = manifest.available_version, "app updated");
        reporter.success(&format!("app '{app_id}' updated"));
        Ok(info)
    }

    /// Uninstall an app: run the script, then drop its data directory and
    /// registry record.
    ///
    /// # Errors
    ///
    /// `NotInstalled`, `ScriptFailed`, `Cancelled`, or an I/O error. State is
    /// left untouched when the script fails.
    pub async fn uninstall(&self, app_id: &str, reporter: &impl ProgressReporter) -> Result<()> {
        validate_app_id(app_id)?;
        let _guard = self.locks.acquire(app_id).await;
        self.ensure_installed(app_id).await?;

        reporter.step(&format!("running uninstall script for '{app_id}'..."));
        self.run_script_unlocked(&Verb::Uninstall.args(app_id)).await?;

        let data_dir = self.paths.app_data_dir(app_id);
        if self.fs.exists(&data_dir) {
            self.fs.remove_dir_all(&data_dir)?;
        }
        self.registry.remove(app_id).await?;

        tracing::info!(app_id, "app uninstalled");
        reporter.success(&format!("app '{app_id}' uninstalled"));
        Ok(())
    }

    // ── Internals (caller holds the app lock) ────────────────────────────────

    async fn ensure_installed(&self, app_id: &str) -> Result<InstalledApp> {
        self.registry
            .get(app_id)
            .await?
            .ok_or_else(|| AppError::NotInstalled(app_id.to_string()).into())
    }

    async fn start_unlocked(&self, app_id: &str, reporter: &impl ProgressReporter) -> Result<()> {
        self.ensure_installed(app_id).await?;
        self.validate_environment(app_id)?;

        reporter.step(&format!("starting '{app_id}'..."));
        self.run_script_unlocked(&Verb::Start.args(app_id)).await?;
        reporter.success(&format!("app '{app_id}' started"));
        Ok(())
    }

    async fn stop_unlocked(&self, app_id: &str, reporter: &impl ProgressReporter) -> Result<()> {
        self.ensure_installed(app_id).await?;

        reporter.step(&format!("stopping '{app_id}'..."));
        self.run_script_unlocked(&Verb::Stop.args(app_id)).await?;
        reporter.success(&format!("app '{app_id}' stopped"));
        Ok(())
    }

    async fn run_script_unlocked(&self, args: &[String]) -> Result<Output> {
        scripts::run_script(
            &self.fs,
            &self.paths,
            &self.executor,
            self.script_timeout,
            args,
        )
        .await
    }
}
