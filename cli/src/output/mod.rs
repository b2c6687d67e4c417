//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::path::Path;

use anyhow::Result;
use appctl_common::{AppManifest, InstalledApp, ResolvedManifest, UpdateInfo};
use console::Term;
use owo_colors::OwoColorize as _;

use crate::domain::config::{AppctlConfig, ManagerConfig};
use crate::domain::{EnvMap, RequirementReport};

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Dispatches rendering to the human or JSON renderer for the active mode.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// Render the catalog, marking installed apps.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_catalog(&self, apps: &[AppManifest], installed: &[InstalledApp]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_catalog(apps, installed);
                Ok(())
            }
            Self::Json(r) => r.render_catalog(apps, installed),
        }
    }

    /// Render installed apps with their version markers.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_installed(&self, apps: &[InstalledApp]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_installed(apps);
                Ok(())
            }
            Self::Json(r) => r.render_installed(apps),
        }
    }

    /// Render one resolved manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_app_info(
        &self,
        resolved: &ResolvedManifest,
        installed: Option<&InstalledApp>,
    ) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_app_info(resolved, installed);
                Ok(())
            }
            Self::Json(r) => r.render_app_info(resolved, installed),
        }
    }

    /// Render a port requirement report.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_requirements(&self, report: &RequirementReport) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_requirements(report);
                Ok(())
            }
            Self::Json(r) => r.render_requirements(report),
        }
    }

    /// Render an app's persisted environment; keys in `masked` are hidden.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_env(&self, app_id: &str, env: &EnvMap, masked: &[String]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_env(app_id, env, masked);
                Ok(())
            }
            Self::Json(r) => r.render_env(app_id, env, masked),
        }
    }

    /// Render update availability; `None` means the app is not installed.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_update_info(&self, app_id: &str, info: Option<&UpdateInfo>) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_update_info(app_id, info);
                Ok(())
            }
            Self::Json(r) => r.render_update_info(app_id, info),
        }
    }

    /// Render the outcome of a lifecycle action.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_action(&self, app_id: &str, action: &str) -> Result<()> {
        match self {
            // Human mode already reported through the progress reporter.
            Self::Human(_) => Ok(()),
            Self::Json(r) => r.render_action(app_id, action),
        }
    }

    /// Render the stored and resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(
        &self,
        config: &AppctlConfig,
        resolved: &ManagerConfig,
        path: &Path,
    ) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_config(config, resolved, path);
                Ok(())
            }
            Self::Json(r) => r.render_config(config, resolved, path),
        }
    }

    /// Render the CLI version.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_version(version);
                Ok(())
            }
            Self::Json(r) => r.render_version(version),
        }
    }
}
