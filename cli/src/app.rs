//! Application context — unified state passed to every command handler.
//!
//! `AppContext` wires the production adapters into an [`AppManager`] once per
//! invocation, alongside the output context and prompt behaviour.

use anyhow::Result;

use crate::application::services::AppManager;
use crate::domain::AppPaths;
use crate::domain::config::{AppctlConfig, ManagerConfig};
use crate::infra::config::resolve_config;
use crate::infra::{JsonRegistry, OsFs, TcpPortProbe, TokioScriptExecutor, YamlConfigStore};
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer, TerminalReporter};

/// The manager wired to real adapters.
pub type ProductionManager = AppManager<OsFs, TcpPortProbe, TokioScriptExecutor, JsonRegistry>;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Settings given on the command line; highest precedence.
    pub overrides: AppctlConfig,
    /// Skip interactive prompts (also set by `CI` / `APPCTL_YES` env vars).
    pub yes: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Persisted user configuration.
    pub config_store: YamlConfigStore,
    /// Effective settings after layering flags, environment and file.
    pub config: ManagerConfig,
    /// App lifecycle manager.
    pub manager: ProductionManager,
    /// When `true`, skip interactive prompts and use defaults.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be resolved.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("APPCTL_YES").is_ok();
        let non_interactive = flags.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let config_store = YamlConfigStore;
        let config = resolve_config(&config_store, flags.overrides)?;
        tracing::debug!(?config, "resolved settings");

        let paths = AppPaths::new(&config.data_root, &config.catalog_root);
        let registry = JsonRegistry::with_path(paths.registry_file());
        tracing::debug!(registry = %registry.path().display(), "installed registry");
        let manager = AppManager::new(
            OsFs,
            TcpPortProbe,
            TokioScriptExecutor,
            registry,
            paths,
            config.script_timeout,
        );

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            config_store,
            config,
            manager,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Progress reporter for lifecycle actions; silent in JSON mode.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        match self.mode {
            OutputMode::Human => TerminalReporter::new(&self.output),
            OutputMode::Json => TerminalReporter::silent(&self.output),
        }
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `APPCTL_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
