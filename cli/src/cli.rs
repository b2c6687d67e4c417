//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;
use crate::domain::config::AppctlConfig;

/// Install, configure and run self-hosted apps from a catalog
#[derive(Parser)]
#[command(
    name = "appctl",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip interactive prompts
    #[arg(long = "assume-yes", global = true)]
    pub assume_yes: bool,

    /// Directory holding per-app data and the installed registry
    #[arg(long, global = true, value_name = "DIR")]
    pub data_root: Option<PathBuf>,

    /// Directory holding the app catalog (`apps/<id>/`)
    #[arg(long, global = true, value_name = "DIR")]
    pub catalog_root: Option<PathBuf>,

    /// Kill lifecycle scripts running longer than this
    #[arg(
        long,
        global = true,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub script_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List catalog apps (or installed apps with --installed)
    List(commands::query::ListArgs),

    /// Show an app's manifest
    Info {
        /// App id
        app_id: String,
    },

    /// Check that an app's required ports are free
    Check {
        /// App id
        app_id: String,
    },

    /// Show an app's persisted environment
    Env(commands::query::EnvArgs),

    /// Install an app from the catalog
    Install(commands::lifecycle::FieldArgs),

    /// Start an installed app
    Start {
        /// App id
        app_id: String,
    },

    /// Stop an installed app
    Stop {
        /// App id
        app_id: String,
    },

    /// Stop then start an installed app
    Restart {
        /// App id
        app_id: String,
    },

    /// Rewrite an installed app's environment, keeping generated secrets
    Reconfigure(commands::lifecycle::FieldArgs),

    /// Update an installed app to the catalog revision
    Update {
        /// App id
        app_id: String,
    },

    /// Show whether an update is available
    UpdateStatus {
        /// App id
        app_id: String,
    },

    /// Uninstall an app and delete its data
    Uninstall(commands::lifecycle::UninstallArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,

    #[command(hide = true, name = "_run-script")]
    RunScript {
        /// `<verb> <app-id> [extra...]`
        #[arg(required = true, num_args = 2.., trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

impl Cli {
    /// Settings given as flags, the top layer of configuration.
    #[must_use]
    pub fn overrides(&self) -> AppctlConfig {
        AppctlConfig {
            data_root: self.data_root.clone(),
            catalog_root: self.catalog_root.clone(),
            script_timeout_secs: self.script_timeout,
        }
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be built or the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let flags = AppFlags {
            output: OutputFlags {
                no_color: self.no_color,
                quiet: self.quiet,
                json: self.json,
            },
            overrides: self.overrides(),
            yes: self.assume_yes,
        };
        let app = AppContext::new(flags)?;

        match self.command {
            Command::List(args) => commands::query::list(&app, &args).await,
            Command::Info { app_id } => commands::query::info(&app, &app_id).await,
            Command::Check { app_id } => commands::query::check(&app, &app_id).await,
            Command::Env(args) => commands::query::env(&app, &args),
            Command::Install(args) => commands::lifecycle::install(&app, &args).await,
            Command::Start { app_id } => commands::lifecycle::start(&app, &app_id).await,
            Command::Stop { app_id } => commands::lifecycle::stop(&app, &app_id).await,
            Command::Restart { app_id } => commands::lifecycle::restart(&app, &app_id).await,
            Command::Reconfigure(args) => commands::lifecycle::reconfigure(&app, &args).await,
            Command::Update { app_id } => commands::lifecycle::update(&app, &app_id).await,
            Command::UpdateStatus { app_id } => {
                commands::query::update_status(&app, &app_id).await
            }
            Command::Uninstall(args) => commands::lifecycle::uninstall(&app, &args).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => commands::version::run(&app),
            Command::RunScript { args } => commands::internal::run_script(&app, &args).await,
        }
    }
}
