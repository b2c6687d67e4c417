//! Human-readable terminal renderer.

use std::path::Path;

use appctl_common::{AppManifest, InstalledApp, ResolvedManifest, UpdateInfo};
use owo_colors::OwoColorize as _;

use crate::domain::config::{AppctlConfig, ManagerConfig};
use crate::domain::{EnvMap, RequirementReport};
use crate::output::OutputContext;

/// Shown in place of a generated secret.
pub const MASK: &str = "********";

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("appctl {version}");
    }

    /// Render the catalog, marking apps that are already installed.
    pub fn render_catalog(&self, apps: &[AppManifest], installed: &[InstalledApp]) {
        if apps.is_empty() {
            if !self.ctx.quiet {
                println!("No apps in the catalog.");
            }
            return;
        }

        println!("Available apps:\n");
        for app in apps {
            let id = format!("{:<20}", app.id);
            let version = app.version.as_deref().unwrap_or("");
            let desc = app.short_desc.as_deref().unwrap_or(&app.name);
            let marker = if installed.iter().any(|i| i.id == app.id) {
                "  [installed]"
            } else {
                ""
            };
            println!(
                "  {} {version:<10} {desc}{marker}",
                id.style(self.ctx.styles.id)
            );
        }
        println!("\nInstall an app: appctl install <id> -f KEY=VALUE");
    }

    /// Render installed apps.
    pub fn render_installed(&self, apps: &[InstalledApp]) {
        if apps.is_empty() {
            if !self.ctx.quiet {
                println!("No apps installed. Browse the catalog: appctl list");
            }
            return;
        }

        println!("Installed apps:\n");
        for app in apps {
            let id = format!("{:<20}", app.id);
            println!(
                "  {} v{:<6} installed {}",
                id.style(self.ctx.styles.id),
                app.current_version(),
                app.installed_at.format("%Y-%m-%d %H:%M UTC")
            );
        }
    }

    /// Render one resolved manifest.
    pub fn render_app_info(&self, resolved: &ResolvedManifest, installed: Option<&InstalledApp>) {
        let app = &resolved.manifest;
        println!();
        self.ctx.header(&app.name);
        println!();
        self.ctx.kv("Id:          ", &app.id);
        if let Some(version) = &app.version {
            self.ctx.kv("Version:     ", version);
        }
        self.ctx.kv("Revision:    ", &app.available_version.to_string());
        self.ctx.kv("Source:      ", &resolved.source.to_string());
        if let Some(author) = &app.author {
            self.ctx.kv("Author:      ", author);
        }
        if !app.required_ports.is_empty() {
            self.ctx.kv("Ports:       ", &format_ports(&app.required_ports));
        }
        match installed {
            Some(record) => self.ctx.kv(
                "Installed:   ",
                &format!("revision {}", record.current_version()),
            ),
            None => self.ctx.kv("Installed:   ", "no"),
        }
        if let Some(desc) = app.description.as_deref().or(app.short_desc.as_deref()) {
            println!();
            println!("  {desc}");
        }
        if !app.form_fields.is_empty() {
            println!();
            println!("  {}", "Fields:".style(self.ctx.styles.bold));
            for field in &app.form_fields {
                let mut flags = Vec::new();
                if field.required {
                    flags.push("required");
                }
                if field.random_generate {
                    flags.push("generated");
                }
                let label = field.label.as_deref().unwrap_or("");
                println!("    {:<24} {label} {}", field.key, flags.join(", ").style(self.ctx.styles.dim));
            }
        }
        println!();
    }

    /// Render a port requirement report.
    pub fn render_requirements(&self, report: &RequirementReport) {
        if report.required_ports.is_empty() {
            self.ctx
                .success(&format!("'{}' declares no required ports", report.app_id));
            return;
        }
        for port in &report.required_ports {
            if report.busy_ports.contains(port) {
                self.print_check(false, &format!("port {port} is in use"));
            } else {
                self.print_check(true, &format!("port {port} is free"));
            }
        }
        if !report.is_satisfied() {
            self.ctx.error(&format!(
                "'{}' needs ports {} to be free",
                report.app_id,
                format_ports(&report.busy_ports)
            ));
        }
    }

    /// Render an app's persisted environment.
    pub fn render_env(&self, app_id: &str, env: &EnvMap, masked: &[String]) {
        if env.is_empty() {
            if !self.ctx.quiet {
                println!("No environment written for '{app_id}'.");
            }
            return;
        }
        for (key, value) in env.iter() {
            let shown = if masked.iter().any(|m| m == key) {
                MASK
            } else {
                value
            };
            println!("{key}={shown}");
        }
    }

    /// Render update availability.
    pub fn render_update_info(&self, app_id: &str, info: Option<&UpdateInfo>) {
        match info {
            None => self.ctx.info(&format!("'{app_id}' is not installed")),
            Some(info) if info.update_available() => self.ctx.warn(&format!(
                "'{app_id}' can be updated from revision {} to {}. Run: appctl update {app_id}",
                info.current, info.latest
            )),
            Some(info) => self
                .ctx
                .success(&format!("'{app_id}' is up to date (revision {})", info.current)),
        }
    }

    /// Render the stored and effective configuration.
    pub fn render_config(&self, config: &AppctlConfig, resolved: &ManagerConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!(
            "  {:<22} {}",
            "data_root:",
            display_setting(config.data_root.as_deref(), &resolved.data_root)
        );
        println!(
            "  {:<22} {}",
            "catalog_root:",
            display_setting(config.catalog_root.as_deref(), &resolved.catalog_root)
        );
        println!(
            "  {:<22} {}{}",
            "script_timeout_secs:",
            resolved.script_timeout.as_secs(),
            if config.script_timeout_secs.is_some() {
                ""
            } else {
                " (not in config file)"
            }
        );
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["APPCTL_CONFIG", "APPCTL_DATA_ROOT", "APPCTL_CATALOG_ROOT", "NO_COLOR"] {
            println!(
                "    {:<22} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }

    fn print_check(&self, ok: bool, msg: &str) {
        if ok {
            println!("    {} {msg}", "\u{2713}".style(self.ctx.styles.success));
        } else {
            println!("    {} {msg}", "\u{2717}".style(self.ctx.styles.error));
        }
    }
}

// ── Display helpers ──────────────────────────────────────────────────────────

#[must_use]
pub fn format_ports(ports: &[u16]) -> String {
    ports
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_setting(stored: Option<&Path>, effective: &Path) -> String {
    match stored {
        Some(_) => effective.display().to_string(),
        None => format!("{} (not in config file)", effective.display()),
    }
}
