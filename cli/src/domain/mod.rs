//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod app;
pub mod config;
pub mod env;
pub mod error;
pub mod requirements;
pub mod secret;

pub use app::{AppPaths, Verb, is_valid_app_id, validate_app_id};
pub use config::{AppctlConfig, ManagerConfig, validate_config_key, validate_config_value};
pub use env::{EnvMap, missing_required, plan_environment};
pub use error::{AppError, ConfigError};
pub use requirements::RequirementReport;
