//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, filesystem
//! access, port probing, registry persistence, and configuration loading.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod fs;
pub mod network;
pub mod state;

pub use command_runner::TokioScriptExecutor;
pub use config::YamlConfigStore;
pub use fs::OsFs;
pub use network::TcpPortProbe;
pub use state::JsonRegistry;
