//! Application services — use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod app_info;
pub mod catalog;
pub mod env_store;
pub mod environment;
pub mod lifecycle;
pub mod locks;
pub mod manifest_store;
pub mod requirements;
pub mod scripts;
pub mod updates;

pub use lifecycle::AppManager;
