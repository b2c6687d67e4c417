//! Command implementations

pub mod config;
pub mod internal;
pub mod lifecycle;
pub mod query;
pub mod version;
