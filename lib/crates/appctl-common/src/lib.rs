pub mod manifest;
pub mod types;

pub use manifest::{AppManifest, FormField, ManifestError};
pub use types::*;
