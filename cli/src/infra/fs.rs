//! Filesystem infrastructure — implements the `LocalFs` port on `std::fs`.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::LocalFs;

/// Production filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl LocalFs for OsFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("creating directory {}", path.display()))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("removing directory {}", path.display()))
    }

    fn write(&self, path: &Path, content: String, mode: u32) -> Result<()> {
        write_atomic(path, content.as_bytes(), mode)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("reading file {}", path.display()))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path)
            .with_context(|| format!("listing directory {}", path.display()))?;
        entries
            .map(|entry| {
                entry
                    .map(|e| e.path())
                    .with_context(|| format!("listing directory {}", path.display()))
            })
            .collect()
    }
}

/// Write `content` next to `path` and rename it into place, so readers see
/// either the old file or the new one. The temp file gets `mode` before the
/// rename; the new file never exists with wider permissions.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the temp
/// file cannot be written, restricted or renamed.
pub fn write_atomic(path: &Path, content: &[u8], mode: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    let mut temp = options
        .open(&temp_path)
        .with_context(|| format!("creating temp file {}", temp_path.display()))?;
    temp.write_all(content)
        .with_context(|| format!("writing temp file {}", temp_path.display()))?;
    drop(temp);

    // A stale temp file keeps its old mode through `open`.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(mode))
            .with_context(|| format!("setting permissions on {}", temp_path.display()))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("finalizing file {}", path.display()))
}
