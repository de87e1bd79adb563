//! Path resolution against the working directory.

use std::path::{Path, PathBuf};

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_from(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Resolve `path` against the process's current working directory.
///
/// # Errors
///
/// Fails only if the working directory cannot be determined.
pub fn resolve(path: impl AsRef<Path>) -> std::io::Result<PathBuf> {
    let path = path.as_ref();
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(resolve_from(&std::env::current_dir()?, path))
}
