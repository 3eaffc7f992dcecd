//! Pure path helpers: absolutising and joining without touching the
//! filesystem beyond reading the working directory.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{EnumerationError, Result};

/// Returns an absolute, lexically normalised form of `path`.
///
/// Relative paths are resolved against the current working directory. `.`
/// components are dropped and `..` removes the preceding component; symbolic
/// links are not resolved.
pub fn full_path(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = env::current_dir().map_err(|source| EnumerationError::io(path, source))?;
        cwd.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// Joins `relative` onto `base`. An empty `relative` returns `base` unchanged.
#[must_use]
pub fn combine(base: &Path, relative: &Path) -> PathBuf {
    if relative.as_os_str().is_empty() {
        base.to_path_buf()
    } else {
        base.join(relative)
    }
}
