#![deny(unsafe_code)]
#![deny(missing_docs)]

//! Scratch directory trees for enumeration tests.
//!
//! ```
//! use test_support::FileTree;
//!
//! let tree = FileTree::new().file("a.txt", "alpha").dir("sub").file("sub/b.txt", "");
//! assert!(tree.path().join("sub/b.txt").is_file());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory populated through chained builder calls.
///
/// Every helper panics on I/O failure; it is meant for tests only.
#[derive(Debug)]
pub struct FileTree {
    root: TempDir,
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTree {
    /// Creates an empty tree in a fresh temporary directory.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temporary directory"),
        }
    }

    /// Root of the tree.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of `relative` inside the tree.
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Writes a file, creating parent directories as needed.
    pub fn file(self, relative: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Self {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directories");
        }
        fs::write(&path, contents).expect("write file");
        self
    }

    /// Creates a directory and any missing parents.
    pub fn dir(self, relative: impl AsRef<Path>) -> Self {
        fs::create_dir_all(self.join(relative)).expect("create directory");
        self
    }

    /// Creates a symbolic link at `relative` pointing to `target`.
    #[cfg(unix)]
    pub fn symlink(self, target: impl AsRef<Path>, relative: impl AsRef<Path>) -> Self {
        std::os::unix::fs::symlink(target, self.join(relative)).expect("create symlink");
        self
    }

    /// Removes all permissions from `relative` until the guard is dropped.
    #[cfg(unix)]
    pub fn lock(&self, relative: impl AsRef<Path>) -> PermissionGuard {
        PermissionGuard::lock(self.join(relative))
    }
}

/// Restores a directory's permissions on drop so the tree can be removed.
#[cfg(unix)]
#[derive(Debug)]
pub struct PermissionGuard {
    path: PathBuf,
    original: fs::Permissions,
}

#[cfg(unix)]
impl PermissionGuard {
    fn lock(path: PathBuf) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let original = fs::metadata(&path).expect("stat locked path").permissions();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).expect("chmod 000");
        Self { path, original }
    }
}

#[cfg(unix)]
impl Drop for PermissionGuard {
    fn drop(&mut self) {
        let _ = fs::set_permissions(&self.path, self.original.clone());
    }
}

/// Reports whether the process bypasses permission checks.
///
/// Tests that rely on unreadable directories skip themselves when this
/// returns `true`.
#[cfg(unix)]
pub fn running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Reports whether the process bypasses permission checks.
#[cfg(not(unix))]
pub fn running_as_root() -> bool {
    false
}
