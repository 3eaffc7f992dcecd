//! Classification of directory open failures.

use std::io;

/// Broad category of a failed open-for-listing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFailure {
    /// The caller lacks permission to list the directory.
    AccessDenied,
    /// The path, or one of its components, does not exist or is not a
    /// directory.
    NotFound,
    /// Any other OS failure, carrying the raw error code (`0` when none).
    Other(i32),
}

/// Classifies an error returned by [`DirectoryHandle::open`](crate::DirectoryHandle::open).
///
/// File-level and directory-level "not found" codes collapse into
/// [`OpenFailure::NotFound`].
#[cfg(unix)]
pub fn classify_open_error(error: &io::Error) -> OpenFailure {
    use nix::errno::Errno;

    match error.raw_os_error() {
        Some(code) => match Errno::from_raw(code) {
            Errno::EACCES | Errno::EPERM => OpenFailure::AccessDenied,
            Errno::ENOENT | Errno::ENOTDIR => OpenFailure::NotFound,
            _ => OpenFailure::Other(code),
        },
        None => classify_kind(error),
    }
}

/// Classifies an error returned by [`DirectoryHandle::open`](crate::DirectoryHandle::open).
#[cfg(not(unix))]
pub fn classify_open_error(error: &io::Error) -> OpenFailure {
    classify_kind(error)
}

fn classify_kind(error: &io::Error) -> OpenFailure {
    match error.kind() {
        io::ErrorKind::PermissionDenied => OpenFailure::AccessDenied,
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => OpenFailure::NotFound,
        _ => OpenFailure::Other(error.raw_os_error().unwrap_or(0)),
    }
}
