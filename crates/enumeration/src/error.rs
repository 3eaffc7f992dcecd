use std::io;
use std::path::{Path, PathBuf};

use platform::{OpenFailure, classify_open_error};

/// Result alias used throughout the crate.
pub type Result<T, E = EnumerationError> = std::result::Result<T, E>;

/// Failure reported while configuring or driving an enumeration.
#[derive(Debug, thiserror::Error)]
pub enum EnumerationError {
    /// The directory, or a component of its path, does not exist.
    #[error("could not find a part of the path '{}': {source}", path.display())]
    PathNotFound {
        /// Directory that could not be opened.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },
    /// Listing the directory is not permitted.
    #[error("access to the path '{}' is denied: {source}", path.display())]
    AccessDenied {
        /// Directory that could not be opened.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },
    /// A search expression was rejected before enumeration started.
    #[error("invalid search pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Expression as supplied.
        pattern: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// A required construction argument was missing or empty.
    #[error("required argument '{name}' was not provided")]
    InvalidArgument {
        /// Name of the argument.
        name: &'static str,
    },
    /// The operation is not available on a forward-only enumerator.
    #[error("{operation} is not supported by directory enumerators")]
    Unsupported {
        /// Operation that was attempted.
        operation: &'static str,
    },
    /// A buffer or queue allocation failed.
    #[error("failed to allocate {what}")]
    ResourceExhaustion {
        /// Resource that could not be allocated.
        what: &'static str,
    },
    /// Any other OS failure while opening or reading a directory.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// Directory involved in the failure.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },
}

/// Fieldless discriminant of [`EnumerationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`EnumerationError::PathNotFound`].
    PathNotFound,
    /// See [`EnumerationError::AccessDenied`].
    AccessDenied,
    /// See [`EnumerationError::InvalidPattern`].
    InvalidPattern,
    /// See [`EnumerationError::InvalidArgument`].
    InvalidArgument,
    /// See [`EnumerationError::Unsupported`].
    Unsupported,
    /// See [`EnumerationError::ResourceExhaustion`].
    ResourceExhaustion,
    /// See [`EnumerationError::Io`].
    Io,
}

impl EnumerationError {
    /// Maps a failed open-for-listing call onto the error taxonomy.
    ///
    /// OS "file not found" codes are reported as [`ErrorKind::PathNotFound`].
    pub fn from_open(path: PathBuf, source: io::Error) -> Self {
        match classify_open_error(&source) {
            OpenFailure::AccessDenied => Self::AccessDenied { path, source },
            OpenFailure::NotFound => Self::PathNotFound { path, source },
            OpenFailure::Other(_) => Self::Io { path, source },
        }
    }

    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PathNotFound { .. } => ErrorKind::PathNotFound,
            Self::AccessDenied { .. } => ErrorKind::AccessDenied,
            Self::InvalidPattern { .. } => ErrorKind::InvalidPattern,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::ResourceExhaustion { .. } => ErrorKind::ResourceExhaustion,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Returns the filesystem path associated with the error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::PathNotFound { path, .. }
            | Self::AccessDenied { path, .. }
            | Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Returns the raw OS error code carried by I/O-backed variants.
    #[must_use]
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::PathNotFound { source, .. }
            | Self::AccessDenied { source, .. }
            | Self::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_failures_map_to_taxonomy() {
        let denied = EnumerationError::from_open(
            PathBuf::from("/locked"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert_eq!(denied.kind(), ErrorKind::AccessDenied);
        assert_eq!(denied.path(), Some(Path::new("/locked")));

        let missing = EnumerationError::from_open(
            PathBuf::from("/missing"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert_eq!(missing.kind(), ErrorKind::PathNotFound);

        let other = EnumerationError::from_open(PathBuf::from("/x"), io::Error::other("boom"));
        assert_eq!(other.kind(), ErrorKind::Io);
    }

    #[cfg(unix)]
    #[test]
    fn raw_os_error_is_preserved() {
        let err = EnumerationError::from_open(
            PathBuf::from("/busy"),
            io::Error::from_raw_os_error(24),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.raw_os_error(), Some(24));
    }

    #[test]
    fn non_io_variants_have_no_path() {
        let err = EnumerationError::Unsupported { operation: "reset" };
        assert_eq!(err.path(), None);
        assert_eq!(err.raw_os_error(), None);
        assert_eq!(
            err.to_string(),
            "reset is not supported by directory enumerators"
        );
    }

    #[test]
    fn display_names_the_path() {
        let err = EnumerationError::from_open(
            PathBuf::from("/missing/dir"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(err.to_string().contains("/missing/dir"));
    }
}
