//! Opening directories and queueing the ones discovered while recursing.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use platform::DirectoryHandle;

use crate::error::{EnumerationError, ErrorKind, Result};

/// Opens `path` for listing.
///
/// Returns `Ok(None)` when access is denied and `ignore_inaccessible` is set;
/// the directory then contributes no entries. Every other failure is mapped
/// through [`EnumerationError::from_open`].
pub fn open_directory(path: &Path, ignore_inaccessible: bool) -> Result<Option<DirectoryHandle>> {
    match DirectoryHandle::open(path) {
        Ok(handle) => Ok(Some(handle)),
        Err(source) => {
            let error = EnumerationError::from_open(path.to_path_buf(), source);
            if ignore_inaccessible && error.kind() == ErrorKind::AccessDenied {
                logging::trace_enum!(path = %path.display(), "skipping inaccessible directory");
                Ok(None)
            } else {
                Err(error)
            }
        }
    }
}

/// A subdirectory opened during recursion, waiting for its own pass.
#[derive(Debug)]
pub struct PendingDirectory {
    /// Open handle owned by the queue entry.
    pub handle: DirectoryHandle,
    /// Full path of the directory.
    pub path: PathBuf,
}

/// FIFO of opened subdirectories.
///
/// Each handle lives in exactly one queue slot until it is popped or closed by
/// [`drain_and_close`](Self::drain_and_close).
#[derive(Debug, Default)]
pub struct PendingQueue {
    entries: VecDeque<PendingDirectory>,
}

impl PendingQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a directory.
    ///
    /// If the queue cannot grow, `handle` is closed before the error is
    /// returned.
    pub fn push(&mut self, handle: DirectoryHandle, path: PathBuf) -> Result<()> {
        if self.entries.try_reserve(1).is_err() {
            drop(handle);
            return Err(EnumerationError::ResourceExhaustion {
                what: "pending directory queue",
            });
        }

        logging::trace_handle!(path = %path.display(), depth = self.entries.len(), "queued subdirectory");
        self.entries.push_back(PendingDirectory { handle, path });
        Ok(())
    }

    /// Removes the oldest queued directory.
    pub fn pop(&mut self) -> Option<PendingDirectory> {
        self.entries.pop_front()
    }

    /// Number of queued directories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No directories are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Closes every queued handle and returns how many were closed.
    pub fn drain_and_close(&mut self) -> usize {
        let count = self.entries.len();
        for pending in self.entries.drain(..) {
            if let Err(error) = pending.handle.close() {
                logging::trace_handle!(
                    path = %pending.path.display(),
                    %error,
                    "closing queued directory failed"
                );
            }
        }
        count
    }
}
