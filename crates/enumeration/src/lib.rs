#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `enumeration` lists directory trees lazily. A [`FileSystemEnumerator`]
//! reads raw listing batches into a pooled buffer, wraps each record in a
//! borrowed [`FileSystemEntry`], filters it through the configured pattern and
//! predicates, and yields the caller's transform of the entries that pass.
//! Nothing is collected up front; memory use is one listing buffer plus one
//! open handle per queued subdirectory.
//!
//! # Design
//!
//! - [`BufferPool`] hands out listing buffers shared between enumerators;
//!   [`buffer::DirectoryBuffer`] refills one from an open directory and yields
//!   bounds-checked records.
//! - [`open_directory`] and [`PendingQueue`] own every directory handle. A
//!   handle moves between the current slot and the queue and is closed exactly
//!   once.
//! - [`FileSystemEnumerator`] is the state machine. It opens the root eagerly,
//!   queues subdirectories as they are listed and moves to the next queued
//!   directory when the current one is exhausted.
//! - [`FileSystemEnumerable`] stores a configuration and builds a fresh
//!   enumerator per call to [`FileSystemEnumerable::enumerator`].
//! - [`factory`] provides ready-made file, directory and mixed listings.
//!
//! # Invariants
//!
//! - `.` and `..` are never yielded and never recursed into.
//! - A directory's own entries are produced before any of its queued
//!   subdirectories are read.
//! - Entries whose attributes intersect the skip mask are neither yielded nor
//!   recursed into.
//! - Disposal is idempotent and closes the current and every queued handle.
//!
//! # Errors
//!
//! All fallible operations return [`EnumerationError`]. A root that cannot be
//! opened fails construction. A subdirectory that cannot be opened ends the
//! enumeration unless access was denied and
//! [`EnumerationOptions::with_ignore_inaccessible`] is set, in which case the
//! subtree is skipped.
//!
//! # Examples
//!
//! ```
//! use enumeration::{EnumerationOptions, factory};
//!
//! let dir = tempfile::tempdir()?;
//! std::fs::write(dir.path().join("notes.txt"), b"")?;
//! std::fs::create_dir(dir.path().join("sub"))?;
//! std::fs::write(dir.path().join("sub/more.txt"), b"")?;
//!
//! let options = EnumerationOptions::new().with_recurse(true);
//! let files = factory::user_files(dir.path(), "*.txt", options)?;
//! let mut found = files.enumerator()?.collect::<Result<Vec<_>, _>>()?;
//! found.sort();
//! assert_eq!(found, [dir.path().join("notes.txt"), dir.path().join("sub/more.txt")]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # See also
//!
//! - `pattern` for the wildcard dialects.
//! - `platform` for the listing and stat primitives.

pub mod buffer;
mod entry;
mod enumerable;
mod enumerator;
mod error;
pub mod factory;
mod handle;
mod options;
pub mod paths;
mod pool;

pub use entry::FileSystemEntry;
pub use enumerable::{FileSystemEnumerable, FileSystemEnumerableBuilder};
pub use enumerator::{
    DirectoryFinished, EnumeratorHooks, EnumeratorState, FileSystemEnumerator, FindPredicate,
    FindTransform,
};
pub use error::{EnumerationError, ErrorKind, Result};
pub use factory::SearchTarget;
pub use handle::{PendingDirectory, PendingQueue, open_directory};
pub use options::{EnumerationOptions, FileAttributes, MatchType};
pub use platform::EntryStat;
pub use pool::{BufferPool, PooledBuffer, SHARED_POOL_CAPACITY};
