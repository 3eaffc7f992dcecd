#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `platform` isolates the operating-system calls the enumerator depends on:
//! opening a directory for listing, reading the next batch of raw listing
//! records, and stating a single entry relative to an open directory. It is
//! the only crate in the workspace that contains `unsafe` code.
//!
//! # Design
//!
//! - On Linux [`DirectoryHandle`] wraps an [`OwnedFd`](std::os::fd::OwnedFd)
//!   and reads records with `getdents64`; entries are stated with `fstatat`
//!   and `AT_SYMLINK_NOFOLLOW`.
//! - Elsewhere [`DirectoryHandle`] is [`portable::ReadDirHandle`], which packs
//!   `read_dir` results into the same record layout.
//! - [`dirent`] defines that layout and validates every record before it is
//!   interpreted.
//!
//! # Invariants
//!
//! - A handle releases its descriptor exactly once, either through
//!   [`DirectoryHandle::close`] or on drop.
//! - [`DirectoryHandle::read_batch`] returning `0` is the only end-of-listing
//!   signal.
//!
//! # Errors
//!
//! All operations return [`std::io::Error`]. [`classify_open_error`] maps open
//! failures onto the categories callers act upon.

pub mod dirent;
mod error;
#[cfg(target_os = "linux")]
mod linux;
pub mod portable;
mod stat;

pub use error::{OpenFailure, classify_open_error};
#[cfg(target_os = "linux")]
pub use linux::DirectoryHandle;
#[cfg(not(target_os = "linux"))]
pub use portable::ReadDirHandle as DirectoryHandle;
pub use stat::{EntryStat, dtype_from_mode};
