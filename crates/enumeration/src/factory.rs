//! Ready-made enumerables for the common result shapes.
//!
//! The `user_*` factories apply case-insensitive Dos matching to the
//! expression whatever the options say, and yield paths in the form the
//! caller supplied the directory. [`enumerate`] honours the options' match
//! type instead.

use std::path::{Path, PathBuf};

use pattern::{MatchType, NamePattern};

use crate::entry::FileSystemEntry;
use crate::enumerable::FileSystemEnumerable;
use crate::error::{EnumerationError, Result};
use crate::options::EnumerationOptions;
use crate::paths;

/// Which kinds of entries a factory yields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchTarget {
    /// Everything except directories.
    Files,
    /// Directories only.
    Directories,
    /// Files and directories.
    #[default]
    Both,
}

impl SearchTarget {
    fn accepts(self, entry: &FileSystemEntry<'_>) -> bool {
        match self {
            Self::Files => !entry.is_directory(),
            Self::Directories => entry.is_directory(),
            Self::Both => true,
        }
    }
}

/// Splits any directory portion of `expression` onto `directory`.
///
/// `"sub/*.txt"` under `/data` becomes `*.txt` under `/data/sub`. An empty
/// remainder, `"."` and `"*.*"` become `"*"`.
///
/// # Errors
///
/// [`EnumerationError::InvalidPattern`] when `expression` is an absolute
/// path.
pub fn normalize_inputs(directory: &Path, expression: &str) -> Result<(PathBuf, String)> {
    if Path::new(expression).has_root() {
        return Err(EnumerationError::InvalidPattern {
            pattern: expression.to_owned(),
            reason: "the search pattern must be relative",
        });
    }

    let (directory, expression) = match expression.rsplit_once('/') {
        Some((prefix, rest)) if !prefix.is_empty() => {
            (paths::combine(directory, Path::new(prefix)), rest)
        }
        _ => (directory.to_path_buf(), expression),
    };

    let expression = match expression {
        "" | "." | "*.*" => "*",
        other => other,
    };
    Ok((directory, expression.to_owned()))
}

/// Files under `directory` whose names match `expression`.
pub fn user_files(
    directory: impl AsRef<Path>,
    expression: &str,
    options: EnumerationOptions,
) -> Result<FileSystemEnumerable<PathBuf>> {
    user_search(directory.as_ref(), expression, SearchTarget::Files, options)
}

/// Directories under `directory` whose names match `expression`.
pub fn user_directories(
    directory: impl AsRef<Path>,
    expression: &str,
    options: EnumerationOptions,
) -> Result<FileSystemEnumerable<PathBuf>> {
    user_search(directory.as_ref(), expression, SearchTarget::Directories, options)
}

/// Files and directories under `directory` whose names match `expression`.
pub fn user_entries(
    directory: impl AsRef<Path>,
    expression: &str,
    options: EnumerationOptions,
) -> Result<FileSystemEnumerable<PathBuf>> {
    user_search(directory.as_ref(), expression, SearchTarget::Both, options)
}

fn user_search(
    directory: &Path,
    expression: &str,
    target: SearchTarget,
    options: EnumerationOptions,
) -> Result<FileSystemEnumerable<PathBuf>> {
    let (directory, expression) = normalize_inputs(directory, expression)?;
    let pattern = NamePattern::new(&expression, MatchType::Dos);

    FileSystemEnumerable::builder(directory)
        .options(options)
        .include(move |entry| target.accepts(entry) && pattern.matches(entry.file_name()))
        .transform(|entry| entry.to_specified_full_path())
        .build()
}

/// Entries of `target` kind matching `expression` under the options' match
/// type and case rule.
pub fn enumerate(
    directory: impl AsRef<Path>,
    expression: &str,
    target: SearchTarget,
    options: EnumerationOptions,
) -> Result<FileSystemEnumerable<PathBuf>> {
    let (directory, expression) = normalize_inputs(directory.as_ref(), expression)?;

    FileSystemEnumerable::builder(directory)
        .options(options)
        .pattern(expression)
        .include(move |entry| target.accepts(entry))
        .transform(|entry| entry.to_specified_full_path())
        .build()
}
