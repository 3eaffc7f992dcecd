use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pattern::{MatchType, NamePattern};
use platform::DirectoryHandle;

use crate::buffer::DirectoryBuffer;
use crate::entry::FileSystemEntry;
use crate::error::{EnumerationError, Result};
use crate::handle::{PendingDirectory, PendingQueue, open_directory};
use crate::options::{EnumerationOptions, FileAttributes};
use crate::paths;
use crate::pool::BufferPool;

/// Decides whether an entry is yielded, or whether a directory is recursed
/// into.
pub type FindPredicate = Arc<dyn Fn(&FileSystemEntry<'_>) -> bool + Send + Sync>;

/// Produces the value yielded for an accepted entry.
pub type FindTransform<T> = Arc<dyn Fn(&FileSystemEntry<'_>) -> T + Send + Sync>;

/// Called with the full path of every directory whose listing is exhausted.
pub type DirectoryFinished = Arc<dyn Fn(&Path) + Send + Sync>;

/// The pluggable parts of an enumeration.
///
/// `include` and `recurse` default to accepting everything when absent.
pub struct EnumeratorHooks<T> {
    include: Option<FindPredicate>,
    recurse: Option<FindPredicate>,
    transform: FindTransform<T>,
    on_directory_finished: Option<DirectoryFinished>,
}

impl<T> EnumeratorHooks<T> {
    /// Hooks that yield `transform(entry)` for every entry.
    #[must_use]
    pub fn new(transform: FindTransform<T>) -> Self {
        Self {
            include: None,
            recurse: None,
            transform,
            on_directory_finished: None,
        }
    }

    /// Sets the inclusion predicate.
    #[must_use]
    pub fn with_include(mut self, include: FindPredicate) -> Self {
        self.include = Some(include);
        self
    }

    /// Sets the recursion predicate, consulted only for directories.
    #[must_use]
    pub fn with_recurse(mut self, recurse: FindPredicate) -> Self {
        self.recurse = Some(recurse);
        self
    }

    /// Sets the directory-finished callback.
    #[must_use]
    pub fn with_directory_finished(mut self, hook: DirectoryFinished) -> Self {
        self.on_directory_finished = Some(hook);
        self
    }
}

impl<T> Clone for EnumeratorHooks<T> {
    fn clone(&self) -> Self {
        Self {
            include: self.include.clone(),
            recurse: self.recurse.clone(),
            transform: Arc::clone(&self.transform),
            on_directory_finished: self.on_directory_finished.clone(),
        }
    }
}

impl<T> fmt::Debug for EnumeratorHooks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumeratorHooks")
            .field("include", &self.include.is_some())
            .field("recurse", &self.recurse.is_some())
            .field("on_directory_finished", &self.on_directory_finished.is_some())
            .finish_non_exhaustive()
    }
}

/// Lifecycle of a [`FileSystemEnumerator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnumeratorState {
    /// Constructed, never advanced.
    Created,
    /// Reading records from the current directory.
    Enumerating,
    /// The current directory's listing is exhausted.
    DirectoryExhausted,
    /// Every directory has been listed, or an error ended the enumeration.
    Finished,
    /// [`FileSystemEnumerator::dispose`] released all resources.
    Disposed,
}

/// Forward-only enumerator over one directory tree.
///
/// The root is opened during construction, so a missing or unreadable root is
/// reported before the first [`advance`](Self::advance). Subdirectories are
/// opened as soon as they are listed and queued; a directory's own entries are
/// yielded before any queued child is read.
///
/// Every open handle is owned by exactly one of the current slot and the
/// pending queue, and the listing buffer is returned to its pool when the
/// enumeration finishes or is disposed.
pub struct FileSystemEnumerator<T> {
    original_root: PathBuf,
    root: PathBuf,
    options: EnumerationOptions,
    pattern: Option<NamePattern>,
    hooks: EnumeratorHooks<T>,
    buffer: Option<DirectoryBuffer>,
    current: Option<DirectoryHandle>,
    current_path: PathBuf,
    pending: PendingQueue,
    value: Option<T>,
    state: EnumeratorState,
}

impl<T> FileSystemEnumerator<T> {
    /// Opens `directory` and prepares an enumeration using the shared buffer
    /// pool.
    ///
    /// `expression` is compiled for the options' [`MatchType`]; `None` accepts
    /// every name.
    pub fn new(
        directory: impl Into<PathBuf>,
        options: EnumerationOptions,
        expression: Option<&str>,
        hooks: EnumeratorHooks<T>,
    ) -> Result<Self> {
        Self::with_pool(directory, options, expression, hooks, &BufferPool::shared())
    }

    /// Like [`new`](Self::new), renting the listing buffer from `pool`.
    pub fn with_pool(
        directory: impl Into<PathBuf>,
        options: EnumerationOptions,
        expression: Option<&str>,
        hooks: EnumeratorHooks<T>,
        pool: &Arc<BufferPool>,
    ) -> Result<Self> {
        let original_root = directory.into();
        if original_root.as_os_str().is_empty() {
            return Err(EnumerationError::InvalidArgument { name: "directory" });
        }

        let root = paths::full_path(&original_root)?;
        let pattern = expression.map(|expression| compile(expression, &options));

        let current = open_directory(&root, options.ignore_inaccessible())?;
        let (buffer, state) = if current.is_some() {
            let buffer = DirectoryBuffer::rent(pool, options.buffer_size_hint())?;
            (Some(buffer), EnumeratorState::Created)
        } else {
            (None, EnumeratorState::Finished)
        };

        logging::trace_enum!(
            root = %root.display(),
            recurse = options.recurse(),
            match_type = ?options.match_type(),
            "opened enumeration root"
        );

        Ok(Self {
            original_root,
            current_path: root.clone(),
            root,
            options,
            pattern,
            hooks,
            buffer,
            current,
            pending: PendingQueue::new(),
            value: None,
            state,
        })
    }

    /// Moves to the next accepted entry.
    ///
    /// Returns `Ok(false)` once the enumeration is finished or disposed. An
    /// error ends the enumeration and releases every handle it held.
    pub fn advance(&mut self) -> Result<bool> {
        match self.state {
            EnumeratorState::Finished | EnumeratorState::Disposed => return Ok(false),
            EnumeratorState::Created => self.state = EnumeratorState::Enumerating,
            EnumeratorState::Enumerating | EnumeratorState::DirectoryExhausted => {}
        }

        self.value = None;
        match self.step() {
            Ok(found) => Ok(found),
            Err(error) => {
                logging::trace_enum!(%error, "enumeration failed");
                self.release();
                self.state = EnumeratorState::Finished;
                Err(error)
            }
        }
    }

    /// The value produced by the last successful [`advance`](Self::advance).
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Always fails: enumerators are single pass.
    pub fn reset(&mut self) -> Result<()> {
        Err(EnumerationError::Unsupported { operation: "reset" })
    }

    /// Closes every held handle and returns the buffer. Safe to call more than
    /// once.
    pub fn dispose(&mut self) {
        if self.state == EnumeratorState::Disposed {
            return;
        }
        let closed = self.release();
        self.value = None;
        self.state = EnumeratorState::Disposed;
        logging::trace_handle!(root = %self.root.display(), closed, "disposed enumerator");
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EnumeratorState {
        self.state
    }

    /// Options the enumerator was built with.
    #[must_use]
    pub const fn options(&self) -> &EnumerationOptions {
        &self.options
    }

    /// Absolute root being enumerated.
    #[must_use]
    pub fn root_directory(&self) -> &Path {
        &self.root
    }

    fn step(&mut self) -> Result<bool> {
        loop {
            if self.state == EnumeratorState::DirectoryExhausted {
                if !self.next_directory() {
                    return Ok(false);
                }
                continue;
            }

            let (Some(handle), Some(buffer)) = (self.current.as_mut(), self.buffer.as_mut())
            else {
                self.release();
                self.state = EnumeratorState::Finished;
                return Ok(false);
            };

            if !buffer.has_pending() && !buffer.refill(handle, &self.current_path)? {
                self.state = EnumeratorState::DirectoryExhausted;
                continue;
            }
            let Some(record) = buffer.next_record(&self.current_path)? else {
                continue;
            };

            let entry = FileSystemEntry::new(
                record,
                &self.current_path,
                &self.root,
                &self.original_root,
                handle,
            );

            if is_skipped(&entry, self.options.attributes_to_skip()) {
                continue;
            }

            let dot = entry.is_dot_or_dotdot();
            // Directory links are reported but never descended into.
            if self.options.recurse()
                && !dot
                && !entry.is_symlink()
                && entry.is_directory()
                && self.hooks.recurse.as_ref().is_none_or(|recurse| recurse(&entry))
            {
                let path = entry.to_full_path();
                if let Some(child) = open_directory(&path, self.options.ignore_inaccessible())? {
                    self.pending.push(child, path)?;
                }
            }

            if dot
                || !self
                    .pattern
                    .as_ref()
                    .is_none_or(|pattern| pattern.matches(entry.file_name()))
                || !self.hooks.include.as_ref().is_none_or(|include| include(&entry))
            {
                continue;
            }

            self.value = Some((self.hooks.transform)(&entry));
            return Ok(true);
        }
    }

    /// Closes the exhausted directory and makes the next queued one current.
    /// Returns `false` when nothing is left.
    fn next_directory(&mut self) -> bool {
        if let Some(handle) = self.current.take() {
            close_handle(handle, &self.current_path);
        }
        logging::trace_enum!(path = %self.current_path.display(), "finished directory");
        if let Some(hook) = &self.hooks.on_directory_finished {
            hook(self.current_path.as_path());
        }

        match self.pending.pop() {
            Some(PendingDirectory { handle, path }) => {
                self.current = Some(handle);
                self.current_path = path;
                if let Some(buffer) = self.buffer.as_mut() {
                    buffer.reset();
                }
                self.state = EnumeratorState::Enumerating;
                true
            }
            None => {
                self.release();
                self.state = EnumeratorState::Finished;
                false
            }
        }
    }

    /// Closes the current and queued handles and returns the buffer.
    fn release(&mut self) -> usize {
        let mut closed = 0;
        if let Some(handle) = self.current.take() {
            close_handle(handle, &self.current_path);
            closed += 1;
        }
        closed += self.pending.drain_and_close();
        self.buffer = None;
        closed
    }
}

impl<T> Iterator for FileSystemEnumerator<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(true) => self.value.take().map(Ok),
            Ok(false) => None,
            Err(error) => Some(Err(error)),
        }
    }
}

impl<T> Drop for FileSystemEnumerator<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T> fmt::Debug for FileSystemEnumerator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSystemEnumerator")
            .field("root", &self.root)
            .field("current_path", &self.current_path)
            .field("pending", &self.pending.len())
            .field("state", &self.state)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Dos matching always ignores case; Simple follows the options.
fn compile(expression: &str, options: &EnumerationOptions) -> NamePattern {
    let pattern = NamePattern::new(expression, options.match_type());
    match options.match_type() {
        MatchType::Simple => pattern.case_sensitive(options.case_sensitive()),
        MatchType::Dos => pattern,
    }
}

/// `READ_ONLY` needs a stat, so the full attribute set is only computed when
/// the mask asks about it.
fn is_skipped(entry: &FileSystemEntry<'_>, mask: FileAttributes) -> bool {
    if mask.is_empty() {
        return false;
    }
    let attributes = if mask.intersects(FileAttributes::READ_ONLY | FileAttributes::NORMAL) {
        entry.attributes()
    } else {
        entry.basic_attributes()
    };
    attributes.intersects(mask)
}

fn close_handle(handle: DirectoryHandle, path: &Path) {
    if let Err(error) = handle.close() {
        logging::trace_handle!(path = %path.display(), %error, "closing directory failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::Mutex;
    use test_support::FileTree;

    fn names() -> EnumeratorHooks<String> {
        EnumeratorHooks::new(Arc::new(|entry: &FileSystemEntry<'_>| {
            entry.relative_path().to_string_lossy().into_owned()
        }))
    }

    fn collect(enumerator: FileSystemEnumerator<String>) -> Vec<String> {
        let mut out: Vec<String> = enumerator.map(|item| item.expect("entry")).collect();
        out.sort();
        out
    }

    #[test]
    fn lists_immediate_children_without_dots() {
        let tree = FileTree::new().file("a.txt", "").dir("sub").file("sub/b.txt", "");
        let enumerator =
            FileSystemEnumerator::new(tree.path(), EnumerationOptions::new(), None, names())
                .expect("open");
        assert_eq!(collect(enumerator), ["a.txt", "sub"]);
    }

    #[test]
    fn recursion_queues_subdirectories() {
        let tree = FileTree::new().file("a.txt", "").file("sub/b.txt", "").file("sub/deep/c.txt", "");
        let options = EnumerationOptions::new().with_recurse(true);
        let enumerator =
            FileSystemEnumerator::new(tree.path(), options, None, names()).expect("open");
        assert_eq!(
            collect(enumerator),
            ["a.txt", "sub", "sub/b.txt", "sub/deep", "sub/deep/c.txt"]
        );
    }

    #[test]
    fn recurse_predicate_limits_descent() {
        let tree = FileTree::new().file("keep/a", "").file("skip/b", "");
        let hooks = names().with_recurse(Arc::new(|entry: &FileSystemEntry<'_>| {
            entry.file_name() != "skip"
        }));
        let options = EnumerationOptions::new().with_recurse(true);
        let enumerator = FileSystemEnumerator::new(tree.path(), options, None, hooks).expect("open");
        assert_eq!(collect(enumerator), ["keep", "keep/a", "skip"]);
    }

    #[test]
    fn pattern_filters_but_does_not_stop_recursion() {
        let tree = FileTree::new().file("a.txt", "").file("sub/b.txt", "").file("sub/c.md", "");
        let options = EnumerationOptions::new().with_recurse(true);
        let enumerator =
            FileSystemEnumerator::new(tree.path(), options, Some("*.txt"), names()).expect("open");
        assert_eq!(collect(enumerator), ["a.txt", "sub/b.txt"]);
    }

    #[test]
    fn simple_matching_can_be_case_sensitive() {
        let tree = FileTree::new().file("A.TXT", "").file("b.txt", "");
        let options = EnumerationOptions::new().with_case_sensitive(true);
        let enumerator =
            FileSystemEnumerator::new(tree.path(), options, Some("*.txt"), names()).expect("open");
        assert_eq!(collect(enumerator), ["b.txt"]);
    }

    #[test]
    fn skipped_directories_are_not_recursed() {
        let tree = FileTree::new().file(".hidden/inner", "").file("shown/inner", "");
        let options = EnumerationOptions::new()
            .with_recurse(true)
            .with_attributes_to_skip(FileAttributes::HIDDEN);
        let enumerator =
            FileSystemEnumerator::new(tree.path(), options, None, names()).expect("open");
        assert_eq!(collect(enumerator), ["shown", "shown/inner"]);
    }

    #[test]
    fn directory_finished_hook_sees_every_directory() {
        let tree = FileTree::new().file("a/x", "").file("b/y", "");
        let finished = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&finished);
        let hooks = names().with_directory_finished(Arc::new(move |path: &Path| {
            sink.lock().expect("lock").push(path.to_path_buf());
        }));
        let options = EnumerationOptions::new().with_recurse(true);
        let enumerator = FileSystemEnumerator::new(tree.path(), options, None, hooks).expect("open");
        assert_eq!(enumerator.count(), 4);

        let mut finished = finished.lock().expect("lock").clone();
        finished.sort();
        let root = paths::full_path(tree.path()).expect("root");
        assert_eq!(finished, [root.clone(), root.join("a"), root.join("b")]);
    }

    #[test]
    fn state_machine_transitions() {
        let tree = FileTree::new().file("only", "");
        let mut enumerator =
            FileSystemEnumerator::new(tree.path(), EnumerationOptions::new(), None, names())
                .expect("open");
        assert_eq!(enumerator.state(), EnumeratorState::Created);
        assert!(enumerator.current().is_none());

        assert!(enumerator.advance().expect("advance"));
        assert_eq!(enumerator.state(), EnumeratorState::Enumerating);
        assert_eq!(enumerator.current().map(String::as_str), Some("only"));

        assert!(!enumerator.advance().expect("advance"));
        assert_eq!(enumerator.state(), EnumeratorState::Finished);
        assert!(!enumerator.advance().expect("still finished"));
    }

    #[test]
    fn reset_is_unsupported() {
        let tree = FileTree::new();
        let mut enumerator =
            FileSystemEnumerator::new(tree.path(), EnumerationOptions::new(), None, names())
                .expect("open");
        let err = enumerator.reset().expect_err("reset");
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn dispose_is_idempotent_and_returns_buffer() {
        let tree = FileTree::new().file("a/x", "").file("b/y", "");
        let pool = Arc::new(BufferPool::new(2));
        let options = EnumerationOptions::new().with_recurse(true);
        let mut enumerator =
            FileSystemEnumerator::with_pool(tree.path(), options, None, names(), &pool)
                .expect("open");
        assert!(enumerator.advance().expect("advance"));
        assert_eq!(pool.available(), 0);

        enumerator.dispose();
        assert_eq!(enumerator.state(), EnumeratorState::Disposed);
        assert_eq!(pool.available(), 1);
        enumerator.dispose();
        assert_eq!(pool.available(), 1);
        assert!(!enumerator.advance().expect("disposed"));
    }

    #[test]
    fn empty_directory_argument_is_rejected() {
        let err = FileSystemEnumerator::new("", EnumerationOptions::new(), None, names())
            .expect_err("empty");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn missing_root_fails_construction() {
        let tree = FileTree::new();
        let err = FileSystemEnumerator::new(
            tree.join("missing"),
            EnumerationOptions::new().with_ignore_inaccessible(true),
            None,
            names(),
        )
        .expect_err("missing root");
        assert_eq!(err.kind(), ErrorKind::PathNotFound);
    }

    #[test]
    fn small_buffer_hint_still_lists_everything() {
        let mut tree = FileTree::new();
        for i in 0..64 {
            tree = tree.file(format!("file-with-a-fairly-long-name-{i:02}"), "");
        }
        let options = EnumerationOptions::new().with_buffer_size_hint(1);
        let enumerator =
            FileSystemEnumerator::new(tree.path(), options, None, names()).expect("open");
        assert_eq!(collect(enumerator).len(), 64);
    }
}
