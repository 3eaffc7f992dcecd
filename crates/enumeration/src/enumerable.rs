use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::entry::FileSystemEntry;
use crate::enumerator::{
    DirectoryFinished, EnumeratorHooks, FileSystemEnumerator, FindPredicate, FindTransform,
};
use crate::error::{EnumerationError, Result};
use crate::options::EnumerationOptions;
use crate::pool::BufferPool;

/// Reusable enumeration configuration.
///
/// Every call to [`enumerator`](Self::enumerator) opens the root again and
/// returns an independent [`FileSystemEnumerator`], so one configuration can
/// be iterated any number of times, from any number of threads.
#[derive(Clone, Debug)]
pub struct FileSystemEnumerable<T> {
    directory: PathBuf,
    options: EnumerationOptions,
    expression: Option<String>,
    hooks: EnumeratorHooks<T>,
    pool: Arc<BufferPool>,
}

impl<T> FileSystemEnumerable<T> {
    /// Starts configuring an enumeration of `directory`.
    #[must_use]
    pub fn builder<P: Into<PathBuf>>(directory: P) -> FileSystemEnumerableBuilder<T> {
        FileSystemEnumerableBuilder::new(directory)
    }

    /// Opens the root and returns a fresh enumerator.
    pub fn enumerator(&self) -> Result<FileSystemEnumerator<T>> {
        FileSystemEnumerator::with_pool(
            self.directory.clone(),
            self.options,
            self.expression.as_deref(),
            self.hooks.clone(),
            &self.pool,
        )
    }

    /// Root directory as supplied.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Options applied to every enumerator.
    #[must_use]
    pub const fn options(&self) -> &EnumerationOptions {
        &self.options
    }

    /// Search expression, if any.
    #[must_use]
    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }
}

/// Builder for [`FileSystemEnumerable`].
///
/// A transform and an include predicate are required; [`build`](Self::build)
/// rejects a configuration missing either before touching the filesystem.
pub struct FileSystemEnumerableBuilder<T> {
    directory: PathBuf,
    options: EnumerationOptions,
    expression: Option<String>,
    include: Option<FindPredicate>,
    recurse: Option<FindPredicate>,
    transform: Option<FindTransform<T>>,
    on_directory_finished: Option<DirectoryFinished>,
    pool: Option<Arc<BufferPool>>,
}

impl<T> FileSystemEnumerableBuilder<T> {
    fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
            options: EnumerationOptions::default(),
            expression: None,
            include: None,
            recurse: None,
            transform: None,
            on_directory_finished: None,
            pool: None,
        }
    }

    /// Enumeration options.
    #[must_use]
    pub const fn options(mut self, options: EnumerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Name pattern, interpreted with the options' match type.
    #[must_use]
    pub fn pattern(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Entries are yielded only when `include` returns `true`.
    #[must_use]
    pub fn include<F>(mut self, include: F) -> Self
    where
        F: Fn(&FileSystemEntry<'_>) -> bool + Send + Sync + 'static,
    {
        self.include = Some(Arc::new(include));
        self
    }

    /// Accepts every entry the pattern matches.
    #[must_use]
    pub fn include_all(self) -> Self {
        self.include(|_| true)
    }

    /// Directories are recursed into only when `recurse` returns `true`.
    #[must_use]
    pub fn recurse_when<F>(mut self, recurse: F) -> Self
    where
        F: Fn(&FileSystemEntry<'_>) -> bool + Send + Sync + 'static,
    {
        self.recurse = Some(Arc::new(recurse));
        self
    }

    /// Produces the yielded value from an accepted entry.
    #[must_use]
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&FileSystemEntry<'_>) -> T + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Called after each directory's listing is exhausted.
    #[must_use]
    pub fn on_directory_finished<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Path) + Send + Sync + 'static,
    {
        self.on_directory_finished = Some(Arc::new(hook));
        self
    }

    /// Rents listing buffers from `pool` instead of the shared pool.
    #[must_use]
    pub fn buffer_pool(mut self, pool: Arc<BufferPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// [`EnumerationError::InvalidArgument`] when the directory is empty or
    /// the transform or include predicate is missing.
    pub fn build(self) -> Result<FileSystemEnumerable<T>> {
        if self.directory.as_os_str().is_empty() {
            return Err(EnumerationError::InvalidArgument { name: "directory" });
        }
        let Some(transform) = self.transform else {
            return Err(EnumerationError::InvalidArgument { name: "transform" });
        };
        let Some(include) = self.include else {
            return Err(EnumerationError::InvalidArgument {
                name: "include_predicate",
            });
        };

        let mut hooks = EnumeratorHooks::new(transform).with_include(include);
        if let Some(recurse) = self.recurse {
            hooks = hooks.with_recurse(recurse);
        }
        if let Some(hook) = self.on_directory_finished {
            hooks = hooks.with_directory_finished(hook);
        }

        Ok(FileSystemEnumerable {
            directory: self.directory,
            options: self.options,
            expression: self.expression,
            hooks,
            pool: self.pool.unwrap_or_else(BufferPool::shared),
        })
    }
}
