//! Listing buffer: refills from an open directory and hands out one validated
//! record at a time.

use std::io;
use std::path::Path;
use std::sync::Arc;

use platform::DirectoryHandle;
use platform::dirent::RawRecord;

use crate::error::{EnumerationError, Result};
use crate::pool::{BufferPool, PooledBuffer};

/// Buffer size used when no hint is given.
pub const STANDARD_BUFFER_SIZE: usize = 4096;

/// Smallest buffer accepted for an explicit hint; large enough for one record
/// with a maximum-length name.
pub const MINIMUM_BUFFER_SIZE: usize = 1024;

/// Largest size a buffer is grown to when a record does not fit.
pub const MAXIMUM_BUFFER_SIZE: usize = 64 * 1024;

/// Buffer size selected for a caller's hint.
///
/// ```
/// use enumeration::buffer::effective_buffer_size;
///
/// assert_eq!(effective_buffer_size(0), 4096);
/// assert_eq!(effective_buffer_size(100), 1024);
/// assert_eq!(effective_buffer_size(65536), 65536);
/// ```
#[must_use]
pub const fn effective_buffer_size(hint: usize) -> usize {
    if hint == 0 {
        STANDARD_BUFFER_SIZE
    } else if hint < MINIMUM_BUFFER_SIZE {
        MINIMUM_BUFFER_SIZE
    } else {
        hint
    }
}

/// One rented buffer plus a cursor over the records it currently holds.
#[derive(Debug)]
pub struct DirectoryBuffer {
    storage: PooledBuffer,
    filled: usize,
    cursor: usize,
}

impl DirectoryBuffer {
    /// Rents a buffer sized for `hint` from `pool`.
    pub fn rent(pool: &Arc<BufferPool>, hint: usize) -> Result<Self> {
        let storage = BufferPool::rent(pool, effective_buffer_size(hint))?;
        Ok(Self {
            storage,
            filled: 0,
            cursor: 0,
        })
    }

    /// Usable size in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Grows the buffer to at least `min_size` bytes. Pending records are
    /// kept.
    pub fn ensure_capacity(&mut self, min_size: usize) -> Result<()> {
        self.storage.ensure_len(min_size)
    }

    /// Records remain between the cursor and the filled length.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.cursor < self.filled
    }

    /// Reads the next batch from `handle`, discarding anything unread.
    ///
    /// A record too large for the buffer doubles it, up to
    /// [`MAXIMUM_BUFFER_SIZE`], and the read is retried. Returns `false` when
    /// the directory has no more entries.
    pub fn refill(&mut self, handle: &mut DirectoryHandle, path: &Path) -> Result<bool> {
        self.reset();
        let filled = loop {
            match handle.read_batch(&mut self.storage) {
                Ok(filled) => break filled,
                Err(source)
                    if source.kind() == io::ErrorKind::InvalidInput
                        && self.capacity() < MAXIMUM_BUFFER_SIZE =>
                {
                    let grown = (self.capacity() * 2).clamp(MINIMUM_BUFFER_SIZE, MAXIMUM_BUFFER_SIZE);
                    logging::trace_buffer!(path = %path.display(), bytes = grown, "growing listing buffer");
                    self.ensure_capacity(grown)?;
                }
                Err(source) => return Err(EnumerationError::io(path, source)),
            }
        };
        logging::trace_buffer!(path = %path.display(), bytes = filled, "refilled listing buffer");
        self.filled = filled;
        Ok(filled != 0)
    }

    /// Returns the record at the cursor and advances past it.
    ///
    /// `None` means the buffer is drained; call [`refill`](Self::refill).
    pub fn next_record(&mut self, path: &Path) -> Result<Option<RawRecord<'_>>> {
        if !self.has_pending() {
            return Ok(None);
        }

        let record = RawRecord::parse(&self.storage[self.cursor..self.filled]).map_err(|err| {
            EnumerationError::io(path, io::Error::new(io::ErrorKind::InvalidData, err))
        })?;
        self.cursor += record.record_len();
        Ok(Some(record))
    }

    /// Forgets the current contents.
    pub fn reset(&mut self) {
        self.filled = 0;
        self.cursor = 0;
    }
}
