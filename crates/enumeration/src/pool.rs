//! Thread-safe pool of listing buffers with RAII return.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::error::{EnumerationError, Result};

/// Buffers retained by [`BufferPool::shared`].
pub const SHARED_POOL_CAPACITY: usize = 16;

static SHARED: OnceLock<Arc<BufferPool>> = OnceLock::new();

/// A pool of reusable byte buffers shared between enumerators.
///
/// Renting pops a retained buffer when one is available and allocates
/// otherwise; dropping the [`PooledBuffer`] hands it back. The pool keeps at
/// most `max_buffers` idle buffers.
///
/// ```
/// use enumeration::BufferPool;
/// use std::sync::Arc;
///
/// let pool = Arc::new(BufferPool::new(2));
/// {
///     let buffer = BufferPool::rent(&pool, 4096).expect("allocate");
///     assert!(buffer.len() >= 4096);
/// }
/// assert_eq!(pool.available(), 1);
/// ```
#[derive(Debug)]
pub struct BufferPool {
    buffers: Mutex<Vec<Vec<u8>>>,
    max_buffers: usize,
}

impl BufferPool {
    /// Creates an empty pool that retains up to `max_buffers` idle buffers.
    #[must_use]
    pub fn new(max_buffers: usize) -> Self {
        Self {
            buffers: Mutex::new(Vec::with_capacity(max_buffers)),
            max_buffers,
        }
    }

    /// Process-wide pool used by enumerators unless another is supplied.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::new(SHARED_POOL_CAPACITY))))
    }

    /// Rents a buffer of at least `min_size` bytes.
    ///
    /// Allocation failure is reported as
    /// [`EnumerationError::ResourceExhaustion`].
    pub fn rent(pool: &Arc<Self>, min_size: usize) -> Result<PooledBuffer> {
        let reused = pool.lock().pop();
        let mut buffer = reused.unwrap_or_default();

        if buffer.len() < min_size {
            buffer
                .try_reserve_exact(min_size - buffer.len())
                .map_err(|_| EnumerationError::ResourceExhaustion {
                    what: "directory listing buffer",
                })?;
            buffer.resize(min_size, 0);
        }

        Ok(PooledBuffer {
            buffer: Some(buffer),
            pool: Arc::clone(pool),
        })
    }

    /// Number of idle buffers currently retained.
    #[must_use]
    pub fn available(&self) -> usize {
        self.lock().len()
    }

    /// Maximum number of idle buffers retained.
    #[must_use]
    pub const fn max_buffers(&self) -> usize {
        self.max_buffers
    }

    fn give_back(&self, buffer: Vec<u8>) {
        let mut buffers = self.lock();
        if buffers.len() < self.max_buffers {
            buffers.push(buffer);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Vec<u8>>> {
        // The protected data is a plain free list; a panic mid-push leaves it
        // consistent.
        self.buffers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A rented buffer, returned to its pool exactly once on drop.
#[derive(Debug)]
pub struct PooledBuffer {
    buffer: Option<Vec<u8>>,
    pool: Arc<BufferPool>,
}

impl PooledBuffer {
    /// Grows the buffer to at least `min_size` bytes.
    pub fn ensure_len(&mut self, min_size: usize) -> Result<()> {
        let Some(buffer) = self.buffer.as_mut() else {
            return Ok(());
        };
        if buffer.len() < min_size {
            buffer
                .try_reserve_exact(min_size - buffer.len())
                .map_err(|_| EnumerationError::ResourceExhaustion {
                    what: "directory listing buffer",
                })?;
            buffer.resize(min_size, 0);
        }
        Ok(())
    }
}

impl Deref for PooledBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.buffer.as_deref().unwrap_or_default()
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.buffer.as_deref_mut().unwrap_or_default()
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.give_back(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn rented_buffer_meets_minimum() {
        let pool = Arc::new(BufferPool::new(4));
        let buffer = BufferPool::rent(&pool, 1024).expect("rent");
        assert_eq!(buffer.len(), 1024);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn dropped_buffer_returns_once() {
        let pool = Arc::new(BufferPool::new(4));
        let buffer = BufferPool::rent(&pool, 64).expect("rent");
        drop(buffer);
        assert_eq!(pool.available(), 1);

        let again = BufferPool::rent(&pool, 32).expect("rent");
        assert_eq!(pool.available(), 0);
        assert_eq!(again.len(), 64);
    }

    #[test]
    fn reused_buffer_grows_when_needed() {
        let pool = Arc::new(BufferPool::new(4));
        drop(BufferPool::rent(&pool, 16).expect("rent"));
        let mut buffer = BufferPool::rent(&pool, 128).expect("rent");
        assert_eq!(buffer.len(), 128);
        buffer.ensure_len(256).expect("grow");
        assert_eq!(buffer.len(), 256);
    }

    #[test]
    fn pool_caps_retained_buffers() {
        let pool = Arc::new(BufferPool::new(1));
        let first = BufferPool::rent(&pool, 8).expect("rent");
        let second = BufferPool::rent(&pool, 8).expect("rent");
        drop(first);
        drop(second);
        assert_eq!(pool.available(), 1);
        assert_eq!(pool.max_buffers(), 1);
    }

    #[test]
    fn concurrent_rent_and_return() {
        let pool = Arc::new(BufferPool::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for _ in 0..50 {
                        let mut buffer = BufferPool::rent(&pool, 512).expect("rent");
                        buffer[0] = 1;
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread");
        }
        assert!(pool.available() <= 8);
        assert!(pool.available() >= 1);
    }

    #[test]
    fn shared_pool_is_a_singleton() {
        assert!(Arc::ptr_eq(&BufferPool::shared(), &BufferPool::shared()));
    }
}
