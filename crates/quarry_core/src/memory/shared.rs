//! # Shared Pool
//!
//! A [`Pool`] behind a lock, for callers that must allocate from several
//! threads. The pool itself stays unsynchronized; this wrapper is the
//! external mutual exclusion around it.

use parking_lot::Mutex;

use super::pool::{Allocation, Pool};
use super::stats::PoolStats;
use crate::error::PoolResult;

/// A pool guarded by a mutex.
///
/// Every operation takes the lock for its duration. Use [`SharedPool::with`]
/// to batch several operations, or to read allocation contents, under one
/// acquisition.
#[derive(Debug)]
pub struct SharedPool {
    inner: Mutex<Pool>,
}

impl SharedPool {
    /// Wraps an existing pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self {
            inner: Mutex::new(pool),
        }
    }

    /// See [`Pool::allocate`].
    ///
    /// # Errors
    ///
    /// Same as [`Pool::allocate`].
    pub fn allocate(&self, size: usize) -> PoolResult<Allocation> {
        self.inner.lock().allocate(size)
    }

    /// See [`Pool::allocate_zeroed`].
    ///
    /// # Errors
    ///
    /// Same as [`Pool::allocate_zeroed`].
    pub fn allocate_zeroed(&self, count: usize, size: usize) -> PoolResult<Allocation> {
        self.inner.lock().allocate_zeroed(count, size)
    }

    /// See [`Pool::duplicate_string`].
    ///
    /// # Errors
    ///
    /// Same as [`Pool::duplicate_string`].
    pub fn duplicate_string(&self, text: &str) -> PoolResult<Allocation> {
        self.inner.lock().duplicate_string(text)
    }

    /// Runs `f` with exclusive access to the pool.
    pub fn with<R>(&self, f: impl FnOnce(&mut Pool) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// See [`Pool::reset`].
    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    /// See [`Pool::stats`].
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.inner.lock().stats()
    }

    /// Unwraps the pool.
    #[must_use]
    pub fn into_inner(self) -> Pool {
        self.inner.into_inner()
    }
}

impl From<Pool> for SharedPool {
    fn from(pool: Pool) -> Self {
        Self::new(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_concurrent_allocations_are_accounted() {
        let shared = Arc::new(SharedPool::new(Pool::create(0).unwrap()));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for i in 0..1000 {
                        let a = shared.allocate(24).unwrap();
                        shared.with(|pool| {
                            pool.get_mut(a).unwrap().fill((t * 1000 + i) as u8);
                        });
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(shared.stats().total_used, 4 * 1000 * 32);
    }

    #[test]
    fn test_with_reads_duplicated_string() {
        let shared = SharedPool::from(Pool::create(0).unwrap());
        let s = shared.duplicate_string("shared").unwrap();
        assert_eq!(
            shared.with(|pool| pool.get_str(s).map(str::to_owned)),
            Some("shared".to_owned())
        );

        shared.reset();
        assert_eq!(shared.stats().total_used, 0);
        assert!(shared.into_inner().get(s).is_none());
    }
}
