//! # Pool Error Types
//!
//! All errors that can occur while allocating from a pool.

use thiserror::Error;

/// Errors that can occur in the pool.
///
/// A failed operation never mutates the pool: no block is appended, no
/// cursor moves and no statistic changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A zero-byte allocation was requested.
    #[error("zero-size allocation requested")]
    ZeroSize,

    /// The requested size overflowed while multiplying or aligning.
    #[error("allocation size overflows usize")]
    CapacityOverflow,

    /// The platform allocator could not provide a new block.
    #[error("out of memory: failed to acquire a block of {requested} bytes")]
    OutOfMemory {
        /// Block capacity that was being acquired.
        requested: usize,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
