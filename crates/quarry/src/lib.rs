//! # Quarry
//!
//! Facade over the arena pool.
//!
//! ## Modules
//!
//! - `core`: the pool, its blocks, statistics and configuration
//!
//! ```rust
//! use quarry::Pool;
//!
//! let mut pool = Pool::create(0)?;
//! let text = pool.duplicate_string("scratch")?;
//! assert_eq!(pool.get_str(text), Some("scratch"));
//! # Ok::<(), quarry::PoolError>(())
//! ```

pub use quarry_core as core;

// Re-export commonly used types
pub use quarry_core::{Allocation, Pool, PoolConfig, PoolError, PoolStats, SharedPool};
