//! # Quarry Core
//!
//! A growable arena pool allocator designed for:
//! - Many small, variable-sized allocations in a bounded phase of work
//! - O(1) allocation on the fast path
//! - O(1) bulk reclamation without returning memory to the platform
//!
//! ## Architecture Rules
//!
//! 1. **No per-object free** - Memory is reclaimed by reset or destroy only
//! 2. **16-byte alignment** - Every region starts on a 16-byte boundary
//! 3. **Fail, never abort** - Exhaustion and overflow come back as errors
//!
//! ## Example
//!
//! ```rust
//! use quarry_core::Pool;
//!
//! let mut pool = Pool::create(0)?;
//! let nums = pool.allocate_slice::<i32>(100)?;
//! pool.cast_mut::<i32>(nums).unwrap()[10] = 100;
//!
//! let stats = pool.stats();
//! assert_eq!(stats.block_count, 1);
//! pool.destroy();
//! # Ok::<(), quarry_core::PoolError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod memory;

pub use config::PoolConfig;
pub use error::{PoolError, PoolResult};
pub use memory::{
    align_up, Allocation, Pool, PoolStats, SharedPool, DEFAULT_BLOCK_SIZE, POOL_ALIGNMENT,
};
