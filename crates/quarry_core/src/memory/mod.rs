//! # Memory Management
//!
//! Growable arena pools for bulk scratch allocation.
//!
//! ## Design Philosophy
//!
//! Memory is acquired in large blocks and handed out by bumping a cursor:
//! - No per-object free
//! - O(1) reset that keeps every block for the next round
//! - Every address aligned to 16 bytes

mod block;
mod pool;
mod shared;
mod stats;

pub use block::{align_up, DEFAULT_BLOCK_SIZE, POOL_ALIGNMENT};
pub use pool::{Allocation, Pool};
pub use shared::SharedPool;
pub use stats::PoolStats;
