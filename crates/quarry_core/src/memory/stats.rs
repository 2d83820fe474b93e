//! # Pool Statistics
//!
//! Value snapshots of pool usage.

use std::fmt;

/// Snapshot of a pool's usage. Not a live view.
///
/// The default value (all zeros) is the snapshot of a pool that does not
/// exist.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PoolStats {
    /// Sum of block capacities across the chain.
    pub total_allocated: usize,
    /// Bytes handed out to callers since creation or the last reset.
    pub total_used: usize,
    /// Number of blocks in the chain.
    pub block_count: usize,
    /// `total_used / total_allocated`, or 0 when nothing is allocated.
    pub utilization: f32,
}

impl PoolStats {
    /// Builds a snapshot, computing utilization from the totals.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(total_allocated: usize, total_used: usize, block_count: usize) -> Self {
        let utilization = if total_allocated > 0 {
            total_used as f32 / total_allocated as f32
        } else {
            0.0
        };

        Self {
            total_allocated,
            total_used,
            block_count,
            utilization,
        }
    }

    /// Bytes acquired but not yet handed out.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.total_allocated - self.total_used
    }
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pool stats:")?;
        writeln!(f, "  Allocated: {} bytes", self.total_allocated)?;
        writeln!(f, "  Used: {} bytes", self.total_used)?;
        writeln!(f, "  Blocks: {}", self.block_count)?;
        write!(f, "  Utilization: {:.1}%", self.utilization * 100.0)
    }
}
