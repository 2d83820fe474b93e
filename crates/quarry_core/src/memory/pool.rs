//! # Arena Pool
//!
//! A growable bump allocator that carves variable-sized requests out of a
//! chain of large blocks and reclaims everything at once.
//!
//! ## Allocation Path
//!
//! ```text
//!   allocate(n) ──> align_up(n, 16)
//!                        │
//!                        ▼
//!            ┌───── fits current? ─────┐
//!            │ yes                  no │
//!            ▼                         ▼
//!     bump current.used     next retained block fits?
//!                               │ yes          no │
//!                               ▼                 ▼
//!                         advance current   append Block(max(n, block_size))
//! ```
//!
//! Allocations are addressed by [`Allocation`] handles. A handle is only
//! honored by the pool that issued it, and only until the next reset.

use std::ffi::CStr;
use std::sync::atomic::{AtomicU64, Ordering};

use bytemuck::Pod;

use super::block::{align_up, Block, DEFAULT_BLOCK_SIZE, POOL_ALIGNMENT};
use super::stats::PoolStats;
use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult};

/// Source of unique pool identities.
static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a region carved from a pool.
///
/// Handles are plain values. Resolving one through [`Pool::get`] fails once
/// the pool has been reset, and a pool ignores handles issued by another
/// pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Allocation {
    /// Identity of the issuing pool.
    pool: u64,
    /// Reset epoch the handle was issued in.
    epoch: u64,
    /// Index of the block in the chain.
    block: usize,
    /// Byte offset inside the block's data region.
    offset: usize,
    /// Requested length in bytes.
    len: usize,
    /// Aligned length actually reserved.
    reserved: usize,
}

impl Allocation {
    /// Requested length in bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true for an empty region. Pools never issue one.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes reserved for this region (the length rounded up to 16).
    #[inline]
    #[must_use]
    pub const fn reserved(&self) -> usize {
        self.reserved
    }

    /// Offset of the region from the start of its block.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Position of the owning block in the chain (0 is the head).
    #[inline]
    #[must_use]
    pub const fn block_index(&self) -> usize {
        self.block
    }
}

/// A growable arena pool.
///
/// Serves many small allocations from large blocks. Individual allocations
/// are never freed: [`Pool::reset`] reclaims all of them while keeping the
/// blocks, and [`Pool::destroy`] (or dropping the pool) releases everything.
///
/// # Thread Safety
///
/// The pool is NOT synchronized. Use one pool per thread, or wrap it in a
/// [`SharedPool`](super::SharedPool).
///
/// # Example
///
/// ```rust
/// use quarry_core::Pool;
///
/// let mut pool = Pool::create(0)?;
/// let greeting = pool.duplicate_string("Hello, World!")?;
/// assert_eq!(pool.get_str(greeting), Some("Hello, World!"));
///
/// pool.reset();
/// assert_eq!(pool.stats().total_used, 0);
/// # Ok::<(), quarry_core::PoolError>(())
/// ```
pub struct Pool {
    /// Identity stamped into every handle.
    id: u64,
    /// The block chain, head first. Never empty.
    blocks: Vec<Block>,
    /// Index of the block accepting allocations.
    current: usize,
    /// Default capacity for new blocks.
    block_size: usize,
    /// Sum of block capacities.
    total_allocated: usize,
    /// Bytes handed out since creation or the last reset.
    total_used: usize,
    /// Bumped by every reset to invalidate outstanding handles.
    epoch: u64,
}

impl Pool {
    /// Creates a pool whose blocks hold at least `block_size` bytes.
    ///
    /// A `block_size` of 0 selects [`DEFAULT_BLOCK_SIZE`]. One block is
    /// acquired up front.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::OutOfMemory`] if the initial block cannot be
    /// acquired.
    pub fn create(block_size: usize) -> PoolResult<Self> {
        let block_size = if block_size > 0 {
            block_size
        } else {
            DEFAULT_BLOCK_SIZE
        };

        let head = Block::create(block_size)?;
        let total_allocated = head.size();

        let id = NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            "pool {} created: block_size={}, head={} bytes",
            id,
            block_size,
            total_allocated
        );

        Ok(Self {
            id,
            blocks: vec![head],
            current: 0,
            block_size,
            total_allocated,
            total_used: 0,
            epoch: 0,
        })
    }

    /// Creates a pool from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Same as [`Pool::create`].
    pub fn from_config(config: &PoolConfig) -> PoolResult<Self> {
        Self::create(config.block_size)
    }

    /// Default capacity for newly created blocks.
    #[inline]
    #[must_use]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of blocks in the chain.
    #[inline]
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Allocates `size` bytes aligned to 16.
    ///
    /// The region's contents are unspecified: after a reset it may hold
    /// bytes from an earlier round. Use [`Pool::allocate_zeroed`] for
    /// cleared memory.
    ///
    /// # Errors
    ///
    /// - [`PoolError::ZeroSize`] if `size` is 0.
    /// - [`PoolError::CapacityOverflow`] if aligning `size` overflows.
    /// - [`PoolError::OutOfMemory`] if a needed block cannot be acquired.
    ///
    /// On error the pool is unchanged.
    pub fn allocate(&mut self, size: usize) -> PoolResult<Allocation> {
        if size == 0 {
            return Err(PoolError::ZeroSize);
        }

        let aligned_size = align_up(size, POOL_ALIGNMENT).ok_or(PoolError::CapacityOverflow)?;

        // Fast path: bump the current block.
        if !self.blocks[self.current].fits(aligned_size) {
            self.advance(aligned_size)?;
        }

        let block = self.current;
        let offset = self.blocks[block].carve(aligned_size);
        self.total_used += aligned_size;

        Ok(Allocation {
            pool: self.id,
            epoch: self.epoch,
            block,
            offset,
            len: size,
            reserved: aligned_size,
        })
    }

    /// Moves `current` to a block that can hold `aligned_size` bytes.
    ///
    /// Blocks retained by a reset are reused before a new one is appended.
    fn advance(&mut self, aligned_size: usize) -> PoolResult<()> {
        let retained = self.blocks[self.current + 1..]
            .iter()
            .position(|block| block.fits(aligned_size));

        if let Some(skip) = retained {
            self.current += 1 + skip;
            tracing::debug!("pool {} reusing block {}", self.id, self.current);
            return Ok(());
        }

        // Chain slot before block: a failed push must not mutate the pool.
        if self.blocks.try_reserve(1).is_err() {
            return Err(PoolError::OutOfMemory {
                requested: aligned_size.max(self.block_size),
            });
        }
        let block = Block::create(aligned_size.max(self.block_size))?;

        self.total_allocated += block.size();
        self.blocks.push(block);
        self.current = self.blocks.len() - 1;

        tracing::debug!(
            "pool {} grew: block {} of {} bytes, total {} bytes",
            self.id,
            self.current,
            self.blocks[self.current].size(),
            self.total_allocated
        );
        Ok(())
    }

    /// Allocates `count * size` bytes and fills them with zeros.
    ///
    /// # Errors
    ///
    /// - [`PoolError::CapacityOverflow`] if `count * size` overflows.
    /// - Otherwise the errors of [`Pool::allocate`], including
    ///   [`PoolError::ZeroSize`] when the product is 0.
    pub fn allocate_zeroed(&mut self, count: usize, size: usize) -> PoolResult<Allocation> {
        let total = count.checked_mul(size).ok_or(PoolError::CapacityOverflow)?;

        let allocation = self.allocate(total)?;
        self.region_mut(allocation).fill(0);
        Ok(allocation)
    }

    /// Allocates a zeroed region for `count` values of `T`.
    ///
    /// Regions are 16-byte aligned, so any `T` with alignment up to 16 can be
    /// viewed through [`Pool::cast`] and [`Pool::cast_mut`].
    ///
    /// # Errors
    ///
    /// Same as [`Pool::allocate_zeroed`].
    pub fn allocate_slice<T: Pod>(&mut self, count: usize) -> PoolResult<Allocation> {
        self.allocate_zeroed(count, std::mem::size_of::<T>())
    }

    /// Copies `text` into the pool followed by a NUL terminator.
    ///
    /// The copy is independent of `text` and lives until the next reset.
    ///
    /// # Errors
    ///
    /// Same as [`Pool::allocate`].
    pub fn duplicate_string(&mut self, text: &str) -> PoolResult<Allocation> {
        let bytes = text.as_bytes();
        let allocation = self.allocate(bytes.len() + 1)?;

        let region = self.region_mut(allocation);
        region[..bytes.len()].copy_from_slice(bytes);
        region[bytes.len()] = 0;
        Ok(allocation)
    }

    /// Copies a C string, terminator included, into the pool.
    ///
    /// # Errors
    ///
    /// Same as [`Pool::allocate`].
    pub fn duplicate_cstr(&mut self, text: &CStr) -> PoolResult<Allocation> {
        let bytes = text.to_bytes_with_nul();
        let allocation = self.allocate(bytes.len())?;
        self.region_mut(allocation).copy_from_slice(bytes);
        Ok(allocation)
    }

    /// Resolves a handle to its bytes.
    ///
    /// Returns `None` if the handle came from another pool or predates the
    /// last reset.
    #[must_use]
    pub fn get(&self, allocation: Allocation) -> Option<&[u8]> {
        if !self.owns(allocation) {
            return None;
        }
        let block = self.blocks.get(allocation.block)?;
        block
            .data()
            .get(allocation.offset..allocation.offset + allocation.len)
    }

    /// Resolves a handle to its bytes, mutably.
    ///
    /// Returns `None` under the same conditions as [`Pool::get`].
    #[must_use]
    pub fn get_mut(&mut self, allocation: Allocation) -> Option<&mut [u8]> {
        if !self.owns(allocation) {
            return None;
        }
        let block = self.blocks.get_mut(allocation.block)?;
        block
            .data_mut()
            .get_mut(allocation.offset..allocation.offset + allocation.len)
    }

    /// Views a duplicated string without its terminator.
    ///
    /// Returns `None` for a stale or foreign handle, or if the bytes are not
    /// NUL-terminated UTF-8.
    #[must_use]
    pub fn get_str(&self, allocation: Allocation) -> Option<&str> {
        let (nul, text) = self.get(allocation)?.split_last()?;
        if *nul != 0 {
            return None;
        }
        std::str::from_utf8(text).ok()
    }

    /// Views a region as a slice of `T`.
    ///
    /// Returns `None` for a stale or foreign handle, or if the region's
    /// length is not a multiple of `size_of::<T>()`.
    #[must_use]
    pub fn cast<T: Pod>(&self, allocation: Allocation) -> Option<&[T]> {
        bytemuck::try_cast_slice(self.get(allocation)?).ok()
    }

    /// Views a region as a mutable slice of `T`.
    ///
    /// Returns `None` under the same conditions as [`Pool::cast`].
    #[must_use]
    pub fn cast_mut<T: Pod>(&mut self, allocation: Allocation) -> Option<&mut [T]> {
        bytemuck::try_cast_slice_mut(self.get_mut(allocation)?).ok()
    }

    /// Reclaims every allocation while keeping all blocks.
    ///
    /// `total_allocated` is unchanged. Every handle issued so far stops
    /// resolving.
    pub fn reset(&mut self) {
        for block in &mut self.blocks {
            block.reset();
        }
        self.current = 0;
        self.total_used = 0;
        self.epoch = self.epoch.wrapping_add(1);

        tracing::debug!(
            "pool {} reset: {} blocks, {} bytes retained",
            self.id,
            self.blocks.len(),
            self.total_allocated
        );
    }

    /// Releases every block and the pool itself.
    ///
    /// Consumes the pool, so nothing can be allocated from or resolved
    /// against it afterwards. Dropping the pool has the same effect.
    pub fn destroy(self) {
        tracing::debug!(
            "pool {} destroyed: {} blocks, {} bytes released",
            self.id,
            self.blocks.len(),
            self.total_allocated
        );
        drop(self);
    }

    /// Takes a usage snapshot.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats::new(self.total_allocated, self.total_used, self.blocks.len())
    }

    #[inline]
    fn owns(&self, allocation: Allocation) -> bool {
        allocation.pool == self.id && allocation.epoch == self.epoch
    }

    /// Requested region of a handle just issued by this pool.
    fn region_mut(&mut self, allocation: Allocation) -> &mut [u8] {
        let start = allocation.offset;
        &mut self.blocks[allocation.block].data_mut()[start..start + allocation.len]
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("id", &self.id)
            .field("block_size", &self.block_size)
            .field("blocks", &self.blocks.len())
            .field("current", &self.current)
            .field("current_used", &self.blocks[self.current].used())
            .field("total_allocated", &self.total_allocated)
            .field("total_used", &self.total_used)
            .finish_non_exhaustive()
    }
}
