//! # Block
//!
//! A single contiguous byte region with a bump cursor. Blocks are created
//! only by the pool and are never freed individually.

use bytemuck::{Pod, Zeroable};

use crate::error::{PoolError, PoolResult};

/// Capacity floor for every block (64 KiB).
pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

/// Alignment of every address handed out by a pool.
pub const POOL_ALIGNMENT: usize = 16;

/// Rounds `n` up to the next multiple of `alignment` (a power of two).
///
/// Returns `None` if the rounded value does not fit in `usize`.
#[inline]
#[must_use]
pub const fn align_up(n: usize, alignment: usize) -> Option<usize> {
    debug_assert!(alignment.is_power_of_two());
    match n.checked_add(alignment - 1) {
        Some(bumped) => Some(bumped & !(alignment - 1)),
        None => None,
    }
}

/// Storage unit of a block. Its alignment is what makes every block start,
/// and therefore every aligned offset, land on a 16-byte boundary.
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C, align(16))]
struct Chunk(
    // Only read through byte casts.
    #[allow(dead_code)] [u8; POOL_ALIGNMENT],
);

/// A fixed-capacity region owned by a pool.
pub(crate) struct Block {
    /// The backing storage, `size` rounded up to whole chunks.
    storage: Box<[Chunk]>,
    /// Usable capacity in bytes, fixed at creation.
    size: usize,
    /// Offset of the first unused byte.
    used: usize,
}

impl Block {
    /// Creates a block of `max(min_size, DEFAULT_BLOCK_SIZE)` bytes.
    ///
    /// The storage comes from the allocator's zeroed path and is not
    /// written here, so pages are only touched once they are carved. A
    /// refused acquisition surfaces as [`PoolError::OutOfMemory`]. Under
    /// overcommit the platform may still accept a request it cannot back
    /// later; that failure happens on first write, outside the pool.
    pub(crate) fn create(min_size: usize) -> PoolResult<Self> {
        let size = min_size.max(DEFAULT_BLOCK_SIZE);
        let chunks = size.div_ceil(POOL_ALIGNMENT);

        let Ok(storage) = bytemuck::allocation::try_zeroed_slice_box::<Chunk>(chunks) else {
            tracing::warn!("block acquisition failed: {} bytes", size);
            return Err(PoolError::OutOfMemory { requested: size });
        };

        Ok(Self {
            storage,
            size,
            used: 0,
        })
    }

    /// Total capacity in bytes.
    #[inline]
    pub(crate) const fn size(&self) -> usize {
        self.size
    }

    /// Bytes carved so far.
    #[inline]
    pub(crate) const fn used(&self) -> usize {
        self.used
    }

    /// Returns true if `aligned_size` more bytes fit behind the cursor.
    #[inline]
    pub(crate) const fn fits(&self, aligned_size: usize) -> bool {
        aligned_size <= self.size - self.used
    }

    /// Carves `aligned_size` bytes and returns their offset.
    ///
    /// The caller checks [`Block::fits`] first.
    #[inline]
    pub(crate) fn carve(&mut self, aligned_size: usize) -> usize {
        debug_assert!(self.fits(aligned_size));
        debug_assert_eq!(aligned_size % POOL_ALIGNMENT, 0);
        let offset = self.used;
        self.used += aligned_size;
        offset
    }

    /// Rewinds the cursor. The storage is kept.
    #[inline]
    pub(crate) fn reset(&mut self) {
        self.used = 0;
    }

    /// The data region.
    #[inline]
    pub(crate) fn data(&self) -> &[u8] {
        &bytemuck::cast_slice::<Chunk, u8>(&self.storage)[..self.size]
    }

    /// The data region, mutably.
    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<Chunk, u8>(&mut self.storage)[..self.size]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(1, POOL_ALIGNMENT), Some(16));
        assert_eq!(align_up(16, POOL_ALIGNMENT), Some(16));
        assert_eq!(align_up(17, POOL_ALIGNMENT), Some(32));
        assert_eq!(align_up(0, POOL_ALIGNMENT), Some(0));
        assert_eq!(align_up(usize::MAX, POOL_ALIGNMENT), None);
    }

    #[test]
    fn test_block_size_floor() {
        let block = Block::create(100).unwrap();
        assert_eq!(block.size(), DEFAULT_BLOCK_SIZE);
        assert_eq!(block.used(), 0);
        assert_eq!(block.data().len(), DEFAULT_BLOCK_SIZE);

        let big = Block::create(DEFAULT_BLOCK_SIZE * 2 + 3).unwrap();
        assert_eq!(big.size(), DEFAULT_BLOCK_SIZE * 2 + 3);
        assert_eq!(big.data().len(), big.size());
    }

    #[test]
    fn test_block_storage_aligned() {
        let block = Block::create(0).unwrap();
        assert_eq!(block.data().as_ptr() as usize % POOL_ALIGNMENT, 0);
    }

    #[test]
    fn test_carve_and_reset() {
        let mut block = Block::create(0).unwrap();
        assert_eq!(block.carve(32), 0);
        assert_eq!(block.carve(16), 32);
        assert_eq!(block.used(), 48);

        assert!(block.fits(DEFAULT_BLOCK_SIZE - 48));
        assert!(!block.fits(DEFAULT_BLOCK_SIZE - 32));

        block.reset();
        assert_eq!(block.used(), 0);
        assert!(block.fits(DEFAULT_BLOCK_SIZE));
    }

    #[test]
    fn test_create_failure_is_reported() {
        let err = Block::create(usize::MAX - 15).err().unwrap();
        assert_eq!(
            err,
            PoolError::OutOfMemory {
                requested: usize::MAX - 15
            }
        );
    }

    #[test]
    fn test_new_block_reads_zero() {
        let block = Block::create(DEFAULT_BLOCK_SIZE * 4).unwrap();
        assert_eq!(block.data().len(), DEFAULT_BLOCK_SIZE * 4);
        assert!(block.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_data_mut_writes_visible() {
        let mut block = Block::create(0).unwrap();
        block.data_mut()[5] = 42;
        assert_eq!(block.data()[5], 42);
    }
}
