//! Arena - monotonic pool of blocks
//!
//! Design: allocation is always attempted against the last block. When it
//! cannot satisfy the request a block of `max(default_block_size,
//! size + alignment)` bytes is appended and the request retried there once.
//! Individual allocations are never freed; every block is released when the
//! arena is dropped.

use core::cell::RefCell;
use core::ptr::NonNull;

use super::block::{is_power_of_two, Block};
use crate::errors::{AllocError, Result};
use crate::logging;

/// Ordered sequence of blocks serving aligned bump allocations
pub struct Arena {
    blocks: RefCell<Vec<Block>>,
    block_size: usize,
}

impl Arena {
    /// Create an arena provisioned with one block of `block_size` bytes
    ///
    /// `block_size` also becomes the default size of every later block.
    pub fn new(block_size: usize) -> Result<Self> {
        let first = Block::new(block_size).map_err(|err| {
            logging::log_system_failure(&err);
            err
        })?;
        logging::log_block_appended(0, block_size);

        Ok(Self {
            blocks: RefCell::new(vec![first]),
            block_size,
        })
    }

    /// Allocate `size` bytes aligned to `alignment`
    ///
    /// Fails with [`AllocError::InvalidArgument`] if `alignment` is not a
    /// power of two, and with [`AllocError::OutOfMemory`] if a new block
    /// cannot be acquired.
    pub fn allocate_bytes(&self, size: usize, alignment: usize) -> Result<NonNull<u8>> {
        if !is_power_of_two(alignment) {
            logging::log_invalid_alignment(alignment);
            return Err(AllocError::InvalidArgument { alignment });
        }

        let mut blocks = self.blocks.borrow_mut();

        // Fast path: bump in the current block
        if let Some(ptr) = blocks.last_mut().and_then(|b| b.try_bump(size, alignment)) {
            logging::log_bytes_carved(size, alignment, ptr.as_ptr());
            return Ok(ptr);
        }

        // Slow path: append a block large enough for any placement of the request
        let capacity = size
            .checked_add(alignment)
            .map(|needed| needed.max(self.block_size))
            .ok_or(AllocError::OutOfMemory {
                size,
                align: alignment,
            })?;

        // Report the caller's request, not the block size behind it
        let mut block = Block::new(capacity).map_err(|err| {
            logging::log_system_failure(&err);
            AllocError::OutOfMemory {
                size,
                align: alignment,
            }
        })?;
        let ptr = block
            .try_bump(size, alignment)
            .ok_or(AllocError::OutOfMemory {
                size,
                align: alignment,
            })?;

        logging::log_block_appended(blocks.len(), capacity);
        blocks.push(block);

        logging::log_bytes_carved(size, alignment, ptr.as_ptr());
        Ok(ptr)
    }

    /// Release a region back to the arena
    ///
    /// This is a no-op: memory is reclaimed only when the arena is dropped.
    #[inline]
    pub fn deallocate_bytes(&self, _ptr: NonNull<u8>, _size: usize) {}

    /// Default size in bytes of newly appended blocks
    #[inline]
    pub fn default_block_size(&self) -> usize {
        self.block_size
    }

    /// Number of blocks currently owned
    pub fn block_count(&self) -> usize {
        self.blocks.borrow().len()
    }

    /// Whether `ptr` was served by one of this arena's blocks
    pub fn owns(&self, ptr: *const u8) -> bool {
        self.blocks.borrow().iter().any(|b| b.contains(ptr))
    }

    /// Snapshot of block usage
    pub fn stats(&self) -> ArenaStats {
        let blocks = self.blocks.borrow();
        ArenaStats {
            blocks: blocks.len(),
            reserved_bytes: blocks.iter().map(Block::capacity).sum(),
            used_bytes: blocks.iter().map(Block::used).sum(),
            current_block_remaining: blocks.last().map_or(0, Block::remaining),
        }
    }
}

impl core::fmt::Debug for Arena {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Arena")
            .field("block_size", &self.block_size)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Arena statistics for monitoring and debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaStats {
    pub blocks: usize,
    pub reserved_bytes: usize,
    pub used_bytes: usize,
    pub current_block_remaining: usize,
}
