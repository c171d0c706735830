//! Block - one contiguous buffer consumed by bump allocation
//!
//! Design: the buffer is acquired from the system allocator once and only
//! returned when the block is dropped. The used offset never decreases.

use core::ptr::NonNull;
use std::alloc::{alloc, dealloc, Layout};

use crate::errors::{AllocError, Result};

/// Base alignment of every block buffer
const BLOCK_ALIGN: usize = 16;

/// Owned buffer with a monotonic used offset
pub struct Block {
    buffer: NonNull<u8>,
    capacity: usize,
    used: usize,
}

impl Block {
    /// Acquire a new buffer of `capacity` bytes from the system
    ///
    /// A zero-capacity block owns no memory and can only serve requests
    /// that fit at its (dangling) base.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Ok(Self {
                buffer: NonNull::dangling(),
                capacity: 0,
                used: 0,
            });
        }

        let layout = Layout::from_size_align(capacity, BLOCK_ALIGN)
            .map_err(|_| AllocError::OutOfMemory {
                size: capacity,
                align: BLOCK_ALIGN,
            })?;

        let start = unsafe { alloc(layout) };
        let buffer = NonNull::new(start)
            .ok_or(AllocError::OutOfMemory {
                size: capacity,
                align: BLOCK_ALIGN,
            })?;

        Ok(Self {
            buffer,
            capacity,
            used: 0,
        })
    }

    /// Carve `size` bytes aligned to `align` from the remaining space
    ///
    /// Returns None if the block cannot satisfy the request; the block is
    /// left untouched in that case.
    #[inline]
    pub fn try_bump(&mut self, size: usize, align: usize) -> Option<NonNull<u8>> {
        debug_assert!(is_power_of_two(align), "alignment must be power of 2");

        let base = self.buffer.as_ptr() as usize;
        let start = align_up(base.checked_add(self.used)?, align)?;
        let end = start.checked_add(size)?;

        if end > base.checked_add(self.capacity)? {
            return None;
        }

        self.used = end - base;
        // Offset from base keeps the buffer's provenance.
        let ptr = unsafe { self.buffer.as_ptr().add(start - base) };
        NonNull::new(ptr)
    }

    /// Buffer size in bytes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes consumed so far, including alignment padding
    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    /// Bytes still available at the tail
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.used
    }

    /// Whether `ptr` points inside this block's buffer
    pub fn contains(&self, ptr: *const u8) -> bool {
        let base = self.buffer.as_ptr() as usize;
        let addr = ptr as usize;
        addr >= base && addr < base + self.capacity
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        if self.capacity == 0 {
            return;
        }
        unsafe {
            // Same layout as in `new`, which already validated it.
            let layout = Layout::from_size_align_unchecked(self.capacity, BLOCK_ALIGN);
            dealloc(self.buffer.as_ptr(), layout);
        }
    }
}

/// Power-of-two check that rejects zero
#[inline(always)]
pub const fn is_power_of_two(x: usize) -> bool {
    x != 0 && (x & (x - 1)) == 0
}

/// Align address upward to the next multiple of `align`
///
/// `align` must be a power of two. Returns None on overflow.
#[inline(always)]
pub const fn align_up(addr: usize, align: usize) -> Option<usize> {
    let mask = align - 1;
    match addr.checked_add(mask) {
        Some(bumped) => Some(bumped & !mask),
        None => None,
    }
}
