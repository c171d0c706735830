//! System heap allocator
//!
//! Stateless and always-equal; the default allocator of `List`.

use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;
use std::alloc::{alloc, dealloc, Layout};

use super::traits::{Allocator, PropagationTraits};
use crate::errors::{AllocError, Result};

/// Allocator forwarding to `std::alloc`
pub struct Global<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Global<T> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    fn layout(n: usize) -> Result<Layout> {
        Layout::array::<T>(n).map_err(|_| AllocError::SizeOverflow {
            count: n,
            elem_size: core::mem::size_of::<T>(),
        })
    }
}

impl<T> Allocator for Global<T> {
    const ALWAYS_EQUAL: bool = true;

    type Value = T;
    type Rebind<U> = Global<U>;

    fn allocate(&self, n: usize) -> Result<NonNull<T>> {
        let layout = Self::layout(n)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr.cast::<T>()).ok_or(AllocError::OutOfMemory {
            size: layout.size(),
            align: layout.align(),
        })
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        // `allocate(n)` already validated this layout.
        let Ok(layout) = Self::layout(n) else { return };
        if layout.size() != 0 {
            dealloc(ptr.as_ptr().cast(), layout);
        }
    }

    fn rebind<U>(&self) -> Global<U> {
        Global::new()
    }

    fn propagation(&self) -> PropagationTraits {
        PropagationTraits::STATELESS
    }
}

impl<T> Clone for Global<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Copy for Global<T> {}

impl<T> Default for Global<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PartialEq for Global<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> Eq for Global<T> {}

impl<T> fmt::Debug for Global<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Global")
    }
}
