//! Shared logical accounting for one allocator family

use core::cell::Cell;

use crate::errors::{AllocError, Result};

/// Element budget shared by every handle copied or rebound from one origin
///
/// `max_elements == 0` means unlimited. `allocated` is cumulative: it is
/// never decremented by deallocation.
#[derive(Debug, Default)]
pub struct AllocationState {
    max_elements: usize,
    allocated: Cell<usize>,
}

impl AllocationState {
    /// State with a hard limit (0 = unlimited)
    pub fn new(max_elements: usize) -> Self {
        Self {
            max_elements,
            allocated: Cell::new(0),
        }
    }

    /// State without a limit
    pub fn unlimited() -> Self {
        Self::new(0)
    }

    /// Check that `n` more elements fit the budget without recording them
    pub fn check(&self, n: usize) -> Result<()> {
        if self.max_elements == 0 {
            return Ok(());
        }

        let allocated = self.allocated.get();
        match allocated.checked_add(n) {
            Some(total) if total <= self.max_elements => Ok(()),
            _ => Err(AllocError::CapacityExceeded {
                requested: n,
                allocated,
                max: self.max_elements,
            }),
        }
    }

    /// Count `n` elements as allocated
    #[inline]
    pub fn record(&self, n: usize) {
        self.allocated.set(self.allocated.get().saturating_add(n));
    }

    #[inline]
    pub fn allocated(&self) -> usize {
        self.allocated.get()
    }

    #[inline]
    pub fn max_elements(&self) -> usize {
        self.max_elements
    }

    /// Elements still available, or None when unlimited
    pub fn remaining(&self) -> Option<usize> {
        (self.max_elements != 0).then(|| self.max_elements.saturating_sub(self.allocated.get()))
    }
}
