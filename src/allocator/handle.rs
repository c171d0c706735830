//! Arena-backed allocator handle
//!
//! Copies and rebinds of one handle share a single [`Arena`] and
//! [`AllocationState`]; both are released when the last handle (or the last
//! container holding one) is dropped.

use core::fmt;
use core::marker::PhantomData;
use core::mem::{align_of, size_of};
use core::ptr::NonNull;
use std::rc::Rc;

use super::arena::{Arena, ArenaStats};
use super::policy::Policy;
use super::state::AllocationState;
use super::traits::{Allocator, CopySelection, PropagationTraits};
use crate::config::AllocatorConfig;
use crate::errors::{AllocError, Result};
use crate::logging;

/// Stateful allocator for `T` drawing from a shared arena
///
/// Not thread-safe: sharing is reference counted with `Rc`.
pub struct ArenaAllocator<T> {
    arena: Rc<Arena>,
    state: Rc<AllocationState>,
    policy: Policy,
    propagation: PropagationTraits,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ArenaAllocator<T> {
    /// Create a new allocator family
    ///
    /// The arena is provisioned with `policy.initial() * size_of::<T>()`
    /// bytes, which is also its default block size.
    pub fn new(policy: Policy) -> Result<Self> {
        Self::with_block_size(policy, policy.initial_bytes(size_of::<T>()))
    }

    /// Create a new allocator family with an explicit default block size
    pub fn with_block_size(policy: Policy, block_size: usize) -> Result<Self> {
        let arena = Rc::new(Arena::new(block_size)?);
        Ok(Self::with_arena(arena, policy))
    }

    /// Wrap a caller-provided arena with a fresh allocation budget
    pub fn with_arena(arena: Rc<Arena>, policy: Policy) -> Self {
        Self {
            arena,
            state: Rc::new(AllocationState::new(policy.max_elements())),
            policy,
            propagation: PropagationTraits::default(),
            _marker: PhantomData,
        }
    }

    /// Build an allocator from a validated configuration
    pub fn from_config(config: &AllocatorConfig) -> Result<Self> {
        let block_size = config
            .block_size
            .unwrap_or_else(|| config.policy.initial_bytes(size_of::<T>()));

        Ok(Self::with_block_size(config.policy, block_size)?.with_propagation(config.propagation))
    }

    /// Override the propagation table
    ///
    /// Only this handle and handles later copied from it carry the new table.
    #[must_use]
    pub fn with_propagation(mut self, propagation: PropagationTraits) -> Self {
        self.propagation = propagation;
        self
    }

    /// A new, unrelated family with the same policy, block size and table
    pub fn fresh(&self) -> Result<Self> {
        Ok(Self::with_block_size(self.policy, self.arena.default_block_size())?
            .with_propagation(self.propagation))
    }

    #[inline]
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Elements allocated so far by the whole family
    #[inline]
    pub fn allocated(&self) -> usize {
        self.state.allocated()
    }

    /// Element limit, 0 meaning unlimited
    #[inline]
    pub fn max_elements(&self) -> usize {
        self.state.max_elements()
    }

    /// Elements still available, or None when unlimited
    pub fn remaining(&self) -> Option<usize> {
        self.state.remaining()
    }

    pub fn arena(&self) -> &Rc<Arena> {
        &self.arena
    }

    pub fn arena_stats(&self) -> ArenaStats {
        self.arena.stats()
    }

    /// Whether both handles draw from the same element budget
    pub fn shares_state_with<U>(&self, other: &ArenaAllocator<U>) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Whether both handles draw from the same arena, across element types
    pub fn same_arena<U>(&self, other: &ArenaAllocator<U>) -> bool {
        Rc::ptr_eq(&self.arena, &other.arena)
    }

    fn byte_size(n: usize) -> Result<usize> {
        n.checked_mul(size_of::<T>())
            .ok_or(AllocError::SizeOverflow {
                count: n,
                elem_size: size_of::<T>(),
            })
    }
}

impl<T> Allocator for ArenaAllocator<T> {
    type Value = T;
    type Rebind<U> = ArenaAllocator<U>;

    fn allocate(&self, n: usize) -> Result<NonNull<T>> {
        self.check_capacity(n)?;

        let size = Self::byte_size(n)?;
        let ptr = self.arena.allocate_bytes(size, align_of::<T>())?;

        self.state.record(n);
        logging::log_elements_allocated(n, self.state.allocated(), self.state.max_elements());

        Ok(ptr.cast())
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        // Monotonic: the budget is not refunded and the bytes stay in the arena.
        self.arena.deallocate_bytes(ptr.cast(), n.saturating_mul(size_of::<T>()));
    }

    fn rebind<U>(&self) -> ArenaAllocator<U> {
        ArenaAllocator {
            arena: Rc::clone(&self.arena),
            state: Rc::clone(&self.state),
            policy: self.policy,
            propagation: self.propagation,
            _marker: PhantomData,
        }
    }

    fn propagation(&self) -> PropagationTraits {
        self.propagation
    }

    fn check_capacity(&self, n: usize) -> Result<()> {
        if !self.policy.is_fixed() {
            return Ok(());
        }
        self.state.check(n).map_err(|err| {
            logging::log_capacity_exceeded(&err);
            err
        })
    }

    fn select_on_container_copy(&self) -> Result<Self> {
        match self.propagation.copy_selection {
            CopySelection::Share => Ok(self.clone()),
            CopySelection::Fresh => self.fresh(),
        }
    }
}

impl<T> Clone for ArenaAllocator<T> {
    fn clone(&self) -> Self {
        self.rebind()
    }
}

impl<T> PartialEq for ArenaAllocator<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.arena, &other.arena)
    }
}

impl<T> Eq for ArenaAllocator<T> {}

impl<T> fmt::Debug for ArenaAllocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaAllocator")
            .field("policy", &self.policy)
            .field("allocated", &self.state.allocated())
            .field("arena", &Rc::as_ptr(&self.arena))
            .finish()
    }
}
