//! Allocator interface consumed by allocator-aware containers
//!
//! Design: a container is generic over an [`Allocator`] for its element
//! type and rebinds it to its own node type. Copy, move and swap decisions
//! are driven by the handle's [`PropagationTraits`].

use core::ptr::NonNull;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// How a container picks the allocator for a copy of itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopySelection {
    /// The copy shares the source's allocator
    #[default]
    Share,
    /// The copy gets a new, unrelated allocator with the same configuration
    Fresh,
}

/// Propagation table consulted by container copy/move/swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationTraits {
    /// Copy assignment replaces the destination's allocator
    pub on_copy_assignment: bool,
    /// Move assignment replaces the destination's allocator
    pub on_move_assignment: bool,
    /// Swap exchanges allocators along with contents
    pub on_swap: bool,
    /// Allocator choice for copy construction
    pub copy_selection: CopySelection,
}

impl PropagationTraits {
    /// Stateful, shared allocator: propagate everywhere, compare by identity
    pub const SHARED: Self = Self {
        on_copy_assignment: true,
        on_move_assignment: true,
        on_swap: true,
        copy_selection: CopySelection::Share,
    };

    /// Stateful allocator that stays with its container
    pub const PINNED: Self = Self {
        on_copy_assignment: false,
        on_move_assignment: false,
        on_swap: false,
        copy_selection: CopySelection::Fresh,
    };

    /// Stateless allocator: nothing to carry, copies share nothing
    pub const STATELESS: Self = Self {
        on_copy_assignment: false,
        on_move_assignment: false,
        on_swap: false,
        copy_selection: CopySelection::Share,
    };
}

impl Default for PropagationTraits {
    fn default() -> Self {
        Self::SHARED
    }
}

/// Typed allocation front-end
///
/// Equality (`PartialEq`) is identity: two handles are equal iff memory
/// allocated through one may be deallocated through the other.
pub trait Allocator: Clone + PartialEq {
    /// Every instance compares equal regardless of state
    ///
    /// A property of the allocator type, not of a handle's propagation table.
    const ALWAYS_EQUAL: bool = false;

    /// Element type served by this handle
    type Value;

    /// The same allocator family serving `U`
    type Rebind<U>: Allocator<Value = U>;

    /// Allocate uninitialized storage for `n` values
    fn allocate(&self, n: usize) -> Result<NonNull<Self::Value>>;

    /// Release storage previously returned by `allocate(n)`
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate(n)` on this handle or one equal to it,
    /// and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<Self::Value>, n: usize);

    /// Handle for another element type sharing this handle's pool and budget
    fn rebind<U>(&self) -> Self::Rebind<U>;

    /// Propagation table for containers using this handle
    fn propagation(&self) -> PropagationTraits;

    /// Check that `n` more values fit this handle's budget without
    /// allocating or recording anything
    fn check_capacity(&self, _n: usize) -> Result<()> {
        Ok(())
    }

    /// Whether memory from `other` may be released through `self`
    fn interchangeable(&self, other: &Self) -> bool {
        Self::ALWAYS_EQUAL || self == other
    }

    /// Allocator a container copy should use
    fn select_on_container_copy(&self) -> Result<Self> {
        Ok(self.clone())
    }
}
