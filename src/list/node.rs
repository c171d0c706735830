use core::ptr::NonNull;

use crate::allocator::Allocator;

/// Link to the next node; `None` marks end-of-sequence
pub(crate) type Link<T> = Option<NonNull<Node<T>>>;

/// List node as seen by the allocator
///
/// Lives in memory obtained from the list's rebound allocator.
pub struct Node<T> {
    pub(crate) value: T,
    pub(crate) next: Link<T>,
}

/// Returns an allocated but not yet initialized node to its allocator
///
/// Armed between allocation and element construction so that a failing or
/// panicking constructor never leaks the node.
pub(crate) struct NodeGuard<'a, T, N>
where
    N: Allocator<Value = Node<T>>,
{
    alloc: &'a N,
    ptr: NonNull<Node<T>>,
}

impl<'a, T, N> NodeGuard<'a, T, N>
where
    N: Allocator<Value = Node<T>>,
{
    pub(crate) fn new(alloc: &'a N, ptr: NonNull<Node<T>>) -> Self {
        Self { alloc, ptr }
    }

    /// Initialize the node and disarm the guard
    pub(crate) fn init(self, value: T) -> NonNull<Node<T>> {
        let ptr = self.ptr;
        core::mem::forget(self);
        unsafe { ptr.as_ptr().write(Node { value, next: None }) };
        ptr
    }
}

impl<T, N> Drop for NodeGuard<'_, T, N>
where
    N: Allocator<Value = Node<T>>,
{
    fn drop(&mut self) {
        unsafe { self.alloc.deallocate(self.ptr, 1) };
    }
}
