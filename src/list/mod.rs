//! Allocator-aware singly linked list
//!
//! Design: nodes are allocated through the caller's allocator rebound to
//! [`Node<T>`]. O(1) insertion at both ends, O(1) removal at the front.
//! Copy, move and swap consult the allocator's [`PropagationTraits`]:
//! - copy assignment replaces the allocator when `on_copy_assignment`
//! - move assignment replaces it when `on_move_assignment`, otherwise adopts
//!   the node chain only if both allocators compare equal and falls back to
//!   moving element by element
//! - swap needs `on_swap` on both sides or equal allocators
//!
//! Any operation whose allocation fails leaves the list unmodified.
//!
//! [`PropagationTraits`]: crate::allocator::PropagationTraits

mod iter;
mod node;

#[cfg(test)]
mod tests;

use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ptr::NonNull;

pub use iter::{Cursor, IntoIter, Iter, IterMut};
pub use node::Node;

use node::{Link, NodeGuard};

use crate::allocator::{Allocator, Global};
use crate::errors::{AllocError, Result};
use crate::logging;

/// Allocator of `A`'s family serving list nodes
pub type NodeAllocator<T, A> = <A as Allocator>::Rebind<Node<T>>;

/// Singly linked list storing its nodes through an [`Allocator`]
pub struct List<T, A = Global<T>>
where
    A: Allocator<Value = T>,
{
    head: Link<T>,
    tail: Link<T>,
    len: usize,
    alloc: NodeAllocator<T, A>,
    _marker: PhantomData<Box<Node<T>>>,
}

impl<T> List<T> {
    /// Empty list on the system heap
    pub fn new() -> Self {
        Self::new_in(Global::new())
    }
}

impl<T, A> List<T, A>
where
    A: Allocator<Value = T>,
{
    /// Empty list allocating its nodes through `alloc`
    pub fn new_in(alloc: A) -> Self {
        Self::with_node_allocator(alloc.rebind())
    }

    fn with_node_allocator(alloc: NodeAllocator<T, A>) -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Handle for `T` sharing this list's pool and budget
    pub fn allocator(&self) -> <NodeAllocator<T, A> as Allocator>::Rebind<T> {
        self.alloc.rebind()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn front(&self) -> Option<&T> {
        self.head.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.head.map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    pub fn back(&self) -> Option<&T> {
        self.tail.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Insert at the front
    ///
    /// On allocation failure the list is unchanged.
    pub fn push_front(&mut self, value: T) -> Result<()> {
        self.try_push_front_with(|| Ok::<T, AllocError>(value))
    }

    /// Insert at the back
    ///
    /// On allocation failure the list is unchanged.
    pub fn push_back(&mut self, value: T) -> Result<()> {
        self.try_push_back_with(|| Ok::<T, AllocError>(value))
    }

    /// Insert at the front a value built after the node is allocated
    ///
    /// If `make` fails or panics, the node is returned to the allocator
    /// before the failure propagates.
    pub fn try_push_front_with<E, F>(&mut self, make: F) -> core::result::Result<(), E>
    where
        E: From<AllocError>,
        F: FnOnce() -> core::result::Result<T, E>,
    {
        let node = self.create_node(make)?;
        unsafe { (*node.as_ptr()).next = self.head };
        if self.tail.is_none() {
            self.tail = Some(node);
        }
        self.head = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Insert at the back a value built after the node is allocated
    ///
    /// If `make` fails or panics, the node is returned to the allocator
    /// before the failure propagates.
    pub fn try_push_back_with<E, F>(&mut self, make: F) -> core::result::Result<(), E>
    where
        E: From<AllocError>,
        F: FnOnce() -> core::result::Result<T, E>,
    {
        let node = self.create_node(make)?;
        self.link_back(node);
        Ok(())
    }

    /// Remove and return the first element; `None` if empty
    pub fn pop_front(&mut self) -> Option<T> {
        let node = self.head?;
        let Node { value, next } = unsafe { node.as_ptr().read() };

        self.head = next;
        if self.head.is_none() {
            self.tail = None;
        }
        self.len -= 1;

        unsafe { self.alloc.deallocate(node, 1) };
        Some(value)
    }

    /// Remove every element
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.head, self.len)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.head, self.len)
    }

    /// Cursor at the first element (equal to `end()` when empty)
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self.head)
    }

    /// Cursor past the last element
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(None)
    }

    /// Append every item, stopping at the first allocation failure
    ///
    /// Items inserted before the failure stay in the list.
    pub fn try_extend<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        items.into_iter().try_for_each(|item| self.push_back(item))
    }

    /// Take the contents, leaving an empty list on the same allocator
    ///
    /// O(1); no node is allocated or copied.
    pub fn take(&mut self) -> Self {
        let mut taken = Self::with_node_allocator(self.alloc.clone());
        taken.adopt(self);
        taken
    }

    /// Copy construction
    ///
    /// The copy's allocator is chosen by `select_on_container_copy`; each
    /// element is cloned in order.
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
    {
        let alloc = self.alloc.select_on_container_copy()?;
        alloc.check_capacity(self.len())?;

        let mut copy = Self::with_node_allocator(alloc);
        copy.try_extend(self.iter().cloned())?;
        Ok(copy)
    }

    /// Copy assignment
    ///
    /// Replaces this list's allocator with the source's when the
    /// destination propagates on copy assignment. On failure the list keeps
    /// its previous contents and allocator.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<()>
    where
        T: Clone,
    {
        let propagate = self.alloc.propagation().on_copy_assignment
            && !self.alloc.interchangeable(&source.alloc);
        let alloc = if propagate {
            source.alloc.clone()
        } else {
            self.alloc.clone()
        };

        alloc.check_capacity(source.len())?;
        let mut copy = Self::with_node_allocator(alloc);
        copy.try_extend(source.iter().cloned())?;

        if propagate {
            logging::log_allocator_propagated("copy_assignment");
        }
        *self = copy;
        Ok(())
    }

    /// Move construction into a caller-chosen allocator
    ///
    /// Adopts the source's nodes in O(1) if `alloc` equals the source's
    /// allocator; otherwise moves element by element into nodes from
    /// `alloc`. On failure `source` is unchanged.
    pub fn move_from_in(source: &mut Self, alloc: A) -> Result<Self> {
        let mut list = Self::new_in(alloc);
        if list.alloc.interchangeable(&source.alloc) {
            list.adopt(source);
        } else {
            list.transfer_from(source)?;
        }
        Ok(list)
    }

    /// Move assignment
    ///
    /// With `on_move_assignment` the destination takes the source's
    /// allocator and nodes. Without it, nodes are adopted only if both
    /// allocators are equal; otherwise each element is moved into a node
    /// from the destination's allocator and the source is left empty. On
    /// failure both lists are unchanged.
    pub fn move_assign(&mut self, source: &mut Self) -> Result<()> {
        if self.alloc.propagation().on_move_assignment {
            self.clear();
            if !self.alloc.interchangeable(&source.alloc) {
                self.alloc = source.alloc.clone();
                logging::log_allocator_propagated("move_assignment");
            }
            self.adopt(source);
        } else if self.alloc.interchangeable(&source.alloc) {
            self.clear();
            self.adopt(source);
        } else {
            let mut moved = Self::with_node_allocator(self.alloc.clone());
            moved.transfer_from(source)?;
            self.clear();
            self.adopt(&mut moved);
        }
        Ok(())
    }

    /// Exchange contents with `other`
    ///
    /// Allocators are exchanged too when both propagate on swap. Otherwise
    /// the allocators must compare equal, or
    /// [`AllocError::AllocatorMismatch`] is returned and nothing changes.
    pub fn try_swap(&mut self, other: &mut Self) -> Result<()> {
        let propagate = self.alloc.propagation().on_swap && other.alloc.propagation().on_swap;

        if propagate {
            mem::swap(self, other);
            logging::log_allocator_propagated("swap");
        } else if self.alloc.interchangeable(&other.alloc) {
            mem::swap(&mut self.head, &mut other.head);
            mem::swap(&mut self.tail, &mut other.tail);
            mem::swap(&mut self.len, &mut other.len);
        } else {
            return Err(AllocError::AllocatorMismatch);
        }
        Ok(())
    }

    /// Exchange contents with `other`
    ///
    /// # Panics
    ///
    /// Panics if the allocators neither propagate on swap nor compare equal.
    pub fn swap(&mut self, other: &mut Self) {
        if let Err(err) = self.try_swap(other) {
            panic!("cannot swap lists: {}", err);
        }
    }

    fn create_node<E, F>(&self, make: F) -> core::result::Result<NonNull<Node<T>>, E>
    where
        E: From<AllocError>,
        F: FnOnce() -> core::result::Result<T, E>,
    {
        let ptr = self.alloc.allocate(1)?;
        let guard = NodeGuard::new(&self.alloc, ptr);
        let value = make()?;
        Ok(guard.init(value))
    }

    fn link_back(&mut self, node: NonNull<Node<T>>) {
        match self.tail {
            Some(tail) => unsafe { (*tail.as_ptr()).next = Some(node) },
            None => self.head = Some(node),
        }
        self.tail = Some(node);
        self.len += 1;
    }

    /// Take `source`'s node chain; both allocators must be equal
    fn adopt(&mut self, source: &mut Self) {
        debug_assert!(self.is_empty());
        debug_assert!(self.alloc.interchangeable(&source.alloc));

        self.head = source.head.take();
        self.tail = source.tail.take();
        self.len = mem::replace(&mut source.len, 0);
    }

    /// Move elements one by one into nodes from this list's allocator
    ///
    /// The whole budget is checked, then every node is allocated, before the
    /// first element leaves `source`.
    fn transfer_from(&mut self, source: &mut Self) -> Result<()> {
        let alloc = self.alloc.clone();
        alloc.check_capacity(source.len())?;

        let mut reserved = Vec::with_capacity(source.len());
        for _ in 0..source.len() {
            reserved.push(NodeGuard::new(&alloc, alloc.allocate(1)?));
        }

        for guard in reserved {
            match source.pop_front() {
                Some(value) => self.link_back(guard.init(value)),
                None => break,
            }
        }
        Ok(())
    }
}

impl<T, A> Drop for List<T, A>
where
    A: Allocator<Value = T>,
{
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A> Clone for List<T, A>
where
    T: Clone,
    A: Allocator<Value = T>,
{
    /// # Panics
    ///
    /// Panics if the copy cannot be allocated; use [`List::try_clone`] to
    /// handle the failure.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(err) => panic!("list clone failed: {}", err),
        }
    }
}

impl<T, A> PartialEq for List<T, A>
where
    T: PartialEq,
    A: Allocator<Value = T>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T, A> fmt::Debug for List<T, A>
where
    T: fmt::Debug,
    A: Allocator<Value = T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T, A> IntoIterator for &'a List<T, A>
where
    A: Allocator<Value = T>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A> IntoIterator for &'a mut List<T, A>
where
    A: Allocator<Value = T>,
{
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T, A> IntoIterator for List<T, A>
where
    A: Allocator<Value = T>,
{
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter { list: self }
    }
}
