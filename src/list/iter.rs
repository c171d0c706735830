//! Forward iteration over a `List`
//!
//! All iterators are fused: once the end is reached, `next` keeps returning
//! `None`.

use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use super::node::{Link, Node};
use super::List;
use crate::allocator::Allocator;

/// Shared iterator over list elements
pub struct Iter<'a, T> {
    next: Link<T>,
    remaining: usize,
    _marker: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(head: Link<T>, len: usize) -> Self {
        Self {
            next: head,
            remaining: len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.next.map(|node| {
            let node = unsafe { &*node.as_ptr() };
            self.next = node.next;
            self.remaining -= 1;
            &node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            next: self.next,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

/// Mutable iterator over list elements
pub struct IterMut<'a, T> {
    next: Link<T>,
    remaining: usize,
    _marker: PhantomData<&'a mut Node<T>>,
}

impl<'a, T> IterMut<'a, T> {
    pub(super) fn new(head: Link<T>, len: usize) -> Self {
        Self {
            next: head,
            remaining: len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        self.next.map(|node| {
            let node = unsafe { &mut *node.as_ptr() };
            self.next = node.next;
            self.remaining -= 1;
            &mut node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator, popping from the front
pub struct IntoIter<T, A>
where
    A: Allocator<Value = T>,
{
    pub(super) list: List<T, A>,
}

impl<T, A> Iterator for IntoIter<T, A>
where
    A: Allocator<Value = T>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T, A> ExactSizeIterator for IntoIter<T, A> where A: Allocator<Value = T> {}
impl<T, A> FusedIterator for IntoIter<T, A> where A: Allocator<Value = T> {}

/// Position in a list, comparable with `==`
///
/// The end position is reached after the last element. Advancing an end
/// cursor leaves it at the end; reading it yields `None`.
pub struct Cursor<'a, T> {
    current: Link<T>,
    _marker: PhantomData<&'a Node<T>>,
}

impl<'a, T> Cursor<'a, T> {
    pub(super) fn new(current: Link<T>) -> Self {
        Self {
            current,
            _marker: PhantomData,
        }
    }

    /// Element at this position, or None at the end
    pub fn current(&self) -> Option<&'a T> {
        self.current.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Advance to the next position; no-op at the end
    pub fn move_next(&mut self) {
        if let Some(node) = self.current {
            self.current = unsafe { (*node.as_ptr()).next };
        }
    }

    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.current()).finish()
    }
}
