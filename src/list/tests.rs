//! List tests
//!
//! Test suite organized by component:
//! - Basics: push/pop/clear/iteration on the system heap
//! - Arena: node allocation through a rebound arena allocator
//! - Construction failure: node release when the element cannot be built
//! - Copy: allocator selection and copy assignment
//! - Move: adoption vs element-wise transfer
//! - Swap: propagation and mismatch reporting

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::allocator::{ArenaAllocator, CopySelection, Policy, PropagationTraits};
    use std::cell::Cell;
    use std::rc::Rc;

    fn collect<T: Clone, A: Allocator<Value = T>>(list: &List<T, A>) -> Vec<T> {
        list.iter().cloned().collect()
    }

    fn pinned(policy: Policy) -> ArenaAllocator<i32> {
        ArenaAllocator::new(policy).expect("alloc").with_propagation(PropagationTraits::PINNED)
    }

    /// Counts how many times it has been cloned
    #[derive(Debug)]
    struct Tracked {
        value: i32,
        clones: Rc<Cell<usize>>,
    }

    impl Clone for Tracked {
        fn clone(&self) -> Self {
            self.clones.set(self.clones.get() + 1);
            Self {
                value: self.value,
                clones: Rc::clone(&self.clones),
            }
        }
    }

    // ===== Basics =====

    #[test]
    fn default_constructed_is_empty() {
        let list: List<i32> = List::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.begin() == list.end());
    }

    #[test]
    fn push_front_single() {
        let mut list = List::new();
        list.push_front(42).expect("push");

        assert!(!list.is_empty());
        assert_eq!(list.len(), 1);
        assert_eq!(list.front(), Some(&42));
        assert_eq!(list.back(), Some(&42));
    }

    #[test]
    fn push_front_order() {
        let mut list = List::new();
        for i in 1..=3 {
            list.push_front(i).expect("push");
        }
        assert_eq!(collect(&list), vec![3, 2, 1]);
    }

    #[test]
    fn push_back_order() {
        let mut list = List::new();
        for i in 1..=3 {
            list.push_back(i).expect("push");
        }
        assert_eq!(collect(&list), vec![1, 2, 3]);
    }

    #[test]
    fn mixed_push() {
        let mut list = List::new();
        list.push_back(2).expect("push");
        list.push_front(1).expect("push");
        list.push_back(3).expect("push");

        assert_eq!(collect(&list), vec![1, 2, 3]);
        assert_eq!(list.back(), Some(&3));
    }

    #[test]
    fn push_front_on_empty_sets_tail() {
        let mut list = List::new();
        list.push_front(1).expect("push");
        list.push_back(2).expect("push");
        assert_eq!(collect(&list), vec![1, 2]);
    }

    #[test]
    fn pop_front_basic() {
        let mut list = List::new();
        list.try_extend([1, 2, 3]).expect("extend");

        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.len(), 2);
        assert_eq!(list.front(), Some(&2));
    }

    #[test]
    fn pop_front_until_empty_resets_tail() {
        let mut list = List::new();
        list.push_back(1).expect("push");
        list.pop_front();

        assert!(list.is_empty());
        assert_eq!(list.back(), None);

        list.push_back(5).expect("push after drain");
        assert_eq!(collect(&list), vec![5]);
    }

    #[test]
    fn pop_front_on_empty_is_noop() {
        let mut list: List<i32> = List::new();
        assert_eq!(list.pop_front(), None);
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn clear_empties_list() {
        let mut list = List::new();
        list.try_extend(0..10).expect("extend");

        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.begin() == list.end());
    }

    #[test]
    fn iterator_traversal() {
        let mut list = List::new();
        list.try_extend(1..=5).expect("extend");

        let sum: i32 = list.iter().sum();
        assert_eq!(sum, 15);
        assert_eq!(list.iter().len(), 5);
    }

    #[test]
    fn iterator_is_fused() {
        let mut list = List::new();
        list.push_back(1).expect("push");

        let mut iter = list.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn cursor_stays_at_end() {
        let mut list = List::new();
        list.try_extend([1, 2]).expect("extend");

        let mut cursor = list.begin();
        assert_eq!(cursor.current(), Some(&1));
        cursor.move_next();
        assert_eq!(cursor.current(), Some(&2));
        cursor.move_next();
        assert!(cursor == list.end());

        cursor.move_next();
        assert!(cursor.is_end());
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn iter_mut_updates_in_place() {
        let mut list = List::new();
        list.try_extend([1, 2, 3]).expect("extend");

        for value in &mut list {
            *value *= 10;
        }
        if let Some(front) = list.front_mut() {
            *front += 1;
        }
        assert_eq!(collect(&list), vec![11, 20, 30]);
    }

    #[test]
    fn into_iter_drains_in_order() {
        let mut list = List::new();
        list.try_extend(["a".to_string(), "b".to_string()]).expect("extend");

        let items: Vec<String> = list.into_iter().collect();
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn debug_and_equality() {
        let mut a = List::new();
        a.try_extend([1, 2]).expect("extend");
        let b = a.clone();

        assert_eq!(a, b);
        assert_eq!(format!("{:?}", a), "[1, 2]");
    }

    #[test]
    fn drop_releases_elements() {
        let witness = Rc::new(());
        {
            let mut list = List::new();
            for _ in 0..4 {
                list.push_back(Rc::clone(&witness)).expect("push");
            }
            assert_eq!(Rc::strong_count(&witness), 5);
        }
        assert_eq!(Rc::strong_count(&witness), 1);
    }

    // ===== Arena =====

    #[test]
    fn nodes_come_from_shared_arena() {
        let alloc = ArenaAllocator::<u64>::new(Policy::expandable(16)).expect("alloc");
        let mut list = List::new_in(alloc.clone());

        list.try_extend(0..8).expect("extend");

        assert_eq!(alloc.allocated(), 8);
        assert!(alloc.arena_stats().used_bytes >= 8 * core::mem::size_of::<Node<u64>>());
        assert_eq!(list.allocator(), alloc);
    }

    #[test]
    fn fixed_capacity_rejects_fourth_element() {
        let alloc = ArenaAllocator::<i32>::new(Policy::fixed(3)).expect("alloc");
        let mut list = List::new_in(alloc);

        list.push_back(1).expect("1");
        list.push_back(2).expect("2");
        list.push_back(3).expect("3");

        let err = list.push_back(4).unwrap_err();
        assert!(err.is_capacity_exceeded());
        assert_eq!(list.len(), 3);
        assert_eq!(collect(&list), vec![1, 2, 3]);
    }

    #[test]
    fn popped_nodes_are_not_refunded() {
        let alloc = ArenaAllocator::<i32>::new(Policy::fixed(2)).expect("alloc");
        let mut list = List::new_in(alloc);

        list.push_back(1).expect("1");
        list.pop_front();
        list.push_back(2).expect("2");

        assert!(list.push_back(3).is_err());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn lists_sharing_allocator_share_budget() {
        let alloc = ArenaAllocator::<i32>::new(Policy::fixed(4)).expect("alloc");
        let mut a = List::new_in(alloc.clone());
        let mut b = List::new_in(alloc.clone());

        a.push_back(1).expect("a1");
        b.push_back(2).expect("b1");
        a.push_back(3).expect("a2");
        b.push_back(4).expect("b2");

        assert!(a.push_back(5).is_err());
        assert!(b.push_front(5).is_err());
        assert_eq!(alloc.allocated(), 4);
    }

    #[test]
    fn arena_outlives_original_handle() {
        let alloc = ArenaAllocator::<String>::new(Policy::expandable(2)).expect("alloc");
        let weak = Rc::downgrade(alloc.arena());

        let mut list = List::new_in(alloc);
        list.try_extend((0..10).map(|i| i.to_string())).expect("extend");
        assert!(weak.upgrade().is_some());

        assert_eq!(list.back().map(String::as_str), Some("9"));
        drop(list);
        assert!(weak.upgrade().is_none());
    }

    // ===== Construction failure =====

    #[test]
    fn failed_construction_leaves_list_unchanged() {
        let alloc = ArenaAllocator::<i32>::new(Policy::fixed(4)).expect("alloc");
        let mut list = List::new_in(alloc.clone());
        list.push_back(1).expect("push");

        let result: core::result::Result<(), AllocError> =
            list.try_push_back_with(|| Err(AllocError::InvalidArgument { alignment: 3 }));

        assert!(result.is_err());
        assert_eq!(list.len(), 1);
        assert_eq!(collect(&list), vec![1]);
        // The node was allocated (and released) before the constructor ran
        assert_eq!(alloc.allocated(), 2);
    }

    #[test]
    fn allocation_failure_skips_construction() {
        let alloc = ArenaAllocator::<i32>::new(Policy::fixed(1)).expect("alloc");
        let mut list = List::new_in(alloc);
        list.push_front(1).expect("push");

        let called = Cell::new(false);
        let result = list.try_push_front_with(|| {
            called.set(true);
            Ok::<i32, AllocError>(2)
        });

        assert!(result.unwrap_err().is_capacity_exceeded());
        assert!(!called.get());
    }

    #[test]
    fn panicking_construction_keeps_list_consistent() {
        let mut list = List::new();
        list.push_back(1).expect("push");

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = list.try_push_back_with(|| -> core::result::Result<i32, AllocError> {
                panic!("constructor failed")
            });
        }));

        assert!(outcome.is_err());
        assert_eq!(collect(&list), vec![1]);
    }

    // ===== Copy =====

    #[test]
    fn copy_construction_shares_allocator() {
        let alloc = ArenaAllocator::<i32>::new(Policy::expandable(8)).expect("alloc");
        let mut list = List::new_in(alloc.clone());
        list.try_extend([1, 2, 3]).expect("extend");

        let copy = list.try_clone().expect("clone");

        assert_eq!(collect(&copy), vec![1, 2, 3]);
        assert_eq!(copy.allocator(), alloc);
        assert_eq!(alloc.allocated(), 6);
    }

    #[test]
    fn copy_construction_with_fresh_selection() {
        let traits = PropagationTraits {
            copy_selection: CopySelection::Fresh,
            ..PropagationTraits::SHARED
        };
        let alloc = ArenaAllocator::<i32>::new(Policy::fixed(3))
            .expect("alloc")
            .with_propagation(traits);
        let mut list = List::new_in(alloc.clone());
        list.try_extend([1, 2, 3]).expect("extend");

        // The source's budget is spent; the copy draws from a new one
        let copy = list.try_clone().expect("clone");

        assert_ne!(copy.allocator(), alloc);
        assert_eq!(copy.allocator().allocated(), 3);
        assert_eq!(collect(&copy), vec![1, 2, 3]);
    }

    #[test]
    fn copy_construction_failure_reports_capacity() {
        let alloc = ArenaAllocator::<i32>::new(Policy::fixed(3)).expect("alloc");
        let mut list = List::new_in(alloc.clone());
        list.try_extend([1, 2]).expect("extend");

        assert!(list.try_clone().unwrap_err().is_capacity_exceeded());
        assert_eq!(list.len(), 2);
        assert_eq!(alloc.allocated(), 2);
        list.push_back(3).expect("last slot still free");
    }

    #[test]
    fn copy_assignment_propagates_allocator() {
        let source_alloc = ArenaAllocator::<i32>::new(Policy::expandable(8)).expect("alloc");
        let dest_alloc = ArenaAllocator::<i32>::new(Policy::expandable(8)).expect("alloc");

        let mut source = List::new_in(source_alloc.clone());
        source.try_extend([1, 2]).expect("extend");
        let mut dest = List::new_in(dest_alloc.clone());
        dest.push_back(9).expect("push");

        dest.try_clone_from(&source).expect("assign");

        assert_eq!(collect(&dest), vec![1, 2]);
        assert_eq!(dest.allocator(), source_alloc);
        assert_eq!(dest_alloc.allocated(), 1);
    }

    #[test]
    fn copy_assignment_without_propagation_keeps_allocator() {
        let source_alloc = pinned(Policy::expandable(8));
        let dest_alloc = pinned(Policy::expandable(8));

        let mut source = List::new_in(source_alloc);
        source.try_extend([1, 2]).expect("extend");
        let mut dest = List::new_in(dest_alloc.clone());

        dest.try_clone_from(&source).expect("assign");

        assert_eq!(collect(&dest), vec![1, 2]);
        assert_eq!(dest.allocator(), dest_alloc);
        assert_eq!(dest_alloc.allocated(), 2);
    }

    #[test]
    fn failed_copy_assignment_keeps_contents() {
        let source_alloc = pinned(Policy::expandable(8));
        let dest_alloc = pinned(Policy::fixed(3));

        let mut source = List::new_in(source_alloc);
        source.try_extend([1, 2, 3]).expect("extend");
        let mut dest = List::new_in(dest_alloc.clone());
        dest.push_back(7).expect("push");

        assert!(dest.try_clone_from(&source).unwrap_err().is_capacity_exceeded());
        assert_eq!(collect(&dest), vec![7]);
        assert_eq!(dest_alloc.allocated(), 1);
    }

    // ===== Move =====

    #[test]
    fn move_between_equal_allocators_adopts_nodes() {
        let clones = Rc::new(Cell::new(0));
        let alloc = ArenaAllocator::<Tracked>::new(Policy::expandable(8)).expect("alloc");

        let mut source = List::new_in(alloc.clone());
        for value in 1..=3 {
            source.push_back(Tracked { value, clones: Rc::clone(&clones) }).expect("push");
        }
        let front = source.front().map(|t| t as *const Tracked);
        let allocated = alloc.allocated();

        let mut dest = List::new_in(alloc.clone());
        dest.move_assign(&mut source).expect("move");

        assert!(source.is_empty());
        assert_eq!(dest.iter().map(|t| t.value).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(dest.front().map(|t| t as *const Tracked), front);
        assert_eq!(alloc.allocated(), allocated);
        assert_eq!(clones.get(), 0);
    }

    #[test]
    fn move_assignment_propagates_allocator() {
        let source_alloc = ArenaAllocator::<i32>::new(Policy::expandable(8)).expect("alloc");
        let dest_alloc = ArenaAllocator::<i32>::new(Policy::expandable(8)).expect("alloc");

        let mut source = List::new_in(source_alloc.clone());
        source.try_extend([1, 2, 3]).expect("extend");
        let mut dest = List::new_in(dest_alloc.clone());
        dest.push_back(0).expect("push");

        dest.move_assign(&mut source).expect("move");

        assert_eq!(collect(&dest), vec![1, 2, 3]);
        assert!(source.is_empty());
        assert_eq!(dest.allocator(), source_alloc);
        assert_eq!(source_alloc.allocated(), 3);
        assert_eq!(dest_alloc.allocated(), 1);
    }

    #[test]
    fn move_between_unequal_pinned_allocators_moves_elements() {
        let source_alloc = pinned(Policy::expandable(8));
        let dest_alloc = pinned(Policy::expandable(8));

        let mut source = List::new_in(source_alloc);
        source.try_extend([1, 2, 3]).expect("extend");
        let mut dest = List::new_in(dest_alloc.clone());

        dest.move_assign(&mut source).expect("move");

        assert_eq!(collect(&dest), vec![1, 2, 3]);
        assert!(source.is_empty());
        assert_eq!(dest.allocator(), dest_alloc);
        assert_eq!(dest_alloc.allocated(), 3);
    }

    #[test]
    fn failed_element_wise_move_changes_nothing() {
        let source_alloc = pinned(Policy::expandable(8));
        let dest_alloc = pinned(Policy::fixed(3));

        let mut source = List::new_in(source_alloc);
        source.try_extend([1, 2, 3]).expect("extend");
        let mut dest = List::new_in(dest_alloc.clone());
        dest.push_back(9).expect("push");

        assert!(dest.move_assign(&mut source).unwrap_err().is_capacity_exceeded());
        assert_eq!(collect(&source), vec![1, 2, 3]);
        assert_eq!(collect(&dest), vec![9]);
        assert_eq!(dest_alloc.allocated(), 1);

        // The budget left before the failed move is still there
        dest.push_back(10).expect("push");
        dest.push_back(11).expect("push");
        assert_eq!(collect(&dest), vec![9, 10, 11]);
    }

    #[test]
    fn failed_move_construction_keeps_budget() {
        let source_alloc = ArenaAllocator::<i32>::new(Policy::expandable(8)).expect("alloc");
        let target_alloc = ArenaAllocator::<i32>::new(Policy::fixed(2)).expect("alloc");

        let mut source = List::new_in(source_alloc);
        source.try_extend([1, 2, 3]).expect("extend");

        let err = List::move_from_in(&mut source, target_alloc.clone()).unwrap_err();

        assert_eq!(err, AllocError::CapacityExceeded { requested: 3, allocated: 0, max: 2 });
        assert_eq!(target_alloc.allocated(), 0);
        assert_eq!(collect(&source), vec![1, 2, 3]);
    }

    #[test]
    fn move_construction_into_other_allocator() {
        let source_alloc = ArenaAllocator::<i32>::new(Policy::expandable(8)).expect("alloc");
        let target_alloc = ArenaAllocator::<i32>::new(Policy::expandable(8)).expect("alloc");

        let mut source = List::new_in(source_alloc.clone());
        source.try_extend([4, 5]).expect("extend");

        let moved = List::move_from_in(&mut source, target_alloc.clone()).expect("move");
        assert_eq!(collect(&moved), vec![4, 5]);
        assert!(source.is_empty());
        assert_eq!(target_alloc.allocated(), 2);

        let mut again = moved;
        let adopted = List::move_from_in(&mut again, target_alloc.clone()).expect("move");
        assert_eq!(collect(&adopted), vec![4, 5]);
        assert_eq!(target_alloc.allocated(), 2);
    }

    #[test]
    fn take_is_constant_time_adoption() {
        let alloc = ArenaAllocator::<i32>::new(Policy::fixed(3)).expect("alloc");
        let mut list = List::new_in(alloc.clone());
        list.try_extend([1, 2, 3]).expect("extend");

        let taken = list.take();

        assert_eq!(collect(&taken), vec![1, 2, 3]);
        assert!(list.is_empty());
        assert_eq!(alloc.allocated(), 3);
    }

    // ===== Swap =====

    #[test]
    fn swap_propagates_allocators() {
        let a_alloc = ArenaAllocator::<i32>::new(Policy::expandable(8)).expect("alloc");
        let b_alloc = ArenaAllocator::<i32>::new(Policy::expandable(8)).expect("alloc");

        let mut a = List::new_in(a_alloc.clone());
        a.try_extend([1, 2]).expect("extend");
        let mut b = List::new_in(b_alloc.clone());
        b.push_back(3).expect("push");

        a.swap(&mut b);

        assert_eq!(collect(&a), vec![3]);
        assert_eq!(collect(&b), vec![1, 2]);
        assert_eq!(a.allocator(), b_alloc);
        assert_eq!(b.allocator(), a_alloc);
    }

    #[test]
    fn swap_with_equal_pinned_allocators() {
        let alloc = pinned(Policy::expandable(8));
        let mut a = List::new_in(alloc.clone());
        a.push_back(1).expect("push");
        let mut b = List::new_in(alloc);
        b.try_extend([2, 3]).expect("extend");

        a.try_swap(&mut b).expect("swap");

        assert_eq!(collect(&a), vec![2, 3]);
        assert_eq!(collect(&b), vec![1]);
    }

    #[test]
    fn swap_with_unequal_pinned_allocators_is_rejected() {
        let mut a = List::new_in(pinned(Policy::expandable(8)));
        a.push_back(1).expect("push");
        let mut b = List::new_in(pinned(Policy::expandable(8)));
        b.push_back(2).expect("push");

        assert_eq!(a.try_swap(&mut b), Err(AllocError::AllocatorMismatch));
        assert_eq!(collect(&a), vec![1]);
        assert_eq!(collect(&b), vec![2]);
    }

    #[test]
    #[should_panic(expected = "cannot swap lists")]
    fn swap_panics_on_mismatch() {
        let mut a: List<i32, _> = List::new_in(pinned(Policy::expandable(8)));
        let mut b = List::new_in(pinned(Policy::expandable(8)));
        a.swap(&mut b);
    }

    #[test]
    fn global_lists_always_swap() {
        let mut a = List::new();
        a.push_back(1).expect("push");
        let mut b = List::new();

        a.try_swap(&mut b).expect("swap");
        assert!(a.is_empty());
        assert_eq!(collect(&b), vec![1]);
    }
}
