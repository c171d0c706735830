//! arena-alloc - arena-backed allocation for allocator-aware containers
//!
//! This crate provides:
//! - [`ArenaAllocator`]: a shared, policy-configurable handle over a bump arena
//! - [`Global`]: a stateless allocator over the system heap
//! - [`List`]: a singly linked list storing its nodes through either one
//!
//! ```
//! use arena_alloc::{ArenaAllocator, List, Policy};
//!
//! let alloc = ArenaAllocator::<i32>::new(Policy::fixed(3)).unwrap();
//! let mut list = List::new_in(alloc.clone());
//! list.push_back(1).unwrap();
//! list.push_back(2).unwrap();
//! list.push_back(3).unwrap();
//!
//! assert!(list.push_back(4).unwrap_err().is_capacity_exceeded());
//! assert_eq!(alloc.allocated(), 3);
//! ```

pub mod allocator;
pub mod config;
pub mod errors;
pub mod list;
pub mod logging;

// Re-export commonly used items
pub use allocator::{Allocator, ArenaAllocator, CopySelection, Global, Policy, PropagationTraits};
pub use config::AllocatorConfig;
pub use errors::{AllocError, ConfigError, Result};
pub use list::List;
