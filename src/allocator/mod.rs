//! Memory allocator - arena-backed bump allocation behind a shared handle
//!
//! Design: Three-layer architecture:
//! 1. Block bump allocation (fast path, pointer arithmetic only)
//! 2. Arena management (slow path, appends a block on demand)
//! 3. Allocator handle (policy check, shared accounting, typed pointers)
//!
//! Single-threaded by construction: handles share state through `Rc`.

mod arena;
mod block;
mod global;
mod handle;
mod policy;
mod state;
mod traits;


pub use arena::{Arena, ArenaStats};
pub use block::{align_up, is_power_of_two, Block};
pub use global::Global;
pub use handle::ArenaAllocator;
pub use policy::{Policy, DEFAULT_INITIAL};
pub use state::AllocationState;
pub use traits::{Allocator, CopySelection, PropagationTraits};
