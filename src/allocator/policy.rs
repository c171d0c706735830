//! Capacity policies
//!
//! `Fixed` enforces a hard element limit; `Expandable` enforces none and lets
//! the arena grow. Both provision the arena with `initial` elements' worth of
//! bytes up front.

use serde::{Deserialize, Serialize};

/// Initial element capacity used by `Policy::default()`
pub const DEFAULT_INITIAL: usize = 1024;

/// Capacity policy of an allocator family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Policy {
    /// At most `max` elements may ever be allocated
    Fixed {
        max: usize,
        #[serde(default)]
        initial: Option<usize>,
    },

    /// No logical limit
    Expandable {
        #[serde(default = "default_initial")]
        initial: usize,
    },
}

fn default_initial() -> usize {
    DEFAULT_INITIAL
}

impl Policy {
    /// Fixed limit with the arena provisioned for all `max` elements
    pub const fn fixed(max: usize) -> Self {
        Self::Fixed {
            max,
            initial: None,
        }
    }

    /// Fixed limit with a smaller (or larger) initial provision
    pub const fn fixed_with_initial(max: usize, initial: usize) -> Self {
        Self::Fixed {
            max,
            initial: Some(initial),
        }
    }

    pub const fn expandable(initial: usize) -> Self {
        Self::Expandable { initial }
    }

    /// Element limit, 0 meaning unlimited
    pub const fn max_elements(&self) -> usize {
        match *self {
            Self::Fixed { max, .. } => max,
            Self::Expandable { .. } => 0,
        }
    }

    /// Elements the arena is provisioned for at construction
    pub const fn initial(&self) -> usize {
        match *self {
            Self::Fixed { max, initial } => match initial {
                Some(initial) => initial,
                None => max,
            },
            Self::Expandable { initial } => initial,
        }
    }

    pub const fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed { .. })
    }

    /// Bytes to provision for `initial` elements of `elem_size` bytes
    ///
    /// Saturates rather than overflowing; the arena reports the failure
    /// when it tries to acquire that much memory.
    pub const fn initial_bytes(&self, elem_size: usize) -> usize {
        self.initial().saturating_mul(elem_size)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::expandable(DEFAULT_INITIAL)
    }
}
