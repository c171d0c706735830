//! Error types for allocation, container and configuration failures

use thiserror::Error;

/// Result type for allocation operations
pub type Result<T> = std::result::Result<T, AllocError>;

/// Allocation failure reported by arenas, allocator handles and containers
///
/// Every variant is terminal for the call that produced it: nothing is
/// retried and no shared accounting is touched on the failing path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// Requested alignment is zero or not a power of two
    #[error("alignment {alignment} is not a power of two")]
    InvalidArgument {
        /// The rejected alignment
        alignment: usize,
    },

    /// A fixed-capacity policy has no room left for the request
    #[error("capacity exceeded: {requested} requested, {allocated}/{max} allocated")]
    CapacityExceeded {
        /// Elements requested by the failing call
        requested: usize,
        /// Elements counted against the budget before the call
        allocated: usize,
        /// Configured element limit
        max: usize,
    },

    /// The system allocator could not provide a new buffer
    ///
    /// Carries the request that could not be served: the caller's bytes and
    /// alignment, or the first block when an arena is created.
    #[error("out of memory: failed to acquire {size} bytes aligned to {align}")]
    OutOfMemory {
        /// Bytes requested
        size: usize,
        /// Alignment requested
        align: usize,
    },

    /// The byte size of an element request does not fit in `usize`
    #[error("allocation size overflow: {count} element(s) of {elem_size} bytes")]
    SizeOverflow {
        /// Element count
        count: usize,
        /// Size of one element in bytes
        elem_size: usize,
    },

    /// Two containers with unequal, non-propagating allocators were combined
    #[error("allocators are unequal and do not propagate")]
    AllocatorMismatch,
}

impl AllocError {
    /// Whether this failure comes from a logical budget rather than the system
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }
}

/// Failure to load or validate an [`AllocatorConfig`](crate::config::AllocatorConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but describes an impossible allocator
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = AllocError::InvalidArgument { alignment: 3 };
        assert_eq!(err.to_string(), "alignment 3 is not a power of two");

        let err = AllocError::CapacityExceeded { requested: 1, allocated: 3, max: 3 };
        assert!(err.to_string().contains("3/3"));
        assert!(err.is_capacity_exceeded());

        let err = AllocError::OutOfMemory { size: 64, align: 8 };
        assert!(!err.is_capacity_exceeded());
    }

    #[test]
    fn test_config_error_from_parse() {
        let parse_err = toml::from_str::<toml::Value>("not = = toml").unwrap_err();
        let err: ConfigError = parse_err.into();
        assert!(err.to_string().starts_with("failed to parse config"));
    }
}
