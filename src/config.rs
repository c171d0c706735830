//! Allocator configuration loaded from TOML
//!
//! ```toml
//! block_size = 4096
//!
//! [policy]
//! kind = "fixed"
//! max = 128
//!
//! [propagation]
//! on_swap = true
//! copy_selection = "share"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::allocator::{Policy, PropagationTraits};
use crate::errors::ConfigError;

/// File name searched for by [`AllocatorConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "arena-alloc.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatorConfig {
    /// Capacity policy of the allocator family
    #[serde(default)]
    pub policy: Policy,

    /// Container propagation table
    #[serde(default)]
    pub propagation: PropagationTraits,

    /// Default arena block size in bytes; derived from the policy when absent
    #[serde(default)]
    pub block_size: Option<usize>,
}

impl AllocatorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Find and load configuration from the current directory or its parents
    ///
    /// Unreadable or invalid files are skipped; defaults are returned when
    /// nothing usable is found.
    pub fn discover() -> Self {
        let mut current = std::env::current_dir().ok();

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(err) => tracing::warn!(
                        target: crate::logging::TARGET,
                        path = %config_path.display(),
                        error = %err,
                        "ignoring config file"
                    ),
                }
            }

            current = dir.parent().map(|p| p.to_path_buf());
        }

        Self::default()
    }

    /// Reject configurations no allocator can honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Policy::Fixed { max, initial } = self.policy {
            if max == 0 {
                return Err(ConfigError::Invalid("fixed policy requires max > 0".to_string()));
            }
            if initial.is_some_and(|initial| initial > max) {
                return Err(ConfigError::Invalid(format!(
                    "fixed policy initial ({}) exceeds max ({})",
                    self.policy.initial(),
                    max
                )));
            }
        }
        Ok(())
    }
}
