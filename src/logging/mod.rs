//! Logging infrastructure - structured tracing for allocation events
//!
//! Design: Uses `tracing` for structured, contextual logging with:
//! - Configurable log levels via environment
//! - Zero-cost when no subscriber is installed
//! - Console or file output, human-readable or JSON
//!
//! The library only emits events; installing a subscriber is left to the
//! embedding program through [`init`] or [`init_with_config`].

use once_cell::sync::OnceCell;
use std::io;
use std::path::Path;
use tracing::{debug, error, trace, warn, Level};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::errors::AllocError;

/// Target used by every event emitted from this crate
pub const TARGET: &str = "arena_alloc";

/// Global logging state
static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default log level
    pub level: Level,
    /// Enable file logging
    pub file_output: bool,
    /// Log file path (if file_output enabled)
    pub log_path: Option<String>,
    /// Enable JSON format (vs human-readable)
    pub json_format: bool,
    /// Show span events (enter/exit)
    pub show_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            file_output: false,
            log_path: None,
            json_format: false,
            show_spans: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // ARENA_ALLOC_LOG_LEVEL: trace, debug, info, warn, error
        if let Ok(level_str) = std::env::var("ARENA_ALLOC_LOG_LEVEL") {
            config.level = parse_level(&level_str);
        }

        // ARENA_ALLOC_LOG_FILE: path to log file
        if let Ok(path) = std::env::var("ARENA_ALLOC_LOG_FILE") {
            config.file_output = true;
            config.log_path = Some(path);
        }

        config.json_format = std::env::var("ARENA_ALLOC_LOG_JSON").is_ok();
        config.show_spans = std::env::var("ARENA_ALLOC_LOG_SPANS").is_ok();

        config
    }

    /// Errors only
    pub fn quiet() -> Self {
        Self {
            level: Level::ERROR,
            ..Self::default()
        }
    }

    /// Every allocation event
    pub fn verbose() -> Self {
        Self {
            level: Level::TRACE,
            show_spans: true,
            ..Self::default()
        }
    }
}

fn parse_level(value: &str) -> Level {
    match value.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initialize logging with configuration from the environment
pub fn init() {
    init_with_config(LogConfig::from_env());
}

/// Initialize logging with custom configuration
///
/// Only the first call installs a subscriber; later calls are ignored, as
/// is a failure because another subscriber is already installed globally.
pub fn init_with_config(config: LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", TARGET, config.level.as_str().to_lowercase()))
        });

        let span_events = if config.show_spans {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let file = config
            .log_path
            .as_deref()
            .filter(|_| config.file_output)
            .map(Path::new)
            .and_then(|path| {
                let dir = path
                    .parent()
                    .filter(|d| !d.as_os_str().is_empty())
                    .unwrap_or(Path::new("."));
                path.file_name().map(|name| tracing_appender::rolling::never(dir, name))
            });

        let layer = match (file, config.json_format) {
            (Some(writer), true) => fmt::layer()
                .json()
                .with_writer(writer)
                .with_span_events(span_events)
                .boxed(),
            (Some(writer), false) => fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_span_events(span_events)
                .boxed(),
            (None, true) => fmt::layer()
                .json()
                .with_writer(io::stdout)
                .with_span_events(span_events)
                .boxed(),
            (None, false) => fmt::layer()
                .with_writer(io::stdout)
                .with_span_events(span_events)
                .with_target(true)
                .with_line_number(cfg!(debug_assertions))
                .boxed(),
        };

        let _ = tracing_subscriber::registry().with(env_filter).with(layer).try_init();
    });
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}

// ============================================================================
// Allocation events
// ============================================================================

/// Log a block appended to an arena
pub fn log_block_appended(index: usize, capacity: usize) {
    debug!(
        target: TARGET,
        event = "block_appended",
        block = index,
        capacity_bytes = capacity,
        "arena block appended"
    );
}

/// Log bytes carved from the current block
#[inline]
pub fn log_bytes_carved(size: usize, align: usize, ptr: *const u8) {
    trace!(
        target: TARGET,
        event = "bytes_carved",
        size_bytes = size,
        align,
        address = ?ptr,
        "bytes carved"
    );
}

/// Log elements counted against an allocation budget
#[inline]
pub fn log_elements_allocated(n: usize, allocated: usize, max: usize) {
    trace!(
        target: TARGET,
        event = "elements_allocated",
        count = n,
        allocated,
        max,
        "elements allocated"
    );
}

/// Log a rejected request under a fixed policy
pub fn log_capacity_exceeded(err: &AllocError) {
    warn!(target: TARGET, event = "capacity_exceeded", error = %err, "allocation refused");
}

/// Log a request with an unusable alignment
pub fn log_invalid_alignment(alignment: usize) {
    warn!(target: TARGET, event = "invalid_alignment", alignment, "allocation refused");
}

/// Log a failure of the system allocator
pub fn log_system_failure(err: &AllocError) {
    error!(target: TARGET, event = "system_failure", error = %err, "system allocation failed");
}

/// Log a container adopting another allocator
pub fn log_allocator_propagated(operation: &'static str) {
    debug!(
        target: TARGET,
        event = "allocator_propagated",
        operation,
        "container allocator replaced"
    );
}
