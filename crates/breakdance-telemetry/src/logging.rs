//! Structured logging for Breakdance.
//!
//! Test helpers log through `tracing`; this module wires a
//! `tracing-subscriber` formatter for binaries and test suites that want to
//! see those events.
//!
//! # Example
//!
//! ```rust,ignore
//! use breakdance_telemetry::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(path = "localhost/api/root.json", "Snapshot captured");
//! ```

use breakdance_config::{LogFormat, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Log level or filter directive (e.g., "info", "breakdance_snapshot=debug").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Write to the test-captured writer instead of stdout.
    pub test_writer: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: false,
            file_line_info: false,
            include_target: true,
            test_writer: false,
        }
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            file_line_info: true,
            ..Self::default()
        }
    }

    /// Creates a configuration whose output is captured by `cargo test`.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            level: "debug".to_string(),
            test_writer: true,
            ..Self::default()
        }
    }
}

impl From<&LoggingConfig> for LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            enabled: config.enabled,
            level: config.level.clone(),
            json_format: config.format == LogFormat::Json,
            ..Self::default()
        }
    }
}

/// Initializes the global logging subscriber.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidConfig` for a bad filter directive and
/// `TelemetryError::LoggingInit` if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target);

        if config.test_writer {
            tracing_subscriber::registry()
                .with(fmt_layer.with_test_writer().with_filter(filter))
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(fmt_layer.with_filter(filter))
                .try_init()
        }
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target);

        if config.test_writer {
            tracing_subscriber::registry()
                .with(fmt_layer.with_test_writer().with_filter(filter))
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(fmt_layer.with_filter(filter))
                .try_init()
        }
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}

/// Initializes logging for a test run, ignoring "already initialized".
///
/// Every test can call this; only the first call installs a subscriber.
pub fn init_test_logging() {
    let _ = init_logging(&LogConfig::for_tests());
}

/// Creates an env filter from a string.
///
/// # Errors
///
/// Returns error if the filter string is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| TelemetryError::InvalidConfig(format!("Invalid log level: {e}")))
}
