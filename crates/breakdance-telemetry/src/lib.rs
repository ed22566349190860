//! Logging and counters for Breakdance.
//!
//! - **Logging**: `tracing-subscriber` setup with pretty or JSON output,
//!   driven by [`breakdance_config::LoggingConfig`]
//! - **Metrics**: counters for snapshot capture/replay and surface reports
//!   through the `metrics` facade
//!
//! # Example
//!
//! ```rust,ignore
//! use breakdance_config::BreakdanceConfig;
//! use breakdance_telemetry::{init_logging, LogConfig};
//!
//! let config = BreakdanceConfig::default();
//! init_logging(&LogConfig::from(&config.logging))?;
//! ```

#![doc(html_root_url = "https://docs.rs/breakdance-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, init_test_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
