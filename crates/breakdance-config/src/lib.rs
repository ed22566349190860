//! Typed configuration for Breakdance.
//!
//! This crate provides a strongly-typed configuration system shared by the
//! Breakdance crates, with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`BreakdanceConfig`] contains three sections:
//!
//! - [`SurfaceConfig`] - public API surface report options
//! - [`SnapshotConfig`] - HTTP response snapshot location, path limit, retries
//! - [`LoggingConfig`] - log level and format
//!
//! # Example
//!
//! ```no_run
//! use breakdance_config::ConfigLoader;
//!
//! # fn main() -> Result<(), breakdance_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("breakdance.toml")?
//!     .with_env_prefix("BREAKDANCE")
//!     .load()?;
//!
//! println!("Snapshots live under {}", config.snapshot.root.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [surface]
//! group_by_category = true
//! property_rendering = "accessors"
//! include_inherited = false
//! exclusion_attributes = ["System.Runtime.CompilerServices.CompilerGeneratedAttribute"]
//!
//! [snapshot]
//! root = "tests/responses"
//! max_path_length = 260
//! retry_attempts = 5
//! retry_initial_delay_ms = 50
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "pretty"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `PREFIX__SECTION__KEY` variables:
//!
//! - `BREAKDANCE__SNAPSHOT__ROOT=/tmp/responses`
//! - `BREAKDANCE__SURFACE__PROPERTY_RENDERING=declaration`
//! - `BREAKDANCE__LOGGING__LEVEL=debug`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::*;
