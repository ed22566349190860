//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How properties appear in a public API surface report.
///
/// Existing baselines differ on this point, so the choice is explicit:
/// either the property shows up through its accessor methods
/// (`get_Name`/`set_Name`) or as a single declaration line.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PropertyRendering {
    /// Suppress the property line and report the getter/setter methods.
    #[default]
    Accessors,
    /// Report one `Type Name { get; set; }` line and no accessor methods.
    Declaration,
}

/// Public API surface report configuration section.
///
/// # Example
///
/// ```
/// use breakdance_config::{PropertyRendering, SurfaceConfig};
///
/// let config = SurfaceConfig {
///     property_rendering: PropertyRendering::Declaration,
///     ..Default::default()
/// };
/// assert!(config.group_by_category);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SurfaceConfig {
    /// Group types in the same namespace by category (enums, structs,
    /// interfaces, abstract, plain, sealed) before ordering by name.
    #[serde(default = "default_true")]
    pub group_by_category: bool,

    /// How properties are rendered.
    #[serde(default)]
    pub property_rendering: PropertyRendering,

    /// Include members inherited from base types declared in the same assembly.
    #[serde(default)]
    pub include_inherited: bool,

    /// Attribute full names that exclude a member from the report.
    #[serde(default = "default_exclusion_attributes")]
    pub exclusion_attributes: Vec<String>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            group_by_category: true,
            property_rendering: PropertyRendering::default(),
            include_inherited: false,
            exclusion_attributes: default_exclusion_attributes(),
        }
    }
}

fn default_exclusion_attributes() -> Vec<String> {
    vec!["System.Runtime.CompilerServices.CompilerGeneratedAttribute".to_string()]
}

/// HTTP response snapshot configuration section.
///
/// # Example
///
/// ```
/// use breakdance_config::SnapshotConfig;
///
/// let config = SnapshotConfig::default();
/// assert_eq!(config.max_path_length, 260);
/// assert_eq!(config.retry_attempts, 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SnapshotConfig {
    /// Root folder of the snapshot file tree.
    #[serde(default = "default_snapshot_root")]
    pub root: PathBuf,

    /// Longest allowed absolute snapshot path, in characters.
    #[serde(default = "default_max_path_length")]
    pub max_path_length: usize,

    /// Total number of write attempts before an I/O error surfaces.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Delay before the first retry; doubles after every failed attempt.
    #[serde(default = "default_retry_initial_delay_ms")]
    pub retry_initial_delay_ms: u64,
}

impl SnapshotConfig {
    /// Returns the initial retry delay as a [`Duration`].
    #[must_use]
    pub fn retry_initial_delay(&self) -> Duration {
        Duration::from_millis(self.retry_initial_delay_ms)
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            root: default_snapshot_root(),
            max_path_length: default_max_path_length(),
            retry_attempts: default_retry_attempts(),
            retry_initial_delay_ms: default_retry_initial_delay_ms(),
        }
    }
}

fn default_snapshot_root() -> PathBuf {
    PathBuf::from("snapshots")
}

fn default_max_path_length() -> usize {
    260
}

fn default_retry_attempts() -> u32 {
    5
}

fn default_retry_initial_delay_ms() -> u64 {
    50
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable pretty format.
    #[default]
    Pretty,
    /// JSON formatted logs.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive (e.g. "info", "breakdance_snapshot=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_defaults() {
        let config = SurfaceConfig::default();
        assert!(config.group_by_category);
        assert!(!config.include_inherited);
        assert_eq!(config.property_rendering, PropertyRendering::Accessors);
        assert_eq!(config.exclusion_attributes.len(), 1);
    }

    #[test]
    fn test_snapshot_defaults() {
        let config = SnapshotConfig::default();
        assert_eq!(config.root, PathBuf::from("snapshots"));
        assert_eq!(config.retry_initial_delay(), Duration::from_millis(50));
    }

    #[test]
    fn test_property_rendering_serde() {
        let rendering: PropertyRendering = serde_json::from_str("\"declaration\"").unwrap();
        assert_eq!(rendering, PropertyRendering::Declaration);
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: SnapshotConfig = toml::from_str("root = \"fixtures\"").unwrap();
        assert_eq!(config.root, PathBuf::from("fixtures"));
        assert_eq!(config.max_path_length, 260);
    }
}
