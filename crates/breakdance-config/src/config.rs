//! Main configuration types.
//!
//! This module provides the top-level [`BreakdanceConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{LogFormat, LoggingConfig, SnapshotConfig, SurfaceConfig};

/// Complete Breakdance configuration.
///
/// This is the root configuration type that contains all configuration sections.
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use breakdance_config::BreakdanceConfig;
///
/// let config = BreakdanceConfig::default();
/// assert_eq!(config.snapshot.max_path_length, 260);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct BreakdanceConfig {
    /// Public API surface report configuration.
    #[serde(default)]
    pub surface: SurfaceConfig,

    /// HTTP response snapshot configuration.
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BreakdanceConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use breakdance_config::{BreakdanceConfig, SnapshotConfig};
    ///
    /// let config = BreakdanceConfig::builder()
    ///     .snapshot(SnapshotConfig {
    ///         root: "fixtures/responses".into(),
    ///         ..Default::default()
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.snapshot.root.to_str(), Some("fixtures/responses"));
    /// ```
    #[must_use]
    pub fn builder() -> BreakdanceConfigBuilder {
        BreakdanceConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The snapshot root is empty
    /// - `max_path_length` or `retry_attempts` is zero
    /// - Logging is enabled with an empty level
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        if self.snapshot.root.as_os_str().is_empty() {
            return Err(crate::ConfigError::invalid_value(
                "snapshot.root",
                "must not be empty",
            ));
        }

        if self.snapshot.max_path_length == 0 {
            return Err(crate::ConfigError::invalid_value(
                "snapshot.max_path_length",
                "must be greater than zero",
            ));
        }

        if self.snapshot.retry_attempts == 0 {
            return Err(crate::ConfigError::invalid_value(
                "snapshot.retry_attempts",
                "at least one attempt is required",
            ));
        }

        if self.logging.enabled && self.logging.level.trim().is_empty() {
            return Err(crate::ConfigError::validation_error(
                "logging.level must be set when logging is enabled",
            ));
        }

        if self
            .surface
            .exclusion_attributes
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err(crate::ConfigError::invalid_value(
                "surface.exclusion_attributes",
                "attribute names must not be empty",
            ));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Debug-level pretty logs; everything else at defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use breakdance_config::BreakdanceConfig;
    ///
    /// let config = BreakdanceConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config
    }

    /// Create a CI configuration preset.
    ///
    /// JSON logs at info level, suitable for build agents running test
    /// assemblies in parallel.
    ///
    /// # Example
    ///
    /// ```
    /// use breakdance_config::{BreakdanceConfig, LogFormat};
    ///
    /// let config = BreakdanceConfig::ci();
    /// assert_eq!(config.logging.format, LogFormat::Json);
    /// ```
    #[must_use]
    pub fn ci() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config
    }
}

/// Builder for [`BreakdanceConfig`].
#[derive(Debug, Default)]
pub struct BreakdanceConfigBuilder {
    surface: Option<SurfaceConfig>,
    snapshot: Option<SnapshotConfig>,
    logging: Option<LoggingConfig>,
}

impl BreakdanceConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the surface report configuration.
    #[must_use]
    pub fn surface(mut self, surface: SurfaceConfig) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Set the snapshot configuration.
    #[must_use]
    pub fn snapshot(mut self, snapshot: SnapshotConfig) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration.
    ///
    /// Any unset sections will use their default values.
    #[must_use]
    pub fn build(self) -> BreakdanceConfig {
        BreakdanceConfig {
            surface: self.surface.unwrap_or_default(),
            snapshot: self.snapshot.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<BreakdanceConfig, crate::ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PropertyRendering;

    #[test]
    fn test_default_config_is_valid() {
        let config = BreakdanceConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.surface.group_by_category);
        assert_eq!(config.snapshot.retry_attempts, 5);
    }

    #[test]
    fn test_builder_all_sections() {
        let config = BreakdanceConfig::builder()
            .surface(SurfaceConfig {
                property_rendering: PropertyRendering::Declaration,
                ..Default::default()
            })
            .snapshot(SnapshotConfig {
                max_path_length: 4096,
                ..Default::default()
            })
            .logging(LoggingConfig {
                level: "warn".to_string(),
                ..Default::default()
            })
            .build();

        assert_eq!(
            config.surface.property_rendering,
            PropertyRendering::Declaration
        );
        assert_eq!(config.snapshot.max_path_length, 4096);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_validate_rejects_zero_path_length() {
        let result = BreakdanceConfig::builder()
            .snapshot(SnapshotConfig {
                max_path_length: 0,
                ..Default::default()
            })
            .build_validated();

        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = BreakdanceConfig::default();
        config.snapshot.retry_attempts = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("snapshot.retry_attempts"));
    }

    #[test]
    fn test_validate_allows_empty_level_when_logging_disabled() {
        let mut config = BreakdanceConfig::default();
        config.logging.enabled = false;
        config.logging.level = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(BreakdanceConfig::development().logging.level, "debug");
        assert_eq!(BreakdanceConfig::ci().logging.format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<BreakdanceConfig, _> = toml::from_str("[server]\nport = 1");
        assert!(result.is_err());
    }
}
