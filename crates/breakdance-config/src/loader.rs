//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: defaults, files, and environment variables.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{BreakdanceConfig, ConfigError, LogFormat, PropertyRendering};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "BREAKDANCE";

/// Configuration loader with layered approach.
///
/// The loader applies configuration in layers, with later layers overriding
/// earlier ones:
/// 1. Default values (built into the code)
/// 2. Configuration file (TOML or JSON)
/// 3. Environment variables
///
/// # Example
///
/// ```no_run
/// use breakdance_config::ConfigLoader;
///
/// # fn main() -> Result<(), breakdance_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_file("breakdance.toml")?
///     .with_env_prefix("BREAKDANCE")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: BreakdanceConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: BreakdanceConfig::default(),
            env_prefix: None,
        }
    }

    /// Start with development preset configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use breakdance_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_development()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = BreakdanceConfig::development();
        self
    }

    /// Start with CI preset configuration.
    #[must_use]
    pub fn with_ci(mut self) -> Self {
        self.config = BreakdanceConfig::ci();
        self
    }

    /// Load configuration from a file.
    ///
    /// Supports TOML (.toml) and JSON (.json) formats, chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The file contains invalid TOML/JSON
    /// - The file contains unknown fields
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        self.config = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Load configuration from an optional file.
    ///
    /// If the file exists, loads it. If not, silently continues.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the format is unknown.
    ///
    /// # Example
    ///
    /// ```
    /// use breakdance_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [snapshot]
    ///     root = "tests/responses"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.snapshot.root.to_str(), Some("tests/responses"));
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration format: {format}"
                )))
            }
        };
        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// Environment variables use the format `PREFIX__SECTION__KEY`, e.g.
    /// `BREAKDANCE__SNAPSHOT__ROOT=/tmp/responses`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file into the process environment, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a `.env` file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(ConfigError::validation_error(format!(
                "failed to load .env file: {e}"
            ))),
        }
    }

    /// Finalize and return the loaded configuration.
    ///
    /// Applies environment variable overrides (if a prefix was set) and
    /// validates the final configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment override cannot be parsed or
    /// validation fails.
    pub fn load(mut self) -> Result<BreakdanceConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let vars: BTreeMap<String, String> = env::vars()
                .filter(|(k, _)| k.starts_with(&prefix))
                .collect();
            self.apply_env_overrides(&prefix, &vars)?;
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Finalize without validation.
    #[must_use]
    pub fn load_unvalidated(self) -> BreakdanceConfig {
        self.config
    }

    // Parse configuration file based on extension
    fn parse_file(content: &str, path: &Path) -> Result<BreakdanceConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::validation_error(format!(
                "unsupported configuration file format: {}",
                path.display()
            ))),
        }
    }

    // Apply a set of environment variables, in key order
    fn apply_env_overrides(
        &mut self,
        prefix: &str,
        vars: &BTreeMap<String, String>,
    ) -> Result<(), ConfigError> {
        for (key, value) in vars {
            self.apply_env_var(key, value, prefix)?;
        }
        Ok(())
    }

    // Apply a single environment variable
    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let key_without_prefix = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = key_without_prefix.split("__").collect();

        match parts.as_slice() {
            // Surface section
            ["SURFACE", "GROUP_BY_CATEGORY"] => {
                self.config.surface.group_by_category = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["SURFACE", "PROPERTY_RENDERING"] => {
                self.config.surface.property_rendering = match value.to_lowercase().as_str() {
                    "accessors" => PropertyRendering::Accessors,
                    "declaration" => PropertyRendering::Declaration,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'accessors' or 'declaration'",
                        ))
                    }
                };
            }
            ["SURFACE", "INCLUDE_INHERITED"] => {
                self.config.surface.include_inherited = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["SURFACE", "EXCLUSION_ATTRIBUTES"] => {
                self.config.surface.exclusion_attributes = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }

            // Snapshot section
            ["SNAPSHOT", "ROOT"] => {
                self.config.snapshot.root = PathBuf::from(value);
            }
            ["SNAPSHOT", "MAX_PATH_LENGTH"] => {
                self.config.snapshot.max_path_length = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }
            ["SNAPSHOT", "RETRY_ATTEMPTS"] => {
                self.config.snapshot.retry_attempts = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }
            ["SNAPSHOT", "RETRY_INITIAL_DELAY_MS"] => {
                self.config.snapshot.retry_initial_delay_ms = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }

            // Logging section
            ["LOGGING", "ENABLED"] => {
                self.config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => {
                self.config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }

            // Unknown keys are ignored so unrelated tooling can share the prefix
            _ => {}
        }

        Ok(())
    }
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config.snapshot.max_path_length, 260);
    }

    #[test]
    fn test_loader_with_string_toml() {
        let toml = r#"
            [surface]
            property_rendering = "declaration"
            include_inherited = true

            [snapshot]
            max_path_length = 1024
        "#;

        let config = ConfigLoader::new()
            .with_string(toml, "toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(
            config.surface.property_rendering,
            PropertyRendering::Declaration
        );
        assert!(config.surface.include_inherited);
        assert_eq!(config.snapshot.max_path_length, 1024);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"snapshot": {"root": "responses", "retry_attempts": 3}}"#;

        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.snapshot.root, PathBuf::from("responses"));
        assert_eq!(config.snapshot.retry_attempts, 3);
    }

    #[test]
    fn test_loader_with_unknown_format() {
        let result = ConfigLoader::new().with_string("", "yaml");
        assert!(result.is_err());
    }

    #[test]
    fn test_loader_with_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[logging]\nlevel = \"trace\"").unwrap();

        let config = ConfigLoader::new()
            .with_file(file.path())
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/breakdance.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/breakdance.toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config, BreakdanceConfig::default());
    }

    #[test]
    fn test_loader_rejects_invalid_values() {
        let result = ConfigLoader::new()
            .with_string("[snapshot]\nmax_path_length = 0", "toml")
            .unwrap()
            .load();

        assert!(result.is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    // Environment overrides are exercised through apply_env_var directly;
    // mutating the process environment would race with parallel tests.

    #[test]
    fn test_apply_env_var_snapshot() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__SNAPSHOT__ROOT", "/tmp/responses", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__SNAPSHOT__MAX_PATH_LENGTH", "512", "TEST")
            .unwrap();
        assert_eq!(loader.config.snapshot.root, PathBuf::from("/tmp/responses"));
        assert_eq!(loader.config.snapshot.max_path_length, 512);
    }

    #[test]
    fn test_apply_env_var_surface() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__SURFACE__GROUP_BY_CATEGORY", "false", "TEST")
            .unwrap();
        loader
            .apply_env_var(
                "TEST__SURFACE__EXCLUSION_ATTRIBUTES",
                "A.HiddenAttribute, B.InternalAttribute",
                "TEST",
            )
            .unwrap();
        assert!(!loader.config.surface.group_by_category);
        assert_eq!(
            loader.config.surface.exclusion_attributes,
            vec!["A.HiddenAttribute", "B.InternalAttribute"]
        );
    }

    #[test]
    fn test_apply_env_var_invalid_integer() {
        let mut loader = ConfigLoader::new();
        let result = loader.apply_env_var("TEST__SNAPSHOT__RETRY_ATTEMPTS", "many", "TEST");
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_env_var_log_format() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__LOGGING__FORMAT", "json", "TEST")
            .unwrap();
        assert_eq!(loader.config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_apply_env_overrides_in_key_order() {
        let mut vars = BTreeMap::new();
        vars.insert("TEST__LOGGING__LEVEL".to_string(), "warn".to_string());
        vars.insert("TEST__UNRELATED".to_string(), "ignored".to_string());

        let mut loader = ConfigLoader::new();
        loader.apply_env_overrides("TEST", &vars).unwrap();
        assert_eq!(loader.config.logging.level, "warn");
    }
}
