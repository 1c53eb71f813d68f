//! Configuration file support for persistent settings.
//!
//! This module provides support for loading configuration from a TOML file
//! located at `~/.config/superdu/config.toml` (or the platform-specific
//! equivalent). Configuration file values serve as defaults that can be
//! overridden by CLI arguments.
//!
//! # Layering
//!
//! The precedence order is: **CLI argument > config file > hardcoded default**.
//!
//! # Example config
//!
//! ```toml
//! # Default directory to measure:
//! # path = "~/"
//!
//! [report]
//! threshold = "34M"
//! json = false
//! max_width = 100
//!
//! [measure]
//! one_filesystem = true
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration file structure.
///
/// All fields are `Option<T>` so we can detect which values are present in the
/// config file and apply layered configuration (CLI > config file > defaults).
#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    /// Default directory to measure when no positional path is given
    pub path: Option<PathBuf>,

    /// Report options
    #[serde(default)]
    pub report: FileReportConfig,

    /// Measurement options
    #[serde(default)]
    pub measure: FileMeasureConfig,
}

/// Report options from the configuration file.
#[derive(Deserialize, Default, Debug)]
pub struct FileReportConfig {
    /// Minimum size of interest as a du-style string (e.g. `"100M"`)
    pub threshold: Option<String>,

    /// Whether to emit JSON instead of the human-readable report
    pub json: Option<bool>,

    /// Cap on the path column width in the human-readable report
    pub max_width: Option<usize>,
}

/// Measurement options from the configuration file.
#[derive(Deserialize, Default, Debug)]
pub struct FileMeasureConfig {
    /// Whether to skip directories on other filesystems (du `-x`)
    pub one_filesystem: Option<bool>,
}

/// Expand a leading `~` in a path to the user's home directory.
///
/// Paths that don't start with `~` are returned unchanged.
///
/// # Examples
///
/// ```
/// # use std::path::PathBuf;
/// # use superdu::config::file::expand_tilde;
/// let absolute = PathBuf::from("/absolute/path");
/// assert_eq!(expand_tilde(&absolute), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

impl FileConfig {
    /// Returns the path where the configuration file is expected.
    ///
    /// The configuration file is located at `<config_dir>/superdu/config.toml`,
    /// where `<config_dir>` is the platform-specific configuration directory
    /// (e.g., `~/.config` on Linux/macOS, `%APPDATA%` on Windows).
    ///
    /// # Returns
    ///
    /// `Some(PathBuf)` with the config file path, or `None` if the config
    /// directory cannot be determined.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("superdu").join("config.toml"))
    }

    /// Load configuration from the default config file location.
    ///
    /// If the config file doesn't exist, returns a default (empty) configuration.
    /// If the file exists but is malformed, returns an error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file exists but cannot be read
    /// - The config file exists but contains invalid TOML or unexpected fields
    pub fn load() -> anyhow::Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file at {}: {e}", path.display())
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file at {}: {e}", path.display())
        })?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_config() {
        let config = FileConfig::default();

        assert!(config.path.is_none());
        assert!(config.report.threshold.is_none());
        assert!(config.report.json.is_none());
        assert!(config.report.max_width.is_none());
        assert!(config.measure.one_filesystem.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
path = "~/"

[report]
threshold = "34M"
json = true
max_width = 100

[measure]
one_filesystem = true
"#;

        let config: FileConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.path, Some(PathBuf::from("~/")));
        assert_eq!(config.report.threshold, Some("34M".to_string()));
        assert_eq!(config.report.json, Some(true));
        assert_eq!(config.report.max_width, Some(100));
        assert_eq!(config.measure.one_filesystem, Some(true));
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[report]
threshold = "1G"
"#;

        let config: FileConfig = toml::from_str(toml_content).unwrap();

        assert!(config.path.is_none());
        assert_eq!(config.report.threshold, Some("1G".to_string()));
        assert!(config.report.json.is_none());
        assert!(config.measure.one_filesystem.is_none());
    }

    #[test]
    fn test_parse_empty_config() {
        let config: FileConfig = toml::from_str("").unwrap();

        assert!(config.path.is_none());
        assert!(config.report.threshold.is_none());
    }

    #[test]
    fn test_malformed_config_errors() {
        let toml_content = r#"
[report]
max_width = "not_a_number"
"#;
        let result = toml::from_str::<FileConfig>(toml_content);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_path_returns_expected_suffix() {
        if let Some(path) = FileConfig::config_path() {
            assert!(path.ends_with(Path::new("superdu").join("config.toml")));
        }
    }

    #[test]
    fn test_expand_tilde_with_home() {
        let expanded = expand_tilde(&PathBuf::from("~/measurements"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("measurements"));
        }
    }

    #[test]
    fn test_expand_tilde_absolute_path_unchanged() {
        let path = PathBuf::from("/absolute/path");
        assert_eq!(expand_tilde(&path), path);
    }

    #[test]
    fn test_expand_tilde_relative_path_unchanged() {
        let path = PathBuf::from("relative/path");
        assert_eq!(expand_tilde(&path), path);
    }

    #[test]
    fn test_expand_tilde_bare() {
        let expanded = expand_tilde(&PathBuf::from("~"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home);
        }
    }
}
