//! Configuration management for Docview.
//!
//! This module handles loading, saving, and managing Docview configuration.
//!
//! ## Configuration File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/docview/config.toml` |
//! | macOS | `~/Library/Application Support/Docview/config.toml` |
//! | Windows | `%APPDATA%\Docview\config.toml` |
//!
//! ## Example
//!
//! ```rust,ignore
//! use docview_core::config::Config;
//!
//! let config = Config::load()?;
//! println!("Converter: {}", config.converter.endpoint);
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::resolve::UrlResolver;

/// Main configuration struct for Docview.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preview settings
    pub preview: PreviewConfig,
    /// Conversion endpoint settings
    pub converter: ConverterConfig,
    /// Web interface settings
    pub web: WebConfig,
}

/// Preview configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Prefix prepended to bare file names
    pub upload_prefix: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            upload_prefix: crate::DEFAULT_UPLOAD_PREFIX.to_string(),
        }
    }
}

impl PreviewConfig {
    /// Build the URL resolver described by this section.
    pub fn resolver(&self) -> Result<UrlResolver> {
        UrlResolver::new(self.upload_prefix.clone())
    }
}

/// Conversion endpoint configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// URL the conversion request is POSTed to
    pub endpoint: String,
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            endpoint: crate::DEFAULT_CONVERTER_ENDPOINT.to_string(),
            timeout: Duration::from_secs(crate::DEFAULT_CONVERSION_TIMEOUT_SECS),
        }
    }
}

impl ConverterConfig {
    /// Check that the endpoint is an absolute http(s) URL and the timeout is non-zero.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(Error::InvalidConfig {
                key: "converter.endpoint".to_string(),
                reason: format!("'{endpoint}' is not an http(s) URL"),
            });
        }
        if self.timeout.is_zero() {
            return Err(Error::InvalidConfig {
                key: "converter.timeout".to_string(),
                reason: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Web interface configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Web server port
    pub port: u16,
    /// Bind to localhost only
    pub localhost_only: bool,
    /// Local directory served under the upload prefix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploads_dir: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: crate::DEFAULT_WEB_PORT,
            localhost_only: true,
            uploads_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// If the configuration file doesn't exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults when absent.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to the default location.
    ///
    /// Creates the configuration directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::ConfigError(format!("Failed to create config directory: {e}"))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| Error::ConfigError(format!("Failed to write config: {e}")))
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.preview.resolver()?;
        self.converter.validate()?;
        if self.web.port == 0 {
            return Err(Error::InvalidConfig {
                key: "web.port".to_string(),
                reason: "port must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    /// Get the default configuration directory path.
    #[must_use]
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "docview", "Docview")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the full path to the configuration file.
    #[must_use]
    pub fn config_path() -> PathBuf {
        Self::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }
}

mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}s", duration.as_secs()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.strip_suffix('s')
            .map(|secs| {
                secs.parse()
                    .map(Duration::from_secs)
                    .map_err(serde::de::Error::custom)
            })
            .or_else(|| {
                s.strip_suffix('m').map(|mins| -> Result<Duration, D::Error> {
                    mins.parse::<u64>()
                        .map_err(<D::Error as serde::de::Error>::custom)?
                        .checked_mul(60)
                        .map(Duration::from_secs)
                        .ok_or_else(|| serde::de::Error::custom("duration out of range"))
                })
            })
            .unwrap_or_else(|| Err(serde::de::Error::custom("invalid duration format")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.preview.upload_prefix, "/uploads/documents");
        assert_eq!(config.converter.timeout, Duration::from_secs(30));
        assert_eq!(config.web.port, crate::DEFAULT_WEB_PORT);
        assert!(config.web.localhost_only);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config").join("config.toml");

        let mut original = Config::default();
        original.preview.upload_prefix = "/files".to_string();
        original.converter.endpoint = "https://convert.example.com/html".to_string();
        original.converter.timeout = Duration::from_secs(120);
        original.web.uploads_dir = Some(temp_dir.path().join("uploads"));

        original.save_to(&config_path).expect("save");
        let loaded = Config::load_from(&config_path).expect("load");

        assert_eq!(loaded.preview.upload_prefix, "/files");
        assert_eq!(loaded.converter.endpoint, "https://convert.example.com/html");
        assert_eq!(loaded.converter.timeout, Duration::from_secs(120));
        assert_eq!(loaded.web.uploads_dir, Some(temp_dir.path().join("uploads")));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.preview.upload_prefix, crate::DEFAULT_UPLOAD_PREFIX);
    }

    #[test]
    fn test_config_deserialization_partial() {
        let partial_toml = r#"
[converter]
timeout = "2m"

[web]
port = 9999
"#;

        let config: Config = toml::from_str(partial_toml).expect("parse partial config");

        assert_eq!(config.converter.timeout, Duration::from_secs(120));
        assert_eq!(config.web.port, 9999);
        assert_eq!(config.converter.endpoint, crate::DEFAULT_CONVERTER_ENDPOINT);
        assert_eq!(config.preview.upload_prefix, crate::DEFAULT_UPLOAD_PREFIX);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[converter\nendpoint = ").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_invalid_duration_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[converter]\ntimeout = \"soon\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_overflowing_minutes_rejected() {
        let result: std::result::Result<Config, _> =
            toml::from_str("[converter]\ntimeout = \"18446744073709551615m\"");
        assert!(result.is_err());

        let config: Config = toml::from_str("[converter]\ntimeout = \"2m\"").unwrap();
        assert_eq!(config.converter.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.preview.upload_prefix = "uploads".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.converter.endpoint = "ftp://files".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.converter.timeout = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.web.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_humantime_duration_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");

        assert!(
            toml_str.contains("timeout = \"30s\""),
            "Duration should be serialized as human-readable"
        );
        assert!(toml_str.contains("[preview]"));
        assert!(toml_str.contains("[converter]"));
        assert!(toml_str.contains("[web]"));
    }

    #[test]
    fn test_config_path() {
        let path = Config::config_path();
        assert!(path.ends_with("config.toml"));
    }
}
