//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{ClientConfig, DEFAULT_BACKEND_URL};
use crate::store::StoreConfig;

/// Environment variable selecting the backend base URL
pub const BACKEND_URL_ENV: &str = "LOAN_TRACKER_BACKEND_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Loan backend connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Unset means requests may wait forever
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            request_timeout_secs: None,
        }
    }
}

impl BackendConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.url.clone(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Terminal UI settings
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    #[serde(default = "default_success_message")]
    pub success_message_ms: u64,
}

fn default_tick_rate() -> u64 {
    250
}

fn default_success_message() -> u64 {
    2000
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            success_message_ms: default_success_message(),
        }
    }
}

impl UiConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            success_message_ttl: Duration::from_millis(self.success_message_ms),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from the first readable default location, falling back to
    /// defaults with environment overrides.
    ///
    /// The returned [`LoadReport`] is meant to be logged once tracing is up.
    pub fn load_default() -> (Self, LoadReport) {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("loan-tracker").join("config.toml")),
            Some(PathBuf::from("/etc/loan-tracker/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    fn load_first(paths: &[PathBuf]) -> (Self, LoadReport) {
        let mut report = LoadReport::default();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    report.source = Some(path.clone());
                    return (config, report);
                }
                Err(e) => report.failures.push((path.clone(), e)),
            }
        }

        (Self::from_env(), report)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                self.backend.url = url;
            }
        }

        if let Ok(level) = std::env::var("LOAN_TRACKER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOAN_TRACKER_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Outcome of searching the default config locations
#[derive(Debug, Default)]
pub struct LoadReport {
    /// File the config came from; `None` means built-in defaults
    pub source: Option<PathBuf>,
    /// Files that existed but could not be loaded
    pub failures: Vec<(PathBuf, ConfigError)>,
}

impl LoadReport {
    pub fn log(&self) {
        for (path, e) in &self.failures {
            tracing::warn!("Failed to load config from {:?}: {}", path, e);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Loan Tracker Configuration
#
# Environment variables override these settings:
# - LOAN_TRACKER_BACKEND_URL
# - LOAN_TRACKER_LOG_LEVEL
# - LOAN_TRACKER_LOG_FORMAT

[backend]
# Base URL of the loan backend
url = "http://localhost:8000"

# Request timeout in seconds (unset = wait indefinitely)
# request_timeout_secs = 30

[ui]
# How often the terminal UI redraws while idle (ms)
tick_rate_ms = 250

# How long the "Saved successfully" banner stays up (ms)
success_message_ms = 2000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path. The terminal UI only logs when this is set.
# file = "/tmp/loan-tracker.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend.url, "http://localhost:8000");
        assert!(config.backend.request_timeout_secs.is_none());
        assert_eq!(config.ui.success_message_ms, 2000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.backend.url, Config::default().backend.url);
        assert_eq!(config.ui.tick_rate_ms, 250);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[backend]\nurl = \"https://loans.example.com\"\nrequest_timeout_secs = 10\n"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.backend.url, "https://loans.example.com");
        assert_eq!(
            config.backend.client_config().request_timeout,
            Some(Duration::from_secs(10))
        );
        assert_eq!(config.ui.success_message_ms, 2000);
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend\nurl = 3").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_first_skips_broken_file_and_reports_it() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&broken, "[ui\ntick_rate_ms = ").unwrap();
        std::fs::write(&good, "[ui]\ntick_rate_ms = 75\n").unwrap();
        let absent = dir.path().join("absent.toml");

        let (config, report) = Config::load_first(&[absent, broken.clone(), good.clone()]);

        assert_eq!(config.ui.tick_rate_ms, 75);
        assert_eq!(report.source, Some(good));
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, broken);
        assert!(matches!(report.failures[0].1, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_first_without_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, report) = Config::load_first(&[dir.path().join("none.toml")]);

        assert!(report.source.is_none());
        assert!(report.failures.is_empty());
        assert_eq!(config.ui.tick_rate_ms, 250);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/loan-tracker.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_store_config_from_ui() {
        let ui = UiConfig {
            tick_rate_ms: 100,
            success_message_ms: 500,
        };
        assert_eq!(ui.store_config().success_message_ttl, Duration::from_millis(500));
    }
}
