//! Configuration management for shell-relay.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::protocol::StreamPrecedence;
use crate::session::{SessionOptions, DEFAULT_HISTORY_CAPACITY, DEFAULT_INTERRUPT_SIGNAL};

/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT_URL: &str = "http://127.0.0.1:8080/~/system/bin/shell.aot";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote shell endpoint.
    pub endpoint: EndpointSection,
    /// Terminal session settings.
    pub session: SessionSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Endpoint configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSection {
    /// URL of the shell executable endpoint.
    pub url: String,
    /// Signal name sent on interrupt.
    pub interrupt_signal: String,
}

impl Default for EndpointSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT_URL.to_string(),
            interrupt_signal: DEFAULT_INTERRUPT_SIGNAL.to_string(),
        }
    }
}

/// Session configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Maximum number of history entries kept.
    pub history_capacity: usize,
    /// Which stream wins when a record carries both stdout and stderr.
    pub stream_precedence: StreamPrecedence,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            stream_precedence: StreamPrecedence::default(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace) or a full filter.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("SHELL_RELAY_URL") {
            if !url.is_empty() {
                self.endpoint.url = url;
            }
        }

        if let Some(capacity) = var("SHELL_RELAY_HISTORY") {
            if let Ok(capacity) = capacity.parse() {
                self.session.history_capacity = capacity;
            }
        }

        if let Some(precedence) = var("SHELL_RELAY_PRECEDENCE") {
            if let Ok(precedence) = precedence.parse() {
                self.session.stream_precedence = precedence;
            }
        }

        if let Some(level) = var("SHELL_RELAY_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref url) = args.url {
            self.endpoint.url = url.clone();
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(ref path) = args.config {
            config = Config::from_file(path)?;
        }

        config.apply_env();
        config.apply_args(args);
        config.validate()?;

        Ok(config)
    }

    /// Check values that would only fail later, at connect time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.endpoint.url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(url.to_string()));
        }
        if self.session.history_capacity == 0 {
            return Err(ConfigError::InvalidHistoryCapacity);
        }
        Ok(())
    }

    /// Options for a terminal session.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            history_capacity: self.session.history_capacity,
            interrupt_signal: self.endpoint.interrupt_signal.clone(),
        }
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// Endpoint is not an http(s) URL.
    InvalidUrl(String),
    /// History must hold at least one entry.
    InvalidHistoryCapacity,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::InvalidUrl(url) => write!(f, "invalid endpoint url: {}", url),
            Self::InvalidHistoryCapacity => write!(f, "history capacity must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.endpoint.url, DEFAULT_ENDPOINT_URL);
        assert_eq!(config.endpoint.interrupt_signal, "SIGINT");
        assert_eq!(config.session.history_capacity, 1996);
        assert_eq!(config.session.stream_precedence, StreamPrecedence::Stderr);
        assert_eq!(config.log_filter(), "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "endpoint": {
                "url": "https://shell.example/bin/shell.aot",
                "interrupt_signal": "SIGTERM"
            },
            "session": {
                "history_capacity": 50,
                "stream_precedence": "stdout"
            },
            "logging": {
                "level": "debug"
            }
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.endpoint.url, "https://shell.example/bin/shell.aot");
        assert_eq!(config.endpoint.interrupt_signal, "SIGTERM");
        assert_eq!(config.session.history_capacity, 50);
        assert_eq!(config.session.stream_precedence, StreamPrecedence::Stdout);
        assert_eq!(config.log_filter(), "debug");
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{ "session": { "history_capacity": 10 } }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.endpoint.url, DEFAULT_ENDPOINT_URL);
        assert_eq!(config.session.history_capacity, 10);
    }

    #[test]
    fn test_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_vars(vars(&[
            ("SHELL_RELAY_URL", "http://10.0.0.2/shell"),
            ("SHELL_RELAY_HISTORY", "7"),
            ("SHELL_RELAY_PRECEDENCE", "stdout"),
            ("RUST_LOG", "trace"),
        ]));

        assert_eq!(config.endpoint.url, "http://10.0.0.2/shell");
        assert_eq!(config.session.history_capacity, 7);
        assert_eq!(config.session.stream_precedence, StreamPrecedence::Stdout);
        assert_eq!(config.log_filter(), "trace");
    }

    #[test]
    fn test_env_log_level_beats_rust_log() {
        let mut config = Config::default();
        config.apply_vars(vars(&[
            ("SHELL_RELAY_LOG_LEVEL", "warn"),
            ("RUST_LOG", "trace"),
        ]));
        assert_eq!(config.log_filter(), "warn");
    }

    #[test]
    fn test_env_ignores_unparseable_values() {
        let mut config = Config::default();
        config.apply_vars(vars(&[
            ("SHELL_RELAY_HISTORY", "lots"),
            ("SHELL_RELAY_PRECEDENCE", "both"),
        ]));
        assert_eq!(config.session.history_capacity, 1996);
        assert_eq!(config.session.stream_precedence, StreamPrecedence::Stderr);
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        let args = Args {
            url: Some("http://192.168.1.1:9000/shell".to_string()),
            log_level: Some("debug".to_string()),
            ..Args::default()
        };

        config.apply_args(&args);

        assert_eq!(config.endpoint.url, "http://192.168.1.1:9000/shell");
        assert_eq!(config.log_filter(), "debug");
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        config.endpoint.url = "ftp://nowhere".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));

        let mut config = Config::default();
        config.session.history_capacity = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHistoryCapacity)
        ));
    }

    #[test]
    fn test_session_options() {
        let mut config = Config::default();
        config.session.history_capacity = 3;
        config.endpoint.interrupt_signal = "SIGKILL".to_string();

        let options = config.session_options();
        assert_eq!(options.history_capacity, 3);
        assert_eq!(options.interrupt_signal, "SIGKILL");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"url\""));
        assert!(json.contains("\"stream_precedence\": \"stderr\""));
    }
}
