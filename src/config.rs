//! Server configuration: TOML file, then environment, then command-line flags.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Settings for `gridtoe serve`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// SQLite database file.
    #[serde(default = "default_database_path")]
    database_path: String,

    /// Browser origin allowed by CORS.
    #[serde(default = "default_cors_origin")]
    cors_origin: String,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3002
}

fn default_database_path() -> String {
    "./db/gridtoe.db".to_string()
}

fn default_cors_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_log_filter() -> String {
    "info,gridtoe=debug,tower_http=debug".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
            cors_origin: default_cors_origin(),
            log_filter: default_log_filter(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(address = %config.address(), "Config loaded");
        Ok(config)
    }

    /// Parses configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// File (if any) plus process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Applies `HOST`, `PORT`, `DATABASE_PATH` and `CORS_ORIGIN` from `lookup`.
    #[instrument(skip(self, lookup))]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::new(format!("Invalid PORT value: '{}'", port)))?;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            self.database_path = path;
        }
        if let Some(origin) = lookup("CORS_ORIGIN") {
            self.cors_origin = origin;
        }
        Ok(self)
    }

    /// Applies command-line overrides.
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        database_path: Option<String>,
    ) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(path) = database_path {
            self.database_path = path;
        }
        self
    }

    /// `host:port` to bind.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ServerConfig::from_toml("port = 8080\ncors_origin = \"https://play.example\"")
            .unwrap();
        assert_eq!(*config.port(), 8080);
        assert_eq!(config.cors_origin(), "https://play.example");
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.database_path(), "./db/gridtoe.db");
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = ServerConfig::from_toml("port = \"lots\"").unwrap_err();
        assert!(err.message.starts_with("Failed to parse config"));
    }

    #[test]
    fn test_env_then_flags() {
        let env: HashMap<&str, &str> = [("PORT", "4000"), ("DATABASE_PATH", "/tmp/env.db")].into();
        let config = ServerConfig::default()
            .with_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap()
            .with_overrides(Some("0.0.0.0".into()), None, Some("/tmp/flag.db".into()));
        assert_eq!(config.address(), "0.0.0.0:4000");
        assert_eq!(config.database_path(), "/tmp/flag.db");
    }

    #[test]
    fn test_bad_port_env() {
        let result = ServerConfig::default().with_env(|key| (key == "PORT").then(|| "http".into()));
        assert!(result.is_err());
    }
}
