use std::fs;
use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Environment variable holding the catalog API key.
pub const API_KEY_ENV: &str = "OMDB_API_KEY";
/// Environment variable overriding the port of `server.bind_addr`.
pub const PORT_ENV: &str = "PORT";

const PORT_RANGE: RangeInclusive<u16> = 1025..=65535;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            message: message.into(),
        }
    }
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/movie-tracker/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("movie-tracker").join("config.toml")
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Applies `OMDB_API_KEY` and `PORT` from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides looked up by variable name.
    ///
    /// `PORT` must be an integer in 1025..=65535 and replaces the port of
    /// `server.bind_addr`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup(API_KEY_ENV) {
            self.catalog.api_key = api_key;
        }

        if let Some(port) = lookup(PORT_ENV) {
            let port: u16 = port
                .trim()
                .parse()
                .ok()
                .filter(|port| PORT_RANGE.contains(port))
                .ok_or_else(|| {
                    ConfigError::invalid(format!(
                        "{} must be an integer between {} and {}, got '{}'",
                        PORT_ENV,
                        PORT_RANGE.start(),
                        PORT_RANGE.end(),
                        port
                    ))
                })?;
            let mut addr = self.bind_addr()?;
            addr.set_port(port);
            self.server.bind_addr = addr.to_string();
        }

        Ok(())
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - `server.bind_addr` is a socket address
    /// - `client.max_search_results` is positive
    /// - `catalog.connect_timeout_seconds` is positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;

        if self.client.max_search_results == 0 {
            return Err(ConfigError::invalid(
                "client.max_search_results must be greater than 0",
            ));
        }

        if self.catalog.connect_timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "catalog.connect_timeout_seconds must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Validation for the `serve` command, which also needs an API key.
    pub fn validate_for_serving(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.catalog.api_key.trim().is_empty() {
            return Err(ConfigError::invalid(format!(
                "catalog.api_key is empty; set it in the config file or via {}",
                API_KEY_ENV
            )));
        }
        Ok(())
    }

    /// Parsed `server.bind_addr`.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind_addr.parse().map_err(|_| {
            ConfigError::invalid(format!(
                "server.bind_addr '{}' is not a valid socket address",
                self.server.bind_addr
            ))
        })
    }
}
