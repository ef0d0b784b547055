//! Configuration module for sheetboard.

use serde::Deserialize;
use std::path::Path;

use crate::{BoardError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Timezone for displaying dates (e.g., "Asia/Tokyo", "UTC").
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8016
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timezone: default_timezone(),
        }
    }
}

/// Content store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store backend: "memory" or "sheet".
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// Base URL of the sheet row API (required for the sheet backend).
    #[serde(default)]
    pub base_url: String,
    /// API token sent as a bearer credential. Empty means no auth header.
    #[serde(default)]
    pub api_token: String,
    /// Tab holding thread rows.
    #[serde(default = "default_threads_tab")]
    pub threads_tab: String,
    /// Tab holding post rows.
    #[serde(default = "default_posts_tab")]
    pub posts_tab: String,
    /// Tab holding user rows.
    #[serde(default = "default_users_tab")]
    pub users_tab: String,
    /// Connection timeout in seconds.
    #[serde(default = "default_store_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    #[serde(default = "default_store_read_timeout")]
    pub read_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_store_total_timeout")]
    pub total_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_store_max_redirects")]
    pub max_redirects: usize,
}

fn default_store_backend() -> String {
    "memory".to_string()
}

fn default_threads_tab() -> String {
    "threads".to_string()
}

fn default_posts_tab() -> String {
    "posts".to_string()
}

fn default_users_tab() -> String {
    "users".to_string()
}

fn default_store_connect_timeout() -> u64 {
    10
}

fn default_store_read_timeout() -> u64 {
    20
}

fn default_store_total_timeout() -> u64 {
    30
}

fn default_store_max_redirects() -> usize {
    5
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            base_url: String::new(),
            api_token: String::new(),
            threads_tab: default_threads_tab(),
            posts_tab: default_posts_tab(),
            users_tab: default_users_tab(),
            connect_timeout_secs: default_store_connect_timeout(),
            read_timeout_secs: default_store_read_timeout(),
            total_timeout_secs: default_store_total_timeout(),
            max_redirects: default_store_max_redirects(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/sheetboard.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Content store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(BoardError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BoardError::Validation(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `SHEETBOARD_STORE_TOKEN`: Override the store API token
    pub fn apply_env_overrides(&mut self) {
        // Store token from environment variable (highest priority)
        if let Ok(token) = std::env::var("SHEETBOARD_STORE_TOKEN") {
            if !token.is_empty() {
                self.store.api_token = token;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The store backend is not one of "memory" / "sheet"
    /// - The sheet backend is selected but base_url is missing or not a valid URL
    pub fn validate(&self) -> Result<()> {
        match self.store.backend.as_str() {
            "memory" => {}
            "sheet" => {
                if self.store.base_url.is_empty() {
                    return Err(BoardError::Validation(
                        "store backend is \"sheet\" but base_url is not set. \
                         Set it in config.toml."
                            .to_string(),
                    ));
                }
                url::Url::parse(&self.store.base_url).map_err(|e| {
                    BoardError::Validation(format!("store base_url is not a valid URL: {e}"))
                })?;
            }
            other => {
                return Err(BoardError::Validation(format!(
                    "unknown store backend {other:?} (expected \"memory\" or \"sheet\")"
                )));
            }
        }
        Ok(())
    }
}
