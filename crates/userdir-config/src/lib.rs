//! # Userdir Config - Configuration Management
//!
//! Handles configuration loading from files and environment variables.

use std::path::Path;

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "static".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), static_dir: default_static_dir() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend selector: `memory` or `redis`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Connection URL for database backends (e.g. `redis://127.0.0.1:6379`).
    pub connection_string: Option<String>,

    /// Write the default user records on startup when they are missing.
    #[serde(default = "default_seed_defaults")]
    pub seed_defaults: bool,
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_seed_defaults() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            connection_string: None,
            seed_defaults: default_seed_defaults(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_level: default_log_level() }
    }
}

/// Configuration validation failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unknown store backend: {0}")]
    UnknownBackend(String),

    #[error("store backend '{0}' requires a connection string")]
    MissingConnectionString(String),
}

impl Config {
    /// Validate cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.store.backend.to_lowercase().as_str() {
            "memory" => Ok(()),
            "redis" => {
                if self.store.connection_string.is_none() {
                    return Err(ValidationError::MissingConnectionString(
                        self.store.backend.clone(),
                    ));
                }
                Ok(())
            },
            other => Err(ValidationError::UnknownBackend(other.to_string())),
        }
    }
}

/// Load configuration from file and environment
pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let builder = ConfigBuilder::builder()
        .add_source(File::from(path.as_ref()).required(false))
        .add_source(Environment::with_prefix("USERDIR").separator("__"))
        .build()?;

    builder.try_deserialize()
}

/// Load configuration with defaults
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Config {
    load(path).unwrap_or_default()
}
