//! Main application configuration
//!
//! This module defines the configuration structures for both halves of the
//! demo, including environment variable loading, TOML file loading and
//! validation.

use crate::types::{DEFAULT_FRONT_DOOR_ENDPOINT, DEFAULT_MMLOGIC_ENDPOINT, SERVICES_PORT};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub services_host: ServicesHostSettings,
    pub client: ClientSettings,
}

/// Process-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Port for health and metrics endpoint
    pub health_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Settings for the services host (match function, evaluator, stubs)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesHostSettings {
    /// TCP port the gRPC server listens on
    pub listen_port: u16,
    /// Logic service endpoint used to resolve pools
    pub mmlogic_endpoint: String,
}

/// Settings for the toy game client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Front door endpoint the client dials
    pub front_door_endpoint: String,
    /// Time spent idling in the main menu before searching
    pub menu_sleep_seconds: u64,
    /// Time spent "playing" a match once assigned
    pub play_sleep_seconds: u64,
    /// Connect timeout for the front door session
    pub connect_timeout_seconds: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "first-match".to_string(),
            log_level: "info".to_string(),
            health_port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl Default for ServicesHostSettings {
    fn default() -> Self {
        Self {
            listen_port: SERVICES_PORT,
            mmlogic_endpoint: DEFAULT_MMLOGIC_ENDPOINT.to_string(),
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            front_door_endpoint: DEFAULT_FRONT_DOOR_ENDPOINT.to_string(),
            menu_sleep_seconds: 3,
            play_sleep_seconds: 5,
            connect_timeout_seconds: 10,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {} value: {}", key, value)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Ok(name) = env::var("FIRST_MATCH_SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("FIRST_MATCH_LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Some(port) = parse_env("FIRST_MATCH_HEALTH_PORT")? {
            config.service.health_port = port;
        }
        if let Some(timeout) = parse_env("FIRST_MATCH_SHUTDOWN_TIMEOUT_SECONDS")? {
            config.service.shutdown_timeout_seconds = timeout;
        }

        // Services host settings
        if let Some(port) = parse_env("FIRST_MATCH_LISTEN_PORT")? {
            config.services_host.listen_port = port;
        }
        if let Ok(endpoint) = env::var("FIRST_MATCH_MMLOGIC_ENDPOINT") {
            config.services_host.mmlogic_endpoint = endpoint;
        }

        // Client settings
        if let Ok(endpoint) = env::var("FIRST_MATCH_FRONT_DOOR_ENDPOINT") {
            config.client.front_door_endpoint = endpoint;
        }
        if let Some(secs) = parse_env("FIRST_MATCH_MENU_SLEEP_SECONDS")? {
            config.client.menu_sleep_seconds = secs;
        }
        if let Some(secs) = parse_env("FIRST_MATCH_PLAY_SLEEP_SECONDS")? {
            config.client.play_sleep_seconds = secs;
        }
        if let Some(secs) = parse_env("FIRST_MATCH_CONNECT_TIMEOUT_SECONDS")? {
            config.client.connect_timeout_seconds = secs;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&raw)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(raw).context("Failed to parse TOML config")?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Get main menu idle time as Duration
    pub fn menu_sleep(&self) -> Duration {
        Duration::from_secs(self.client.menu_sleep_seconds)
    }

    /// Get match play time as Duration
    pub fn play_sleep(&self) -> Duration {
        Duration::from_secs(self.client.play_sleep_seconds)
    }

    /// Get front door connect timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.client.connect_timeout_seconds)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate ports
    if config.service.health_port == 0 {
        return Err(anyhow!("Health port cannot be 0"));
    }
    if config.services_host.listen_port == 0 {
        return Err(anyhow!("Listen port cannot be 0"));
    }
    if config.services_host.listen_port == config.service.health_port {
        return Err(anyhow!(
            "Listen port and health port must differ (both {})",
            config.service.health_port
        ));
    }

    // Validate timeouts
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }
    if config.client.connect_timeout_seconds == 0 {
        return Err(anyhow!("Connect timeout must be greater than 0"));
    }

    // Validate endpoints
    if config.services_host.mmlogic_endpoint.is_empty() {
        return Err(anyhow!("Logic service endpoint cannot be empty"));
    }
    if config.client.front_door_endpoint.is_empty() {
        return Err(anyhow!("Front door endpoint cannot be empty"));
    }

    Ok(())
}
