//! Configuration management for the first-match demo
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and the default endpoints of the demo cluster.

pub mod app;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ClientSettings, ServiceSettings, ServicesHostSettings};
