// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! # SNNgine Configuration System
//!
//! Type-safe configuration loader for SNNgine with support for:
//! - TOML file parsing (`snngine_configuration.toml`)
//! - Environment variable overrides (`SNNGINE_*`)
//! - CLI argument overrides
//!
//! ## Usage
//!
//! ```rust,no_run
//! use snngine_config::load_config;
//!
//! let config = load_config(None, None).expect("Failed to load config");
//! println!("N = {}", config.network.neurons);
//! println!("updates per frame = {}", config.updates_per_frame());
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    load_config_or_default, CONFIG_FILE_NAME, CONFIG_PATH_ENV, OVERRIDE_KEYS,
};
pub use types::*;
pub use validation::{collect_violations, validate_config, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
