// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later tiers win:
//! 1. TOML file (base values, defaults for anything missing)
//! 2. Environment variables (`SNNGINE_*`)
//! 3. CLI arguments (explicit user overrides)

use crate::validation::validate_config;
use crate::{ConfigError, ConfigResult, SnngineConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File name searched for in the working directory and its parents
pub const CONFIG_FILE_NAME: &str = "snngine_configuration.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "SNNGINE_CONFIG_PATH";

/// Find the SNNgine configuration file
///
/// Search order:
/// 1. `SNNGINE_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Parent directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load, override and validate the configuration
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SnngineConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let config: SnngineConfig = toml::from_str(&content)?;
    finish(config, cli_args)
}

/// Like [`load_config`] with no explicit path, but falls back to defaults
/// when the search finds no file
///
/// Returns the path that was loaded, if any. A missing file named by
/// `SNNGINE_CONFIG_PATH` is still an error.
pub fn load_config_or_default(
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<(SnngineConfig, Option<PathBuf>)> {
    match find_config_file() {
        Ok(path) => load_config(Some(&path), cli_args).map(|config| (config, Some(path))),
        Err(ConfigError::FileNotFound(_)) if env::var(CONFIG_PATH_ENV).is_err() => {
            finish(SnngineConfig::default(), cli_args).map(|config| (config, None))
        }
        Err(e) => Err(e),
    }
}

fn finish(
    mut config: SnngineConfig,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SnngineConfig> {
    apply_environment_overrides(&mut config)?;
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }
    validate_config(&config)?;
    Ok(config)
}

fn parse<T: FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(format!("{} = '{}'", key, value)))
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(format!("{} = '{}'", key, value))),
    }
}

/// Set one overridable key; shared by the environment and CLI tiers
fn apply_override(config: &mut SnngineConfig, key: &str, value: &str) -> ConfigResult<bool> {
    match key {
        "log_level" => config.system.log_level = value.to_string(),
        "max_cores" => config.system.max_cores = parse(key, value)?,
        "log_dir" => config.system.log_dir = Some(PathBuf::from(value.trim())),
        "neurons" => config.network.neurons = parse(key, value)?,
        "fan_out" => config.network.fan_out = Some(parse(key, value)?),
        "max_delay" => config.network.max_delay = Some(parse(key, value)?),
        "record_duration" => config.network.record_duration = parse(key, value)?,
        "seed" => config.network.seed = Some(parse(key, value)?),
        "excitatory_fraction" => config.network.excitatory_fraction = Some(parse(key, value)?),
        "backend" => config.simulation.backend = value.to_string(),
        "ticks" => config.simulation.ticks = parse(key, value)?,
        "synaptic_delivery" => config.simulation.synaptic_delivery = parse_bool(key, value)?,
        "updates_per_frame" => config.simulation.updates_per_frame = Some(parse(key, value)?),
        _ => return Ok(false),
    }
    Ok(true)
}

/// Keys accepted as `SNNGINE_<KEY>` and as CLI overrides
pub const OVERRIDE_KEYS: &[&str] = &[
    "log_level",
    "max_cores",
    "log_dir",
    "neurons",
    "fan_out",
    "max_delay",
    "record_duration",
    "seed",
    "excitatory_fraction",
    "backend",
    "ticks",
    "synaptic_delivery",
    "updates_per_frame",
];

/// Apply environment variable overrides to configuration
///
/// Each key in [`OVERRIDE_KEYS`] is read from `SNNGINE_<KEY>`, e.g.
/// `SNNGINE_NEURONS` -> `network.neurons`, `SNNGINE_LOG_LEVEL` -> `system.log_level`.
pub fn apply_environment_overrides(config: &mut SnngineConfig) -> ConfigResult<()> {
    for key in OVERRIDE_KEYS {
        let var = format!("SNNGINE_{}", key.to_uppercase());
        if let Ok(value) = env::var(&var) {
            apply_override(config, key, &value)?;
        }
    }
    Ok(())
}

/// Apply CLI argument overrides to configuration
///
/// * `cli_args` - map of override keys to values (e.g. `{"neurons": "2000"}`)
///
/// Unknown keys are rejected.
pub fn apply_cli_overrides(
    config: &mut SnngineConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    for (key, value) in cli_args {
        if !apply_override(config, key, value)? {
            return Err(ConfigError::InvalidValue(format!(
                "unknown override key '{}'",
                key
            )));
        }
    }
    Ok(())
}
