// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Every check runs and every violation is reported, so one pass over a
//! broken file lists everything that needs fixing.

use crate::{ConfigError, ConfigResult, SnngineConfig};

/// Largest fan-out accepted from a file
pub const MAX_FAN_OUT: usize = 1000;
/// Largest maximum delay accepted from a file
pub const MAX_DELAY: usize = 100;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "warning", "error"];
const BACKENDS: &[&str] = &["sequential", "cpu", "parallel", "rayon", "auto"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    OutOfRange { field: String, value: String, range: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange {
                field,
                value,
                range,
            } => write!(f, "{} = {} is outside {}", field, value, range),
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every violation
pub fn validate_config(config: &SnngineConfig) -> ConfigResult<()> {
    let errors = collect_violations(config);
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

/// All violations, in section order
pub fn collect_violations(config: &SnngineConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_system(config, &mut errors);
    validate_network(config, &mut errors);
    validate_currents(config, &mut errors);
    validate_weights(config, &mut errors);
    validate_simulation(config, &mut errors);
    errors
}

fn invalid(errors: &mut Vec<ConfigValidationError>, field: &str, reason: impl Into<String>) {
    errors.push(ConfigValidationError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    });
}

fn validate_system(config: &SnngineConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.system.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        invalid(
            errors,
            "system.log_level",
            format!("'{}' is not one of {}", config.system.log_level, LOG_LEVELS.join(", ")),
        );
    }
}

fn validate_network(config: &SnngineConfig, errors: &mut Vec<ConfigValidationError>) {
    let network = &config.network;
    let n = network.neurons;

    if n == 0 || n % 2 != 0 {
        invalid(errors, "network.neurons", "must be a positive even number");
    }
    if let Some(s) = network.fan_out {
        let limit = MAX_FAN_OUT.min(n.saturating_sub(1));
        if s > limit {
            errors.push(ConfigValidationError::OutOfRange {
                field: "network.fan_out".to_string(),
                value: s.to_string(),
                range: format!("[0, {}] (at most N-1 and {})", limit, MAX_FAN_OUT),
            });
        }
    }
    if let Some(d) = network.max_delay {
        if d > MAX_DELAY {
            errors.push(ConfigValidationError::OutOfRange {
                field: "network.max_delay".to_string(),
                value: d.to_string(),
                range: format!("[0, {}]", MAX_DELAY),
            });
        }
    }
    if network.record_duration == 0 {
        invalid(errors, "network.record_duration", "must be positive");
    }
    if let Some(fraction) = network.excitatory_fraction {
        if !(0.0..=1.0).contains(&fraction) {
            errors.push(ConfigValidationError::OutOfRange {
                field: "network.excitatory_fraction".to_string(),
                value: fraction.to_string(),
                range: "[0.0, 1.0]".to_string(),
            });
        }
    }

    if let Some(types) = &network.neuron_types {
        if types.len() != n {
            invalid(
                errors,
                "network.neuron_types",
                format!("has {} entries, expected N={}", types.len(), n),
            );
        }
    }

    let sensory = &config.sensory_input;
    for (field, neurons) in [
        ("sensory_input.neurons0", &sensory.neurons0),
        ("sensory_input.neurons1", &sensory.neurons1),
    ] {
        if let Some(bad) = neurons.iter().find(|&&idx| idx as usize >= n) {
            invalid(errors, field, format!("neuron {} out of range for N={}", bad, n));
        }
    }
}

fn validate_currents(config: &SnngineConfig, errors: &mut Vec<ConfigValidationError>) {
    for (field, value) in [
        ("thalamic_input.inh_current", config.thalamic_input.inh_current),
        ("thalamic_input.exc_current", config.thalamic_input.exc_current),
        ("sensory_input.input_current0", config.sensory_input.input_current0),
        ("sensory_input.input_current1", config.sensory_input.input_current1),
    ] {
        if !value.is_finite() {
            invalid(errors, field, "must be finite");
        }
    }
}

fn validate_weights(config: &SnngineConfig, errors: &mut Vec<ConfigValidationError>) {
    let weights = &config.weights;
    if !(weights.inh2exc.is_finite() && weights.inh2exc <= 0.0) {
        invalid(errors, "weights.inh2exc", "must be finite and <= 0");
    }
    for (field, value) in [
        ("weights.exc2inh", weights.exc2inh),
        ("weights.exc2exc", weights.exc2exc),
        ("weights.sensory_source", weights.sensory_source),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            invalid(errors, field, "must be finite and >= 0");
        }
    }
}

fn validate_simulation(config: &SnngineConfig, errors: &mut Vec<ConfigValidationError>) {
    let backend = config.simulation.backend.to_lowercase();
    if !BACKENDS.contains(&backend.as_str()) {
        invalid(
            errors,
            "simulation.backend",
            format!("'{}' is not one of sequential, parallel, auto", config.simulation.backend),
        );
    }
    if config.simulation.updates_per_frame == Some(0) {
        invalid(errors, "simulation.updates_per_frame", "must be positive");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SnngineConfig::default();
        let result = validate_config(&config);
        if let Err(e) = &result {
            eprintln!("Validation error: {}", e);
        }
        assert!(result.is_ok());
    }

    #[test]
    fn test_odd_neuron_count() {
        let mut config = SnngineConfig::default();
        config.network.neurons = 1001;

        let result = validate_config(&config);
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError(ref msg)) if msg.contains("network.neurons")
        ));
    }

    #[test]
    fn test_fan_out_limits() {
        let mut config = SnngineConfig::default();
        config.network.neurons = 100;
        config.network.fan_out = Some(100);
        let errors = collect_violations(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("network.fan_out"));

        config.network.neurons = 100_000;
        config.network.fan_out = Some(1001);
        assert_eq!(collect_violations(&config).len(), 1);
    }

    #[test]
    fn test_all_violations_reported() {
        let mut config = SnngineConfig::default();
        config.system.log_level = "loud".to_string();
        config.network.max_delay = Some(101);
        config.weights.inh2exc = 0.49;
        config.simulation.backend = "gpu".to_string();
        config.sensory_input.neurons1 = vec![200_000];

        let result = validate_config(&config);
        let Err(ConfigError::ValidationError(msg)) = result else {
            panic!("expected validation error");
        };
        for field in [
            "system.log_level",
            "network.max_delay",
            "weights.inh2exc",
            "simulation.backend",
            "sensory_input.neurons1",
        ] {
            assert!(msg.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn test_neuron_types_length_must_match() {
        use snngine_npu_neural::NeuronType;

        let mut config = SnngineConfig::default();
        config.network.neurons = 4;
        config.network.neuron_types = Some(vec![NeuronType::Excitatory; 3]);
        let errors = collect_violations(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("network.neuron_types"));

        config.network.neuron_types = Some(vec![NeuronType::Excitatory; 4]);
        assert!(collect_violations(&config).is_empty());
    }

    #[test]
    fn test_non_finite_current() {
        let mut config = SnngineConfig::default();
        config.thalamic_input.exc_current = f32::NAN;
        let errors = collect_violations(&config);
        assert_eq!(
            errors,
            vec![ConfigValidationError::InvalidValue {
                field: "thalamic_input.exc_current".to_string(),
                reason: "must be finite".to_string(),
            }]
        );
    }
}
