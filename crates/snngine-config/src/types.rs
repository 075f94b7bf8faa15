// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to a section of `snngine_configuration.toml`. Every field
//! has a default, so a partial file (or no file) is a valid configuration.

use serde::{Deserialize, Serialize};
use snngine_npu_neural::NeuronType;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnngineConfig {
    pub system: SystemConfig,
    pub network: NetworkConfig,
    pub thalamic_input: ThalamicInputConfig,
    pub sensory_input: SensoryInputConfig,
    pub weights: WeightsConfig,
    pub simulation: SimulationConfig,
}

impl SnngineConfig {
    /// Ticks per rendered frame: explicit value or derived from N
    pub fn updates_per_frame(&self) -> usize {
        self.simulation
            .updates_per_frame
            .unwrap_or_else(|| derive_updates_per_frame(self.network.neurons))
    }
}

/// 1 up to 10^5 neurons, 5 up to 40^5, 10 beyond
pub fn derive_updates_per_frame(neuron_count: usize) -> usize {
    if neuron_count <= 100_000 {
        1
    } else if neuron_count <= 40usize.pow(5) {
        5
    } else {
        10
    }
}

/// System-level configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub log_level: String,
    /// Kernel worker threads; 0 = rayon's global pool
    pub max_cores: usize,
    /// Base directory for per-run log folders; console only when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            max_cores: 0,
            log_dir: None,
        }
    }
}

/// Network shape and construction
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    #[serde(alias = "n")]
    pub neurons: usize,
    /// S; derived from N when absent
    #[serde(alias = "s", skip_serializing_if = "Option::is_none")]
    pub fan_out: Option<usize>,
    /// D; derived from N when absent
    #[serde(alias = "d", skip_serializing_if = "Option::is_none")]
    pub max_delay: Option<usize>,
    /// T, the max simulation record duration (fire history window)
    #[serde(alias = "t")]
    pub record_duration: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Share of excitatory neurons; half/half when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excitatory_fraction: Option<f32>,
    /// Explicit per-neuron types, e.g. `["inhibitory", "excitatory"]`;
    /// takes precedence over `excitatory_fraction`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neuron_types: Option<Vec<NeuronType>>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            neurons: 100_000,
            fan_out: None,
            max_delay: None,
            record_duration: 5000,
            seed: None,
            excitatory_fraction: None,
            neuron_types: None,
        }
    }
}

/// Background thalamic drive
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThalamicInputConfig {
    pub inh_current: f32,
    pub exc_current: f32,
}

impl Default for ThalamicInputConfig {
    fn default() -> Self {
        Self {
            inh_current: 25.0,
            exc_current: 15.0,
        }
    }
}

/// The two sensory channels
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SensoryInputConfig {
    pub input_current0: f32,
    pub input_current1: f32,
    /// Neurons driven by channel 0
    pub neurons0: Vec<u32>,
    /// Neurons driven by channel 1
    pub neurons1: Vec<u32>,
}

impl Default for SensoryInputConfig {
    fn default() -> Self {
        Self {
            input_current0: 65.0,
            input_current1: 25.0,
            neurons0: Vec::new(),
            neurons1: Vec::new(),
        }
    }
}

/// Synaptic weight scaling
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WeightsConfig {
    #[serde(alias = "Inh2Exc")]
    pub inh2exc: f32,
    #[serde(alias = "Exc2Inh")]
    pub exc2inh: f32,
    #[serde(alias = "Exc2Exc")]
    pub exc2exc: f32,
    #[serde(alias = "SensorySource")]
    pub sensory_source: f32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            inh2exc: -0.49,
            exc2inh: 0.75,
            exc2exc: 0.75,
            sensory_source: 0.75,
        }
    }
}

/// Tick loop settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// "sequential", "parallel" or "auto"
    pub backend: String,
    pub parallel_neuron_threshold: usize,
    pub synaptic_delivery: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updates_per_frame: Option<usize>,
    /// Ticks to run; 0 = until interrupted
    pub ticks: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            backend: "auto".to_string(),
            parallel_neuron_threshold: 4096,
            synaptic_delivery: true,
            updates_per_frame: None,
            ticks: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_updates_per_frame() {
        assert_eq!(derive_updates_per_frame(100_000), 1);
        assert_eq!(derive_updates_per_frame(100_002), 5);
        assert_eq!(derive_updates_per_frame(102_400_000), 5);
        assert_eq!(derive_updates_per_frame(102_400_002), 10);

        let mut config = SnngineConfig::default();
        assert_eq!(config.updates_per_frame(), 1);
        config.simulation.updates_per_frame = Some(3);
        assert_eq!(config.updates_per_frame(), 3);
    }

    #[test]
    fn test_short_aliases() {
        let config: SnngineConfig = toml::from_str(
            r#"
            [network]
            n = 2000
            s = 40
            d = 5
            t = 100

            [weights]
            Inh2Exc = -0.3
            "#,
        )
        .unwrap();
        assert_eq!(config.network.neurons, 2000);
        assert_eq!(config.network.fan_out, Some(40));
        assert_eq!(config.network.max_delay, Some(5));
        assert_eq!(config.network.record_duration, 100);
        assert_eq!(config.weights.inh2exc, -0.3);
        assert_eq!(config.weights.exc2inh, 0.75);
    }

    #[test]
    fn test_explicit_neuron_types_and_log_dir() {
        let config: SnngineConfig = toml::from_str(
            r#"
            [system]
            log_dir = "logs"

            [network]
            n = 4
            neuron_types = ["inhibitory", "excitatory", "excitatory", "inhibitory"]
            "#,
        )
        .unwrap();
        assert_eq!(config.system.log_dir, Some(PathBuf::from("logs")));
        assert_eq!(
            config.network.neuron_types,
            Some(vec![
                NeuronType::Inhibitory,
                NeuronType::Excitatory,
                NeuronType::Excitatory,
                NeuronType::Inhibitory,
            ])
        );

        let text = toml::to_string(&config).unwrap();
        assert!(text.contains(r#""excitatory""#));
        let reparsed: SnngineConfig = toml::from_str(&text).unwrap();
        assert_eq!(reparsed, config);

        let unknown = "[network]\nneuron_types = [\"pyramidal\"]";
        assert!(toml::from_str::<SnngineConfig>(unknown).is_err());
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(SnngineConfig::default()).unwrap();
        assert_eq!(json["thalamic_input"]["inh_current"], 25.0);
        assert_eq!(json["simulation"]["backend"], "auto");
    }
}
