// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Config-to-driver wiring
//!
//! One base seed drives every construction stream (neuron draws, targets,
//! delays, weights) and the driver's per-tick draws, so a seeded config
//! reproduces the whole run.

use snngine_brain_development::{generate_state_pool, resolve_seed, ConnectivityBuilder, TypeLayout};
use snngine_config::SnngineConfig;
use snngine_npu_burst_engine::{
    BackendConfig, BackendType, SensoryInput, SimulationDriver, SimulationParams,
    SynapticScales, ThalamicCurrents,
};
use snngine_npu_neural::Result;
use std::time::Instant;
use tracing::info;

/// Explicit type list if configured, else the excitatory fraction, else half/half
pub fn type_layout(config: &SnngineConfig) -> TypeLayout {
    if let Some(types) = &config.network.neuron_types {
        return TypeLayout::Explicit(types.clone());
    }
    match config.network.excitatory_fraction {
        Some(fraction) => TypeLayout::ExcitatoryFraction(fraction),
        None => TypeLayout::HalfSplit,
    }
}

/// Driver parameters from the config, with the driver seeded by `seed`
pub fn simulation_params(config: &SnngineConfig, seed: Option<u64>) -> Result<SimulationParams> {
    let simulation = &config.simulation;
    let backend = BackendConfig {
        backend_type: simulation.backend.parse::<BackendType>()?,
        parallel_neuron_threshold: simulation.parallel_neuron_threshold,
        num_threads: match config.system.max_cores {
            0 => None,
            cores => Some(cores),
        },
    };

    let inputs = &config.sensory_input;
    let mut sensory = SensoryInput::new(
        [inputs.input_current0, inputs.input_current1],
        config.weights.sensory_source,
    );
    let n = config.network.neurons;
    sensory.set_neurons(0, inputs.neurons0.clone(), n)?;
    sensory.set_neurons(1, inputs.neurons1.clone(), n)?;

    Ok(SimulationParams {
        thalamic: ThalamicCurrents {
            inh: config.thalamic_input.inh_current,
            exc: config.thalamic_input.exc_current,
        },
        scales: SynapticScales {
            inh2exc: config.weights.inh2exc,
            exc2inh: config.weights.exc2inh,
            exc2exc: config.weights.exc2exc,
        },
        sensory,
        synaptic_delivery: simulation.synaptic_delivery,
        history_window: config.network.record_duration,
        backend,
        seed,
    })
}

/// Build the state pool, topology and driver described by `config`
///
/// # Errors
/// Any construction error: odd N, S or D out of range, bad sensory indices,
/// unknown backend name.
pub fn build_driver(config: &SnngineConfig) -> Result<SimulationDriver> {
    let start = Instant::now();
    let n = config.network.neurons;
    let seed = resolve_seed(config.network.seed);

    let types = type_layout(config).build(n)?;
    let mut builder = ConnectivityBuilder::new(n).seed(seed);
    if let Some(fan_out) = config.network.fan_out {
        builder = builder.fan_out(fan_out);
    }
    if let Some(max_delay) = config.network.max_delay {
        builder = builder.max_delay(max_delay);
    }
    let synapses = builder.build(&types)?;
    let neurons = generate_state_pool(types, seed)?;

    let driver = SimulationDriver::new(neurons, synapses, simulation_params(config, Some(seed))?)?;
    info!(
        "[NETWORK] Network ready in {:?} (seed={}, {:.1} MiB)",
        start.elapsed(),
        seed,
        driver.memory_bytes() as f64 / (1024.0 * 1024.0)
    );
    Ok(driver)
}
