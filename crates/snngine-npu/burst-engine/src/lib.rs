// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 hsc-projects
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # SNNgine Burst Engine
//!
//! The per-tick hot path of a simulation run.
//!
//! ## Architecture
//! - **Neural dynamics**: Izhikevich update kernel over the state pool (rayon)
//! - **Backends**: sequential or data-parallel dispatch behind [`ComputeBackend`]
//! - **Synaptic propagation**: fired neurons → delay ring via the fan-out matrix
//! - **Driver**: tick counter, sensory input, live parameter updates, fire
//!   history, observers
//!
//! ## Performance Targets
//! - 100K neurons × 1000 synapses per neuron
//! - Memory fixed at O(S·N) for the whole run

pub mod backend;
pub mod fire_history;
pub mod neural_dynamics;
pub mod observer;
pub mod parameter_update_queue;
pub mod sensory;
pub mod simulation_driver;
pub mod synaptic_propagation;

pub use backend::{
    create_backend, select_backend, BackendConfig, BackendDecision, BackendType, ComputeBackend,
    CpuBackend,
};
pub use fire_history::{FireHistory, FireHistoryError};
pub use neural_dynamics::{
    process_neural_dynamics_parallel, process_neural_dynamics_sequential, validate_tick_inputs,
    DynamicsResult, ThalamicCurrents, TickInputs,
};
pub use observer::{TickObserver, TickSnapshot};
pub use parameter_update_queue::{ParameterUpdate, ParameterUpdateQueue};
pub use sensory::{SensoryChannel, SensoryInput, SENSORY_CHANNELS};
pub use simulation_driver::{
    SimulationDriver, SimulationParams, TickSummary, DEFAULT_HISTORY_WINDOW,
};
pub use synaptic_propagation::{propagate_spikes, DelayRing, SynapticScales};

/// Run totals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationStats {
    pub total_ticks: u64,
    pub total_spikes: u64,
    pub total_synaptic_events: u64,
    pub total_processing_time_us: u64,
}

impl SimulationStats {
    /// Get average spikes per tick
    pub fn avg_spikes_per_tick(&self) -> f64 {
        if self.total_ticks == 0 {
            0.0
        } else {
            self.total_spikes as f64 / self.total_ticks as f64
        }
    }

    /// Get average processing time per tick (microseconds)
    pub fn avg_tick_time_us(&self) -> f64 {
        if self.total_ticks == 0 {
            0.0
        } else {
            self.total_processing_time_us as f64 / self.total_ticks as f64
        }
    }

    /// Mean firing rate in Hz, one tick being 1 ms
    pub fn firing_rate_hz(&self, neuron_count: usize) -> f64 {
        if self.total_ticks == 0 || neuron_count == 0 {
            0.0
        } else {
            self.total_spikes as f64 * 1000.0 / (self.total_ticks as f64 * neuron_count as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_stats() {
        let stats = SimulationStats {
            total_ticks: 100,
            total_spikes: 10000,
            total_synaptic_events: 50000,
            total_processing_time_us: 1000000,
        };

        assert_eq!(stats.avg_spikes_per_tick(), 100.0);
        assert_eq!(stats.avg_tick_time_us(), 10000.0);
        assert_eq!(stats.firing_rate_hz(1000), 100.0);
        assert_eq!(SimulationStats::default().firing_rate_hz(10), 0.0);
    }
}
