// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! # SNNgine - spiking neural network simulation core
//!
//! Izhikevich neurons with randomized fixed fan-out connectivity and
//! delay-bucketed synaptic routing. This crate re-exports the workspace
//! members and wires a [`config::SnngineConfig`] into a ready-to-run
//! [`burst_engine::SimulationDriver`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snngine::prelude::*;
//!
//! let mut config = SnngineConfig::default();
//! config.network.neurons = 2_000;
//! config.network.seed = Some(42);
//!
//! let mut driver = snngine::build_driver(&config)?;
//! driver.run(100)?;
//! println!("{} spikes", driver.stats().total_spikes);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: snngine-npu-neural                         │
//! │  (NeuronType, Tick, SnnError, Izhikevich math)          │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Storage: snngine-npu-runtime                           │
//! │  (NeuronStatePool, SynapseMatrix)                       │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Algorithms: burst-engine, brain-development            │
//! │  (update kernel, delivery, driver, synaptogenesis)      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Ambient: snngine-config, snngine-observability         │
//! │  (TOML config, logging)                                 │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use snngine_npu_neural as neural;
pub use snngine_npu_runtime as runtime;

// Re-export algorithms
pub use snngine_brain_development as brain_development;
pub use snngine_npu_burst_engine as burst_engine;

// Re-export ambient crates
pub use snngine_config as config;
pub use snngine_observability as observability;

pub mod network;

pub use network::{build_driver, simulation_params, type_layout};

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::neural::{NeuronType, SnnError, Tick, NOT_FIRED};
    pub use crate::runtime::{NeuronStatePool, NeuronStorage, SynapseMatrix, SynapseStorage};

    pub use crate::burst_engine::{
        BackendType, ParameterUpdate, ParameterUpdateQueue, SimulationDriver, SimulationParams,
        SimulationStats, TickObserver, TickSnapshot, TickSummary,
    };

    pub use crate::brain_development::{generate_state_pool, ConnectivityBuilder, TypeLayout};

    pub use crate::config::{load_config, load_config_or_default, SnngineConfig};
    pub use crate::observability::{init_logging, CrateDebugFlags, LoggingConfig};

    pub use crate::network::build_driver;
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        use crate::prelude::*;
        assert_eq!(NOT_FIRED, 0);
        assert!(!NeuronType::Inhibitory.is_excitatory());
    }
}
