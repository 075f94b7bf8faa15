// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 hsc-projects
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # SNNgine Neural Computation (Platform-Agnostic)
//!
//! ALL per-neuron computation in one place:
//! - **Types**: Core type definitions (NeuronType, Tick, errors)
//! - **Models**: Neuron models (Izhikevich quadratic integrate-and-fire)
//!
//! Nothing in this crate allocates or touches more than one neuron at a time,
//! so the same functions back the sequential path, the rayon path, and any
//! future GPU kernel port.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Core type definitions
pub mod types;

// Neuron models
pub mod models;

// Re-export types
pub use types::{NeuronType, Result, SnnError, Tick, NOT_FIRED};

// Re-export neuron models
pub use models::izhikevich::{
    integrate_half_step, thalamic_injection, update_neuron_izhikevich, IzhikevichModel,
    IzhikevichParameters, IzhikevichState, SPIKE_THRESHOLD_MV, V_INITIAL_MV,
};
pub use models::{ModelParameters, NeuronModel};
