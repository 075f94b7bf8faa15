// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 hsc-projects
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neuron Model Architecture
//!
//! Trait-based neuron models. The engine currently ships the Izhikevich
//! quadratic integrate-and-fire model; the traits keep the kernel generic over
//! the parameter set so other point models can slot in.
//!
//! ## Adding a New Neuron Model
//!
//! 1. Create `src/models/your_model.rs`
//! 2. Implement `NeuronModel` trait
//! 3. Add tests
//! 4. Export in `mod.rs`

pub mod izhikevich;
pub mod traits;

// Re-export core types
pub use izhikevich::{IzhikevichModel, IzhikevichParameters};
pub use traits::{ModelParameters, NeuronModel};
