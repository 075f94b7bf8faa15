// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*!
# SNNgine Brain Development

Builds everything a simulation run needs before its first tick:
- **Neurogenesis**: per-neuron parameter draws into a `NeuronStatePool`
- **Synaptogenesis**: fixed fan-out targets, delay buckets and signed weights
  into a `SynapseMatrix`
- **Sizing**: fan-out (S) and maximum delay (D) derived from the neuron count
- **Type layouts**: excitatory/inhibitory assignment

## Determinism

Every random quantity is drawn from a stream keyed by `(seed, purpose,
neuron)`. Construction runs on rayon, and the result depends only on the
seed, never on the thread count.

Copyright 2025 hsc-projects
Licensed under the Apache License, Version 2.0
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod connectivity;
pub mod neurogenesis;
pub mod neuron_types;
pub mod rng;

pub use connectivity::{
    derive_fan_out, derive_max_delay, generate_delay_index, generate_targets, generate_weights,
    ConnectivityBuilder, NetworkShape, EXCITATORY_WEIGHT_BOOST, MAX_DERIVED_FAN_OUT,
    MAX_DERIVED_DELAY,
};
pub use neurogenesis::{generate_state_pool, quantize_draw};
pub use neuron_types::TypeLayout;
pub use rng::{resolve_seed, stream_rng, Stream};
