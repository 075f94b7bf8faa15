// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*!
Connectivity and synaptogenesis operations.

Fixed fan-out random topology laid out as flat S×N matrices.
*/

pub mod sizing;
pub mod synaptogenesis;

pub use sizing::{
    derive_fan_out, derive_max_delay, NetworkShape, MAX_DERIVED_DELAY, MAX_DERIVED_FAN_OUT,
};
pub use synaptogenesis::{
    generate_delay_index, generate_targets, generate_weights, ConnectivityBuilder,
    EXCITATORY_WEIGHT_BOOST,
};
