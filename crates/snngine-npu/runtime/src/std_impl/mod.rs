// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! # Vec-backed storage
//!
//! Desktop/server implementations of the storage traits. Each array is
//! allocated once at construction and never resized: memory is O(N) for the
//! state pool and O(S·N) for the topology for the whole run.

/// Neuron state-of-the-world
pub mod neuron_state_pool;
/// Flat fan-out/delay/weight matrices
pub mod synapse_matrix;

pub use neuron_state_pool::{NeuronColumns, NeuronStatePool};
pub use synapse_matrix::{SynapseMatrix, MAX_DELAY_LIMIT};
