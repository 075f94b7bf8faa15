// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 hsc-projects
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! # SNNgine Runtime Storage
//!
//! Storage for the two long-lived data sets of a simulation run:
//! - **Neuron state**: the 8-row state-of-the-world (`pt,u,v,a,b,c,d,i`) plus
//!   the neuron type vector, stored structure-of-arrays
//! - **Topology**: the flat S×N target and weight matrices plus the
//!   (D+1)×N cumulative delay index
//!
//! The traits (`NeuronStorage`, `SynapseStorage`) are what the burst engine
//! is written against; `std_impl` provides the Vec-backed implementations.
//!
//! ## Usage
//!
//! ```rust
//! use snngine_npu_runtime::{NeuronStatePool, NeuronStorage};
//! use snngine_npu_neural::NeuronType;
//!
//! let types = vec![NeuronType::Inhibitory, NeuronType::Excitatory];
//! let pool = NeuronStatePool::from_draws(types, &[0.5, 0.5], &[0.1, 0.9]).unwrap();
//! assert_eq!(pool.count(), 2);
//! assert_eq!(pool.v(), &[-65.0, -65.0]);
//! ```

#![warn(missing_docs)]

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Traits module (always available)
pub mod traits;

// Vec-backed implementations
pub mod std_impl;

// Re-export traits
pub use traits::{NeuronColumnsMut, NeuronStorage, StateRow, SynapseStorage};

// Re-export implementations
pub use std_impl::{NeuronStatePool, SynapseMatrix};
