// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! # Neural Types Module
//!
//! Core type definitions shared by every layer of the simulation core.

pub mod error;
pub mod ids;
pub mod neuron_type;

pub use error::{Result, SnnError};
pub use ids::{Tick, NOT_FIRED};
pub use neuron_type::NeuronType;
