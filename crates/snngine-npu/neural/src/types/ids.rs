// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Timestep identity

/// Discrete simulation timestep
pub type Tick = u64;

/// Value of a `fired` entry for a neuron that did not reset this tick.
///
/// Tick counting starts at 1, so a real firing tick is never 0.
pub const NOT_FIRED: Tick = 0;
