// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Neuron model traits

use crate::types::Tick;

/// Parameters owned by one neuron for a given model
pub trait ModelParameters: Copy + Send + Sync {
    /// Check the parameter set for values the model cannot integrate
    fn validate(&self) -> Result<(), &'static str>;
}

/// A point neuron model advanced one tick at a time
///
/// Implementations must be pure per-neuron functions: no state outside the
/// arguments, so a backend can call them from any thread in any order.
pub trait NeuronModel: Send + Sync {
    type Parameters: ModelParameters;
    type State: Copy;

    /// Initial dynamic state for a neuron with `params`
    fn initial_state(&self, params: &Self::Parameters) -> Self::State;

    /// Advance one tick; returns `tick` if the neuron reset this tick, else 0
    fn step(&self, state: &mut Self::State, params: &Self::Parameters, tick: Tick) -> Tick;
}
