// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 hsc-projects
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Izhikevich Neuron Model
//!
//! Quadratic integrate-and-fire with a linear recovery variable.
//!
//! ## Model Dynamics
//!
//! ```text
//! Spike check (start of tick):
//!     if v > 30:
//!         v = c
//!         u = u + d
//!         fired = t
//!
//! Integration (two half-ms Euler steps):
//!     v += 0.5 × (0.04v² + 5v + 140 − u + i)
//!     v += 0.5 × (0.04v² + 5v + 140 − u + i)
//!     u += a × (b·v − u)
//!     i  = 0
//! ```
//!
//! The threshold is checked *before* integrating, so a neuron that crossed
//! 30 mV during tick `t-1` records `fired = t`. Observers treat `fired == t`
//! as "in its reset tick t". The membrane potential is not clamped.
//!
//! ## Parameter Draw
//!
//! ```text
//! a = 0.02 + 0.08 × r × type
//! b = 0.2  + 0.05 × (1 − r) × type
//! c = −65  + 15 × r² × (1 − type)
//! d = 2 × type + (8 − 6r²) × (1 − type)
//! ```

use super::traits::{ModelParameters, NeuronModel};
use crate::types::{NeuronType, Tick, NOT_FIRED};

/// Spike detection threshold (mV)
pub const SPIKE_THRESHOLD_MV: f32 = 30.0;

/// Membrane potential every neuron starts at (mV)
pub const V_INITIAL_MV: f32 = -65.0;

/// Izhikevich model marker
#[derive(Debug, Clone, Copy, Default)]
pub struct IzhikevichModel;

impl IzhikevichModel {
    pub fn new() -> Self {
        Self
    }
}

/// Per-neuron model constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IzhikevichParameters {
    /// Recovery time scale
    pub a: f32,
    /// Recovery sensitivity to sub-threshold v
    pub b: f32,
    /// After-spike reset of v (mV)
    pub c: f32,
    /// After-spike increment of u
    pub d: f32,
}

impl IzhikevichParameters {
    /// Regular spiking cortical cell
    pub const REGULAR_SPIKING: Self = Self {
        a: 0.02,
        b: 0.2,
        c: -65.0,
        d: 8.0,
    };

    pub fn with_values(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    /// Derive the constants from a uniform draw `r` and the neuron's type bit
    pub fn from_draw(r: f32, neuron_type: NeuronType) -> Self {
        let ty = neuron_type.bit();
        let r2 = r * r;
        Self {
            a: 0.02 + 0.08 * r * ty,
            b: 0.2 + 0.05 * (1.0 - r) * ty,
            c: -65.0 + 15.0 * r2 * (1.0 - ty),
            d: 2.0 * ty + (8.0 - 6.0 * r2) * (1.0 - ty),
        }
    }
}

impl Default for IzhikevichParameters {
    fn default() -> Self {
        Self::REGULAR_SPIKING
    }
}

impl ModelParameters for IzhikevichParameters {
    fn validate(&self) -> Result<(), &'static str> {
        if !(self.a.is_finite() && self.b.is_finite() && self.c.is_finite() && self.d.is_finite())
        {
            return Err("Izhikevich: parameters must be finite");
        }
        if self.a <= 0.0 {
            return Err("Izhikevich: recovery time scale a must be positive");
        }
        if self.c >= SPIKE_THRESHOLD_MV {
            return Err("Izhikevich: reset potential c must be below the spike threshold");
        }
        Ok(())
    }
}

/// Dynamic per-neuron state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IzhikevichState {
    pub v: f32,
    pub u: f32,
    pub i: f32,
}

impl NeuronModel for IzhikevichModel {
    type Parameters = IzhikevichParameters;
    type State = IzhikevichState;

    fn initial_state(&self, params: &IzhikevichParameters) -> IzhikevichState {
        IzhikevichState {
            v: V_INITIAL_MV,
            u: params.b * V_INITIAL_MV,
            i: 0.0,
        }
    }

    #[inline(always)]
    fn step(&self, state: &mut IzhikevichState, params: &IzhikevichParameters, tick: Tick) -> Tick {
        update_neuron_izhikevich(
            &mut state.v,
            &mut state.u,
            &mut state.i,
            params,
            tick,
        )
    }
}

/// Current added by the thalamic gate for one neuron
///
/// Returns `thalamic_current(type) * rt` when `r < pt`, else 0.
#[inline(always)]
pub fn thalamic_injection(
    r: f32,
    pt: f32,
    rt: f32,
    neuron_type: NeuronType,
    inh_current: f32,
    exc_current: f32,
) -> f32 {
    if r < pt {
        let current = match neuron_type {
            NeuronType::Excitatory => exc_current,
            NeuronType::Inhibitory => inh_current,
        };
        current * rt
    } else {
        0.0
    }
}

/// One half-ms Euler step of the membrane equation
#[inline(always)]
pub fn integrate_half_step(v: f32, u: f32, i: f32) -> f32 {
    v + 0.5 * (0.04 * v * v + 5.0 * v + 140.0 - u + i)
}

/// Spike check, reset, integration and current consumption for one neuron
///
/// Returns the firing tick (`tick`) or [`NOT_FIRED`]. Any thalamic,
/// synaptic or sensory current must already be in `i`.
#[inline(always)]
pub fn update_neuron_izhikevich(
    v: &mut f32,
    u: &mut f32,
    i: &mut f32,
    params: &IzhikevichParameters,
    tick: Tick,
) -> Tick {
    let mut fired = NOT_FIRED;
    if *v > SPIKE_THRESHOLD_MV {
        *v = params.c;
        *u += params.d;
        fired = tick;
    }

    *v = integrate_half_step(*v, *u, *i);
    *v = integrate_half_step(*v, *u, *i);
    *u += params.a * (params.b * *v - *u);
    *i = 0.0;

    fired
}
