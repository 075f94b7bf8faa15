// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 hsc-projects
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neural Dynamics
//!
//! The per-tick update kernel: thalamic injection, spike check and reset,
//! two half-step Euler integration, current consumption.
//!
//! ## Performance Critical Path
//! This is the hottest code path of a run. Each neuron reads and writes only
//! its own column, so the parallel variant is a zip over the mutable rows with
//! no synchronization inside a call.

use rayon::prelude::*;
use snngine_npu_neural::{
    thalamic_injection, update_neuron_izhikevich, IzhikevichParameters, NeuronType, Result,
    SnnError, Tick, NOT_FIRED,
};
use snngine_npu_runtime::NeuronColumnsMut;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::trace;

/// Runtime-gated tracing config for neural dynamics.
/// Enable with:
/// - SNNGINE_TRACE_DYNAMICS=1
/// Optional filters:
/// - SNNGINE_TRACE_NEURON=<u32 neuron index> (single neuron)
struct DynamicsTraceCfg {
    enabled: bool,
    neuron_filter: Option<u32>,
}

fn dynamics_trace_cfg() -> &'static DynamicsTraceCfg {
    static CFG: OnceLock<DynamicsTraceCfg> = OnceLock::new();
    CFG.get_or_init(|| {
        let enabled = std::env::var("SNNGINE_TRACE_DYNAMICS")
            .ok()
            .as_deref()
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let neuron_filter = std::env::var("SNNGINE_TRACE_NEURON")
            .ok()
            .and_then(|v| v.parse().ok());

        DynamicsTraceCfg {
            enabled,
            neuron_filter,
        }
    })
}

/// Thalamic background currents by neuron type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThalamicCurrents {
    /// Current for inhibitory neurons
    pub inh: f32,
    /// Current for excitatory neurons
    pub exc: f32,
}

impl Default for ThalamicCurrents {
    fn default() -> Self {
        Self {
            inh: 25.0,
            exc: 15.0,
        }
    }
}

/// Everything the kernel consumes besides the state pool
#[derive(Debug, Clone, Copy)]
pub struct TickInputs<'a> {
    /// Tick being computed (written into `fired` on reset)
    pub tick: Tick,
    /// Per-neuron uniform draw gating thalamic injection
    pub r: &'a [f32],
    /// Per-neuron thalamic drive
    pub rt: &'a [f32],
    pub thalamic: ThalamicCurrents,
}

/// Result of one kernel call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicsResult {
    pub neurons_processed: usize,
    pub neurons_fired: usize,
    /// Neurons whose thalamic gate opened this tick
    pub thalamic_injections: usize,
}

/// Check every slice the kernel indexes against N
pub fn validate_tick_inputs(
    neuron_count: usize,
    columns: &NeuronColumnsMut<'_>,
    inputs: &TickInputs<'_>,
    fired: &[Tick],
) -> Result<()> {
    SnnError::check_len("r", neuron_count, inputs.r.len())?;
    SnnError::check_len("rt", neuron_count, inputs.rt.len())?;
    SnnError::check_len("fired", neuron_count, fired.len())?;
    SnnError::check_len("pt", neuron_count, columns.pt.len())?;
    SnnError::check_len("u", neuron_count, columns.u.len())?;
    SnnError::check_len("v", neuron_count, columns.v.len())?;
    SnnError::check_len("a", neuron_count, columns.a.len())?;
    SnnError::check_len("b", neuron_count, columns.b.len())?;
    SnnError::check_len("c", neuron_count, columns.c.len())?;
    SnnError::check_len("d", neuron_count, columns.d.len())?;
    SnnError::check_len("i", neuron_count, columns.i.len())?;
    SnnError::check_len("neuron_types", neuron_count, columns.neuron_types.len())?;
    Ok(())
}

/// Full transition of neuron `n`; returns (fired tick or 0, gate opened)
#[allow(clippy::too_many_arguments)]
#[inline(always)]
fn update_single_neuron(
    n: usize,
    v: &mut f32,
    u: &mut f32,
    i: &mut f32,
    pt: f32,
    params: &IzhikevichParameters,
    neuron_type: NeuronType,
    inputs: &TickInputs<'_>,
) -> (Tick, bool) {
    let injected = thalamic_injection(
        inputs.r[n],
        pt,
        inputs.rt[n],
        neuron_type,
        inputs.thalamic.inh,
        inputs.thalamic.exc,
    );
    let gated = inputs.r[n] < pt;
    *i += injected;

    let cfg = dynamics_trace_cfg();
    if cfg.enabled && cfg.neuron_filter.map_or(true, |f| f as usize == n) {
        trace!(
            "[DYNAMICS] tick={} n={} pre: v={:.4} u={:.4} i={:.4} gated={}",
            inputs.tick,
            n,
            *v,
            *u,
            *i,
            gated
        );
    }

    let fired = update_neuron_izhikevich(v, u, i, params, inputs.tick);

    if cfg.enabled && cfg.neuron_filter.map_or(true, |f| f as usize == n) {
        trace!(
            "[DYNAMICS] tick={} n={} post: v={:.4} u={:.4} fired={}",
            inputs.tick,
            n,
            *v,
            *u,
            fired
        );
    }

    (fired, gated)
}

/// Kernel over all neurons on the current rayon pool
///
/// Lengths must have been checked with [`validate_tick_inputs`].
pub fn process_neural_dynamics_parallel(
    columns: NeuronColumnsMut<'_>,
    inputs: &TickInputs<'_>,
    fired: &mut [Tick],
) -> DynamicsResult {
    let start = Instant::now();
    let NeuronColumnsMut {
        pt,
        a,
        b,
        c,
        d,
        neuron_types,
        u,
        v,
        i,
    } = columns;
    let neurons_processed = v.len();

    let (neurons_fired, thalamic_injections) = v
        .par_iter_mut()
        .zip(u.par_iter_mut())
        .zip(i.par_iter_mut())
        .zip(fired.par_iter_mut())
        .enumerate()
        .map(|(n, (((v, u), i), fired))| {
            let params = IzhikevichParameters::with_values(a[n], b[n], c[n], d[n]);
            let (tick, gated) =
                update_single_neuron(n, v, u, i, pt[n], &params, neuron_types[n], inputs);
            *fired = tick;
            ((tick != NOT_FIRED) as usize, gated as usize)
        })
        .reduce(|| (0, 0), |x, y| (x.0 + y.0, x.1 + y.1));

    warn_if_slow(start, neurons_processed, neurons_fired);
    DynamicsResult {
        neurons_processed,
        neurons_fired,
        thalamic_injections,
    }
}

/// Kernel over all neurons on the calling thread
pub fn process_neural_dynamics_sequential(
    columns: NeuronColumnsMut<'_>,
    inputs: &TickInputs<'_>,
    fired: &mut [Tick],
) -> DynamicsResult {
    let start = Instant::now();
    let NeuronColumnsMut {
        pt,
        a,
        b,
        c,
        d,
        neuron_types,
        u,
        v,
        i,
    } = columns;

    let mut result = DynamicsResult {
        neurons_processed: v.len(),
        ..Default::default()
    };
    for n in 0..v.len() {
        let params = IzhikevichParameters::with_values(a[n], b[n], c[n], d[n]);
        let (tick, gated) = update_single_neuron(
            n,
            &mut v[n],
            &mut u[n],
            &mut i[n],
            pt[n],
            &params,
            neuron_types[n],
            inputs,
        );
        fired[n] = tick;
        result.neurons_fired += (tick != NOT_FIRED) as usize;
        result.thalamic_injections += gated as usize;
    }

    warn_if_slow(start, result.neurons_processed, result.neurons_fired);
    result
}

fn warn_if_slow(start: Instant, processed: usize, fired: usize) {
    let duration = start.elapsed();
    // Log if dynamics processing is slow (>20ms)
    if duration.as_millis() > 20 {
        tracing::warn!(
            "[DYNAMICS] Slow dynamics processing: {:.2}ms for {} neurons, {} fired",
            duration.as_secs_f64() * 1000.0,
            processed,
            fired
        );
    }
}
