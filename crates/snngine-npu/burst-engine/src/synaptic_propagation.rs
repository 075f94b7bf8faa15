// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 hsc-projects
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Synaptic Propagation
//!
//! Routes spikes of tick `t` through the fixed fan-out matrix:
//!
//! ```text
//! for n with fired[n] == t:
//!     for d in 0..buckets:
//!         for slot in delay_index[d,n] .. delay_index[d+1,n]:
//!             ring[t + 1 + d][targets[slot,n]] += weights[slot,n] * scale(type[n], type[target])
//! ```
//!
//! Contributions are collected in parallel per fired neuron, then accumulated
//! sequentially in fired-index order so sums do not depend on thread count.

use rayon::prelude::*;
use snngine_npu_neural::{NeuronType, Tick};
use snngine_npu_runtime::SynapseStorage;

/// Magnitudes applied to synaptic weights by (pre, post) type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynapticScales {
    pub inh2exc: f32,
    pub exc2inh: f32,
    pub exc2exc: f32,
}

impl Default for SynapticScales {
    fn default() -> Self {
        Self {
            inh2exc: -0.49,
            exc2inh: 0.75,
            exc2exc: 0.75,
        }
    }
}

impl SynapticScales {
    /// Scale for a synapse from `pre` onto `post`
    ///
    /// Only the magnitude is used; the weight already carries the sign.
    /// Inhibitory to inhibitory synapses are unscaled.
    #[inline]
    pub fn scale(&self, pre: NeuronType, post: NeuronType) -> f32 {
        match (pre, post) {
            (NeuronType::Inhibitory, NeuronType::Excitatory) => self.inh2exc.abs(),
            (NeuronType::Excitatory, NeuronType::Inhibitory) => self.exc2inh.abs(),
            (NeuronType::Excitatory, NeuronType::Excitatory) => self.exc2exc.abs(),
            (NeuronType::Inhibitory, NeuronType::Inhibitory) => 1.0,
        }
    }
}

/// Pending synaptic current, one dense slot per future tick
///
/// Slot count is `delay buckets + 1`, fixed for the run.
#[derive(Debug, Clone)]
pub struct DelayRing {
    neuron_count: usize,
    slots: Vec<Vec<f32>>,
}

impl DelayRing {
    pub fn new(neuron_count: usize, delay_buckets: usize) -> Self {
        Self {
            neuron_count,
            slots: vec![vec![0.0; neuron_count]; delay_buckets + 1],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn slot_of(&self, tick: Tick) -> usize {
        (tick % self.slots.len() as u64) as usize
    }

    /// Add `value` to `target`'s input at `due_tick`
    #[inline]
    pub fn schedule(&mut self, due_tick: Tick, target: u32, value: f32) {
        let slot = self.slot_of(due_tick);
        if let Some(cell) = self.slots[slot].get_mut(target as usize) {
            *cell += value;
        }
    }

    /// Move everything due at `tick` into `i` and clear the slot
    pub fn drain_into(&mut self, tick: Tick, i: &mut [f32]) {
        let slot = self.slot_of(tick);
        for (current, pending) in i.iter_mut().zip(self.slots[slot].iter_mut()) {
            *current += *pending;
            *pending = 0.0;
        }
    }

    /// Sum of everything still scheduled
    pub fn pending_total(&self) -> f32 {
        self.slots.iter().flatten().sum()
    }

    /// Drop all pending current
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.fill(0.0);
        }
    }

    pub fn memory_bytes(&self) -> usize {
        self.slots.len() * self.neuron_count * std::mem::size_of::<f32>()
    }
}

/// Schedule the outgoing current of every neuron in `fired` (spikes of `tick`)
///
/// Returns the number of synaptic events scheduled.
pub fn propagate_spikes<S: SynapseStorage>(
    synapses: &S,
    neuron_types: &[NeuronType],
    fired: &[u32],
    scales: &SynapticScales,
    ring: &mut DelayRing,
    tick: Tick,
) -> usize {
    if fired.is_empty() || synapses.fan_out() == 0 {
        return 0;
    }

    let buckets = synapses.delay_bucket_count();
    let contributions: Vec<(usize, u32, f32)> = fired
        .par_iter()
        .flat_map_iter(|&pre| {
            let pre = pre as usize;
            let pre_type = neuron_types[pre];
            (0..buckets).flat_map(move |delay| {
                synapses.delay_bucket(pre, delay).map(move |slot| {
                    let target = synapses.target(slot, pre);
                    let post_type = neuron_types[target as usize];
                    let value = synapses.weight(slot, pre) * scales.scale(pre_type, post_type);
                    (delay, target, value)
                })
            })
        })
        .collect();

    for &(delay, target, value) in &contributions {
        ring.schedule(tick + 1 + delay as u64, target, value);
    }
    contributions.len()
}
