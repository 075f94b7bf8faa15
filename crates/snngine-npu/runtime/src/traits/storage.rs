// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Neuron and synapse storage traits

use core::ops::Range;
use snngine_npu_neural::NeuronType;

/// One row of the 8-row neuron state-of-the-world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateRow {
    /// Thalamic injection probability gate
    Pt = 0,
    /// Recovery variable
    U = 1,
    /// Membrane potential
    V = 2,
    /// Recovery time scale
    A = 3,
    /// Recovery sensitivity
    B = 4,
    /// After-spike reset of v
    C = 5,
    /// After-spike increment of u
    D = 6,
    /// Instantaneous input current
    I = 7,
}

impl StateRow {
    /// All rows in storage order
    pub const ALL: [StateRow; 8] = [
        StateRow::Pt,
        StateRow::U,
        StateRow::V,
        StateRow::A,
        StateRow::B,
        StateRow::C,
        StateRow::D,
        StateRow::I,
    ];

    /// Row label as used in exported state matrices
    pub fn label(self) -> &'static str {
        match self {
            StateRow::Pt => "pt",
            StateRow::U => "u",
            StateRow::V => "v",
            StateRow::A => "a",
            StateRow::B => "b",
            StateRow::C => "c",
            StateRow::D => "d",
            StateRow::I => "i",
        }
    }
}

/// Simultaneous borrow of every neuron row, split by mutability
///
/// Only `u`, `v` and `i` change during stepping.
pub struct NeuronColumnsMut<'a> {
    /// Thalamic injection probability gate
    pub pt: &'a [f32],
    /// Recovery time scale
    pub a: &'a [f32],
    /// Recovery sensitivity
    pub b: &'a [f32],
    /// After-spike reset of v
    pub c: &'a [f32],
    /// After-spike increment of u
    pub d: &'a [f32],
    /// Neuron classification
    pub neuron_types: &'a [NeuronType],
    /// Recovery variable
    pub u: &'a mut [f32],
    /// Membrane potential
    pub v: &'a mut [f32],
    /// Input current accumulated for the current tick
    pub i: &'a mut [f32],
}

/// Neuron storage trait: structure-of-arrays access to the state pool
///
/// # Design Notes
///
/// - Slice-based API for zero-copy access
/// - Mutations are explicit via `_mut()` methods
/// - Every slice has length [`NeuronStorage::count`]
pub trait NeuronStorage: Send + Sync {
    // === Read-Only ===

    /// Thalamic injection probability gate
    fn pt(&self) -> &[f32];

    /// Recovery variable
    fn u(&self) -> &[f32];

    /// Membrane potential
    fn v(&self) -> &[f32];

    /// Recovery time scale
    fn a(&self) -> &[f32];

    /// Recovery sensitivity
    fn b(&self) -> &[f32];

    /// After-spike reset value of v
    fn c(&self) -> &[f32];

    /// After-spike increment of u
    fn d(&self) -> &[f32];

    /// Input current for the tick being assembled
    fn i(&self) -> &[f32];

    /// Neuron classification (immutable after construction)
    fn neuron_types(&self) -> &[NeuronType];

    /// Any row by name
    fn row(&self, row: StateRow) -> &[f32] {
        match row {
            StateRow::Pt => self.pt(),
            StateRow::U => self.u(),
            StateRow::V => self.v(),
            StateRow::A => self.a(),
            StateRow::B => self.b(),
            StateRow::C => self.c(),
            StateRow::D => self.d(),
            StateRow::I => self.i(),
        }
    }

    // === Mutable ===

    /// Mutable recovery variable
    fn u_mut(&mut self) -> &mut [f32];

    /// Mutable membrane potential
    fn v_mut(&mut self) -> &mut [f32];

    /// Mutable input current
    fn i_mut(&mut self) -> &mut [f32];

    /// Borrow all rows at once for the update kernel
    fn columns_mut(&mut self) -> NeuronColumnsMut<'_>;

    // === Metadata ===

    /// Number of neurons (N)
    fn count(&self) -> usize;
}

/// Synapse storage trait: fixed fan-out, delay-bucketed topology
///
/// Matrices are row-major: element `[s, n]` lives at `s * N + n`, so the
/// column of presynaptic neuron `n` is strided by N.
pub trait SynapseStorage: Send + Sync {
    /// Number of neurons (N)
    fn neuron_count(&self) -> usize;

    /// Fan-out per neuron (S)
    fn fan_out(&self) -> usize;

    /// Maximum delay in ticks (D)
    fn max_delay(&self) -> usize;

    /// S×N postsynaptic targets
    fn targets(&self) -> &[u32];

    /// (D+1)×N cumulative delay counts
    fn delay_index(&self) -> &[u32];

    /// S×N signed weights
    fn weights(&self) -> &[f32];

    /// Number of delay buckets; `D = 0` still has one zero-delay bucket
    fn delay_bucket_count(&self) -> usize {
        self.max_delay().max(1)
    }

    /// Synapse slots `s` of neuron `n` whose delay is `delay`
    fn delay_bucket(&self, neuron: usize, delay: usize) -> Range<usize> {
        let n_count = self.neuron_count();
        if self.max_delay() == 0 {
            return if delay == 0 { 0..self.fan_out() } else { 0..0 };
        }
        if delay >= self.max_delay() {
            return 0..0;
        }
        let index = self.delay_index();
        let start = index[delay * n_count + neuron] as usize;
        let end = index[(delay + 1) * n_count + neuron] as usize;
        start..end.max(start)
    }

    /// Target of synapse slot `s` of neuron `n`
    #[inline(always)]
    fn target(&self, slot: usize, neuron: usize) -> u32 {
        self.targets()[slot * self.neuron_count() + neuron]
    }

    /// Weight of synapse slot `s` of neuron `n`
    #[inline(always)]
    fn weight(&self, slot: usize, neuron: usize) -> f32 {
        self.weights()[slot * self.neuron_count() + neuron]
    }

    /// Total number of synapses (S × N)
    fn synapse_count(&self) -> usize {
        self.fan_out() * self.neuron_count()
    }
}
