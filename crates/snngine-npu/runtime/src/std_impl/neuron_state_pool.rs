// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 hsc-projects
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Neuron state pool (structure-of-arrays)

use crate::traits::{NeuronColumnsMut, NeuronStorage, StateRow};
use rayon::prelude::*;
use snngine_npu_neural::{
    IzhikevichModel, IzhikevichParameters, ModelParameters, NeuronModel, NeuronType, Result,
    SnnError,
};

/// Explicit per-row columns, for fixtures and replaying recorded state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeuronColumns {
    /// Thalamic injection probability gate
    pub pt: Vec<f32>,
    /// Recovery variable
    pub u: Vec<f32>,
    /// Membrane potential
    pub v: Vec<f32>,
    /// Recovery time scale
    pub a: Vec<f32>,
    /// Recovery sensitivity
    pub b: Vec<f32>,
    /// After-spike reset of v
    pub c: Vec<f32>,
    /// After-spike increment of u
    pub d: Vec<f32>,
    /// Input current
    pub i: Vec<f32>,
    /// Neuron classification
    pub neuron_types: Vec<NeuronType>,
}

/// Per-neuron state for the whole network
///
/// Every row has length N for the lifetime of the pool. `a,b,c,d,pt` and the
/// type vector are fixed at construction; only `u`, `v` and `i` are written
/// while stepping.
#[derive(Debug, Clone)]
pub struct NeuronStatePool {
    count: usize,
    pt: Vec<f32>,
    u: Vec<f32>,
    v: Vec<f32>,
    a: Vec<f32>,
    b: Vec<f32>,
    c: Vec<f32>,
    d: Vec<f32>,
    i: Vec<f32>,
    neuron_types: Vec<NeuronType>,
}

impl NeuronStatePool {
    /// Build the pool from per-neuron draws
    ///
    /// `r` drives the model constants, `pt` is the thalamic gate. N must be
    /// even and positive and both draw vectors must have length N.
    pub fn from_draws(neuron_types: Vec<NeuronType>, r: &[f32], pt: &[f32]) -> Result<Self> {
        let count = neuron_types.len();
        if count == 0 || count % 2 != 0 {
            return Err(SnnError::Configuration(format!(
                "neuron count must be even and positive, got {}",
                count
            )));
        }
        if r.len() != count {
            return Err(SnnError::Configuration(format!(
                "parameter draw vector has length {}, expected {}",
                r.len(),
                count
            )));
        }
        if pt.len() != count {
            return Err(SnnError::Configuration(format!(
                "thalamic gate vector has length {}, expected {}",
                pt.len(),
                count
            )));
        }

        let model = IzhikevichModel::new();
        let params: Vec<IzhikevichParameters> = r
            .par_iter()
            .zip(neuron_types.par_iter())
            .map(|(&r_n, &ty)| IzhikevichParameters::from_draw(r_n, ty))
            .collect();

        let mut pool = Self::zeroed(neuron_types);
        pool.pt.copy_from_slice(pt);
        for (n, p) in params.iter().enumerate() {
            let initial = model.initial_state(p);
            pool.a[n] = p.a;
            pool.b[n] = p.b;
            pool.c[n] = p.c;
            pool.d[n] = p.d;
            pool.v[n] = initial.v;
            pool.u[n] = initial.u;
        }
        Ok(pool)
    }

    /// Build the pool from explicit columns
    ///
    /// Unlike [`NeuronStatePool::from_draws`] the neuron count only has to be
    /// positive, so single-neuron fixtures are allowed. Every neuron's
    /// `a,b,c,d` must pass [`ModelParameters::validate`].
    pub fn from_columns(columns: NeuronColumns) -> Result<Self> {
        let count = columns.neuron_types.len();
        if count == 0 {
            return Err(SnnError::Configuration(
                "neuron count must be positive".to_string(),
            ));
        }
        let rows = [
            (StateRow::Pt, columns.pt.len()),
            (StateRow::U, columns.u.len()),
            (StateRow::V, columns.v.len()),
            (StateRow::A, columns.a.len()),
            (StateRow::B, columns.b.len()),
            (StateRow::C, columns.c.len()),
            (StateRow::D, columns.d.len()),
            (StateRow::I, columns.i.len()),
        ];
        for (row, len) in rows {
            if len != count {
                return Err(SnnError::Configuration(format!(
                    "state row '{}' has length {}, expected {}",
                    row.label(),
                    len,
                    count
                )));
            }
        }
        for n in 0..count {
            let params = IzhikevichParameters::with_values(
                columns.a[n],
                columns.b[n],
                columns.c[n],
                columns.d[n],
            );
            params.validate().map_err(|reason| {
                SnnError::Configuration(format!("neuron {}: {}", n, reason))
            })?;
        }

        Ok(Self {
            count,
            pt: columns.pt,
            u: columns.u,
            v: columns.v,
            a: columns.a,
            b: columns.b,
            c: columns.c,
            d: columns.d,
            i: columns.i,
            neuron_types: columns.neuron_types,
        })
    }

    fn zeroed(neuron_types: Vec<NeuronType>) -> Self {
        let count = neuron_types.len();
        Self {
            count,
            pt: vec![0.0; count],
            u: vec![0.0; count],
            v: vec![0.0; count],
            a: vec![0.0; count],
            b: vec![0.0; count],
            c: vec![0.0; count],
            d: vec![0.0; count],
            i: vec![0.0; count],
            neuron_types,
        }
    }

    /// Model constants of neuron `n`
    pub fn parameters(&self, n: usize) -> Option<IzhikevichParameters> {
        (n < self.count).then(|| {
            IzhikevichParameters::with_values(self.a[n], self.b[n], self.c[n], self.d[n])
        })
    }

    /// Number of excitatory neurons
    pub fn excitatory_count(&self) -> usize {
        self.neuron_types
            .iter()
            .filter(|t| t.is_excitatory())
            .count()
    }

    /// Add `amount` to the input current of each listed neuron
    ///
    /// Indices outside the pool are ignored.
    pub fn inject_current(&mut self, neurons: &[u32], amount: f32) {
        for &n in neurons {
            if let Some(slot) = self.i.get_mut(n as usize) {
                *slot += amount;
            }
        }
    }

    /// Export the 8×N state matrix, row-major in [`StateRow::ALL`] order
    pub fn state_matrix(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(8 * self.count);
        for row in StateRow::ALL {
            out.extend_from_slice(self.row(row));
        }
        out
    }

    /// Approximate heap footprint in bytes
    pub fn memory_bytes(&self) -> usize {
        8 * self.count * std::mem::size_of::<f32>()
            + self.count * std::mem::size_of::<NeuronType>()
    }
}

impl NeuronStorage for NeuronStatePool {
    fn pt(&self) -> &[f32] {
        &self.pt
    }

    fn u(&self) -> &[f32] {
        &self.u
    }

    fn v(&self) -> &[f32] {
        &self.v
    }

    fn a(&self) -> &[f32] {
        &self.a
    }

    fn b(&self) -> &[f32] {
        &self.b
    }

    fn c(&self) -> &[f32] {
        &self.c
    }

    fn d(&self) -> &[f32] {
        &self.d
    }

    fn i(&self) -> &[f32] {
        &self.i
    }

    fn neuron_types(&self) -> &[NeuronType] {
        &self.neuron_types
    }

    fn u_mut(&mut self) -> &mut [f32] {
        &mut self.u
    }

    fn v_mut(&mut self) -> &mut [f32] {
        &mut self.v
    }

    fn i_mut(&mut self) -> &mut [f32] {
        &mut self.i
    }

    fn columns_mut(&mut self) -> NeuronColumnsMut<'_> {
        let Self {
            pt,
            u,
            v,
            a,
            b,
            c,
            d,
            i,
            neuron_types,
            ..
        } = self;
        NeuronColumnsMut {
            pt,
            a,
            b,
            c,
            d,
            neuron_types,
            u,
            v,
            i,
        }
    }

    fn count(&self) -> usize {
        self.count
    }
}
