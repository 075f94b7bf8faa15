// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*!
Neurogenesis - per-neuron parameter draws.

Each neuron gets a uniform draw `r` quantized to two decimals, which fixes its
Izhikevich constants, and an independent uniform thalamic gate `pt`.
*/

use crate::rng::{stream_rng, Stream};
use rand::Rng;
use rayon::prelude::*;
use snngine_npu_neural::{NeuronType, Result};
use snngine_npu_runtime::NeuronStatePool;
use tracing::debug;

/// `round(r × 100) / 100`
#[inline]
pub fn quantize_draw(r: f32) -> f32 {
    (r * 100.0).round() / 100.0
}

/// Draw `(r, pt)` for every neuron and build the state pool
pub fn generate_state_pool(neuron_types: Vec<NeuronType>, seed: u64) -> Result<NeuronStatePool> {
    let (r, pt): (Vec<f32>, Vec<f32>) = (0..neuron_types.len() as u64)
        .into_par_iter()
        .map(|n| {
            let mut rng = stream_rng(seed, Stream::NeuronDraws, n);
            let r = quantize_draw(rng.gen::<f32>());
            let pt = rng.gen::<f32>();
            (r, pt)
        })
        .unzip();

    let pool = NeuronStatePool::from_draws(neuron_types, &r, &pt)?;
    debug!(
        "[NEUROGENESIS] Drew parameters for {} neurons ({} excitatory)",
        pt.len(),
        pool.excitatory_count()
    );
    Ok(pool)
}
