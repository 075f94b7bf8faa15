// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*!
Fixed fan-out synaptogenesis.

## Algorithm

```text
1. Targets:  per neuron n, S distinct indices from [0, N) \ {n}
2. Delays:   delay_index[0, n] = 0
             delay_index[d+1, n] = delay_index[d, n] + Bernoulli(0.5)
             delay_index[D, n] = max(delay_index[D, n], S)
3. Weights:  w ~ U[0, 1); w = -w for inhibitory presynaptic n; w += 5 where w > 0
```

Each step fills a neuron-major scratch buffer in parallel (one RNG stream per
neuron), then transposes it into the row-major S×N layout the kernel scans.
*/

use crate::connectivity::sizing::NetworkShape;
use crate::rng::{resolve_seed, stream_rng, Stream};
use rand::seq::index;
use rand::Rng;
use rayon::prelude::*;
use snngine_npu_neural::{NeuronType, Result, SnnError};
use snngine_npu_runtime::SynapseMatrix;
use std::time::Instant;
use tracing::{debug, info};

/// Added to every weight that is still positive after sign assignment
pub const EXCITATORY_WEIGHT_BOOST: f32 = 5.0;

/// Builder for the static network topology
///
/// ```rust
/// use snngine_brain_development::{ConnectivityBuilder, TypeLayout};
///
/// let types = TypeLayout::HalfSplit.build(100).unwrap();
/// let topology = ConnectivityBuilder::new(100)
///     .fan_out(10)
///     .max_delay(3)
///     .seed(7)
///     .build(&types)
///     .unwrap();
/// assert_eq!(topology.column_targets(0).len(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct ConnectivityBuilder {
    neuron_count: usize,
    fan_out: Option<usize>,
    max_delay: Option<usize>,
    seed: Option<u64>,
}

impl ConnectivityBuilder {
    pub fn new(neuron_count: usize) -> Self {
        Self {
            neuron_count,
            fan_out: None,
            max_delay: None,
            seed: None,
        }
    }

    /// Explicit fan-out S (derived from N otherwise)
    pub fn fan_out(mut self, fan_out: usize) -> Self {
        self.fan_out = Some(fan_out);
        self
    }

    /// Explicit maximum delay D (derived from N otherwise)
    pub fn max_delay(mut self, max_delay: usize) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    /// Seed for reproducible builds
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set or clear the seed
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Resolved N, S, D
    pub fn shape(&self) -> Result<NetworkShape> {
        NetworkShape::resolve(self.neuron_count, self.fan_out, self.max_delay)
    }

    /// Generate targets, delay index and weights for `neuron_types`
    pub fn build(&self, neuron_types: &[NeuronType]) -> Result<SynapseMatrix> {
        let shape = self.shape()?;
        if neuron_types.len() != shape.neuron_count {
            return Err(SnnError::Configuration(format!(
                "type vector has length {}, expected {}",
                neuron_types.len(),
                shape.neuron_count
            )));
        }
        let seed = resolve_seed(self.seed);
        let start = Instant::now();

        let targets = generate_targets(shape.neuron_count, shape.fan_out, seed);
        let delay_index = generate_delay_index(
            shape.neuron_count,
            shape.fan_out,
            shape.max_delay,
            seed,
        );
        let weights = generate_weights(neuron_types, shape.fan_out, seed);
        debug!(
            "[SYNAPTOGENESIS] Generated {} synapses in {:?}",
            shape.synapse_count(),
            start.elapsed()
        );

        // from_parts re-checks uniqueness and delay coverage for every column
        let matrix = SynapseMatrix::from_parts(
            shape.neuron_count,
            shape.fan_out,
            shape.max_delay,
            targets,
            delay_index,
            weights,
        )?;
        matrix.validate_weight_signs(neuron_types)?;

        info!(
            "[SYNAPTOGENESIS] Built topology N={} S={} D={} ({} synapses, {:.1} MiB) in {:?}",
            shape.neuron_count,
            shape.fan_out,
            shape.max_delay,
            shape.synapse_count(),
            matrix.memory_bytes() as f64 / (1024.0 * 1024.0),
            start.elapsed()
        );
        Ok(matrix)
    }
}

/// S×N target matrix: distinct, non-self targets per column
///
/// `fan_out` must not exceed `neuron_count - 1`.
pub fn generate_targets(neuron_count: usize, fan_out: usize, seed: u64) -> Vec<u32> {
    let mut by_neuron = vec![0u32; neuron_count * fan_out];
    if fan_out == 0 {
        return by_neuron;
    }
    by_neuron
        .par_chunks_mut(fan_out)
        .enumerate()
        .for_each(|(n, column)| {
            let mut rng = stream_rng(seed, Stream::Targets, n as u64);
            // Sample from the N-1 non-self indices and skip over n
            for (slot, k) in column
                .iter_mut()
                .zip(index::sample(&mut rng, neuron_count - 1, fan_out).into_iter())
            {
                *slot = (if k >= n { k + 1 } else { k }) as u32;
            }
        });
    transpose_to_row_major(&by_neuron, neuron_count, fan_out)
}

/// (D+1)×N cumulative delay counts from a Bernoulli(0.5) walk
pub fn generate_delay_index(
    neuron_count: usize,
    fan_out: usize,
    max_delay: usize,
    seed: u64,
) -> Vec<u32> {
    let rows = max_delay + 1;
    let mut by_neuron = vec![0u32; neuron_count * rows];
    let s = fan_out as u32;
    by_neuron
        .par_chunks_mut(rows)
        .enumerate()
        .for_each(|(n, column)| {
            let mut rng = stream_rng(seed, Stream::Delays, n as u64);
            for d in 0..max_delay {
                let step = rng.gen_bool(0.5) as u32;
                column[d + 1] = (column[d] + step).min(s);
            }
            column[max_delay] = column[max_delay].max(s);
        });
    transpose_to_row_major(&by_neuron, neuron_count, rows)
}

/// S×N signed weights; sign follows the presynaptic type
pub fn generate_weights(neuron_types: &[NeuronType], fan_out: usize, seed: u64) -> Vec<f32> {
    let neuron_count = neuron_types.len();
    let mut by_neuron = vec![0f32; neuron_count * fan_out];
    if fan_out == 0 {
        return by_neuron;
    }
    by_neuron
        .par_chunks_mut(fan_out)
        .zip(neuron_types.par_iter())
        .enumerate()
        .for_each(|(n, (column, &ty))| {
            let mut rng = stream_rng(seed, Stream::Weights, n as u64);
            for w in column.iter_mut() {
                let mut value: f32 = rng.gen();
                if ty == NeuronType::Inhibitory {
                    value = -value;
                }
                if value > 0.0 {
                    value += EXCITATORY_WEIGHT_BOOST;
                }
                *w = value;
            }
        });
    transpose_to_row_major(&by_neuron, neuron_count, fan_out)
}

/// `[n * rows + r]` → `[r * N + n]`
fn transpose_to_row_major<T: Copy + Default + Send + Sync>(
    by_neuron: &[T],
    neuron_count: usize,
    rows: usize,
) -> Vec<T> {
    let mut out = vec![T::default(); by_neuron.len()];
    if neuron_count == 0 {
        return out;
    }
    out.par_chunks_mut(neuron_count)
        .enumerate()
        .for_each(|(r, row)| {
            for (n, slot) in row.iter_mut().enumerate() {
                *slot = by_neuron[n * rows + r];
            }
        });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeLayout;
    use snngine_npu_runtime::SynapseStorage;

    #[test]
    fn test_targets_distinct_and_non_self() {
        let n = 50;
        let s = 49;
        let targets = generate_targets(n, s, 1);
        for neuron in 0..n {
            let mut column: Vec<u32> = (0..s).map(|slot| targets[slot * n + neuron]).collect();
            assert!(!column.contains(&(neuron as u32)));
            column.sort_unstable();
            column.dedup();
            assert_eq!(column.len(), s);
        }
    }

    #[test]
    fn test_delay_index_walk() {
        let (n, s, d) = (20, 8, 5);
        let index = generate_delay_index(n, s, d, 2);
        for neuron in 0..n {
            assert_eq!(index[neuron], 0);
            for row in 0..d {
                let step = index[(row + 1) * n + neuron] - index[row * n + neuron];
                if row + 1 < d {
                    assert!(step <= 1);
                }
            }
            assert_eq!(index[d * n + neuron], s as u32);
        }
    }

    #[test]
    fn test_zero_delay_index_covers_all() {
        let index = generate_delay_index(4, 3, 0, 9);
        assert_eq!(index, vec![3, 3, 3, 3]);
    }

    #[test]
    fn test_weight_signs_and_boost() {
        let types = TypeLayout::HalfSplit.build(10).unwrap();
        let weights = generate_weights(&types, 6, 4);
        for (k, &w) in weights.iter().enumerate() {
            let n = k % 10;
            if n < 5 {
                assert!(w <= 0.0 && w > -1.0);
            } else {
                assert!(w == 0.0 || (5.0..6.0).contains(&w));
            }
        }
    }

    #[test]
    fn test_build_is_reproducible() {
        let types = TypeLayout::HalfSplit.build(64).unwrap();
        let a = ConnectivityBuilder::new(64).seed(5).build(&types).unwrap();
        let b = ConnectivityBuilder::new(64).seed(5).build(&types).unwrap();
        assert_eq!(a.targets(), b.targets());
        assert_eq!(a.delay_index(), b.delay_index());
        assert_eq!(a.weights(), b.weights());

        let c = ConnectivityBuilder::new(64).seed(6).build(&types).unwrap();
        assert_ne!(a.targets(), c.targets());
    }

    #[test]
    fn test_build_rejects_bad_inputs() {
        let types = TypeLayout::HalfSplit.build(10).unwrap();
        let err = ConnectivityBuilder::new(10).fan_out(10).build(&types).unwrap_err();
        assert!(matches!(err, SnnError::InvalidTopology(_)));

        let err = ConnectivityBuilder::new(10).max_delay(101).build(&types).unwrap_err();
        assert!(matches!(err, SnnError::InvalidTopology(_)));

        let err = ConnectivityBuilder::new(12).build(&types).unwrap_err();
        assert!(matches!(err, SnnError::Configuration(_)));
    }

    #[test]
    fn test_transpose() {
        // Two neurons, three rows each
        let by_neuron = [1, 2, 3, 4, 5, 6];
        assert_eq!(transpose_to_row_major(&by_neuron, 2, 3), vec![1, 4, 2, 5, 3, 6]);
    }
}
