// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 hsc-projects
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Fixed fan-out synapse matrices
//!
//! Three flat arrays, no per-neuron allocation:
//!
//! ```text
//! targets      S × N   u32   column n = postsynaptic targets of neuron n
//! weights      S × N   f32   same layout as targets
//! delay_index (D+1)× N u32   delay_index[d, n] = #synapses of n with delay ≤ d-1
//! ```
//!
//! Synapses of neuron `n` with delay `d` occupy slots
//! `delay_index[d, n] .. delay_index[d+1, n]` of its column.

use crate::traits::SynapseStorage;
use rayon::prelude::*;
use snngine_npu_neural::{NeuronType, Result, SnnError};

/// Largest accepted maximum delay (ticks)
pub const MAX_DELAY_LIMIT: usize = 100;

/// Immutable network topology
#[derive(Debug, Clone, PartialEq)]
pub struct SynapseMatrix {
    neuron_count: usize,
    fan_out: usize,
    max_delay: usize,
    targets: Vec<u32>,
    delay_index: Vec<u32>,
    weights: Vec<f32>,
}

impl SynapseMatrix {
    /// Assemble a topology from its three matrices
    ///
    /// Checks the shapes and the structural invariants (distinct non-self
    /// targets, monotone delay index covering all S synapses).
    pub fn from_parts(
        neuron_count: usize,
        fan_out: usize,
        max_delay: usize,
        targets: Vec<u32>,
        delay_index: Vec<u32>,
        weights: Vec<f32>,
    ) -> Result<Self> {
        Self::check_dimensions(neuron_count, fan_out, max_delay)?;
        SnnError::check_len("targets", fan_out * neuron_count, targets.len())?;
        SnnError::check_len("weights", fan_out * neuron_count, weights.len())?;
        SnnError::check_len(
            "delay_index",
            (max_delay + 1) * neuron_count,
            delay_index.len(),
        )?;

        let matrix = Self {
            neuron_count,
            fan_out,
            max_delay,
            targets,
            delay_index,
            weights,
        };
        matrix.validate_structure()?;
        Ok(matrix)
    }

    /// Topology with no synapses (S = 0, D = 0)
    pub fn unconnected(neuron_count: usize) -> Result<Self> {
        Self::from_parts(
            neuron_count,
            0,
            0,
            Vec::new(),
            vec![0; neuron_count],
            Vec::new(),
        )
    }

    /// Bounds on N, S and D shared by every construction path
    pub fn check_dimensions(neuron_count: usize, fan_out: usize, max_delay: usize) -> Result<()> {
        if neuron_count == 0 {
            return Err(SnnError::Configuration(
                "neuron count must be positive".to_string(),
            ));
        }
        if fan_out > neuron_count - 1 {
            return Err(SnnError::InvalidTopology(format!(
                "fan-out S={} cannot exceed N-1={} distinct non-self targets",
                fan_out,
                neuron_count - 1
            )));
        }
        if max_delay > MAX_DELAY_LIMIT {
            return Err(SnnError::InvalidTopology(format!(
                "max delay D={} outside [0, {}]",
                max_delay, MAX_DELAY_LIMIT
            )));
        }
        Ok(())
    }

    /// Verify target uniqueness and delay-index monotonicity for every column
    pub fn validate_structure(&self) -> Result<()> {
        let n_count = self.neuron_count;
        let s = self.fan_out;
        let d = self.max_delay;

        (0..n_count).into_par_iter().try_for_each(|n| {
            let mut column: Vec<u32> =
                (0..s).map(|slot| self.targets[slot * n_count + n]).collect();
            if let Some(&bad) = column.iter().find(|&&t| t as usize >= n_count) {
                return Err(SnnError::InvalidTopology(format!(
                    "neuron {} targets out-of-range neuron {}",
                    n, bad
                )));
            }
            if column.iter().any(|&t| t as usize == n) {
                return Err(SnnError::InvalidTopology(format!(
                    "neuron {} targets itself",
                    n
                )));
            }
            column.sort_unstable();
            if column.windows(2).any(|w| w[0] == w[1]) {
                return Err(SnnError::InvalidTopology(format!(
                    "neuron {} has duplicate targets",
                    n
                )));
            }

            let mut previous = 0u32;
            for row in 0..=d {
                let value = self.delay_index[row * n_count + n];
                if value < previous {
                    return Err(SnnError::InvalidTopology(format!(
                        "delay index of neuron {} decreases at row {}",
                        n, row
                    )));
                }
                if value as usize > s {
                    return Err(SnnError::InvalidTopology(format!(
                        "delay index of neuron {} exceeds fan-out at row {}",
                        n, row
                    )));
                }
                previous = value;
            }
            if (previous as usize) < s {
                return Err(SnnError::InvalidTopology(format!(
                    "delay index of neuron {} covers {} of {} synapses",
                    n, previous, s
                )));
            }
            Ok(())
        })
    }

    /// Verify weight signs follow the presynaptic neuron type
    pub fn validate_weight_signs(&self, neuron_types: &[NeuronType]) -> Result<()> {
        SnnError::check_len("neuron_types", self.neuron_count, neuron_types.len())?;
        let n_count = self.neuron_count;
        self.weights
            .par_iter()
            .enumerate()
            .try_for_each(|(k, &w)| {
                let n = k % n_count;
                let ok = match neuron_types[n] {
                    NeuronType::Inhibitory => w <= 0.0,
                    NeuronType::Excitatory => w >= 0.0,
                };
                if ok {
                    Ok(())
                } else {
                    Err(SnnError::InvalidTopology(format!(
                        "weight {} of neuron {} ({:?}) has the wrong sign",
                        w, n, neuron_types[n]
                    )))
                }
            })
    }

    /// Targets of neuron `n` in slot order
    pub fn column_targets(&self, neuron: usize) -> Vec<u32> {
        (0..self.fan_out)
            .map(|slot| self.target(slot, neuron))
            .collect()
    }

    /// Weights of neuron `n` in slot order
    pub fn column_weights(&self, neuron: usize) -> Vec<f32> {
        (0..self.fan_out)
            .map(|slot| self.weight(slot, neuron))
            .collect()
    }

    /// Approximate heap footprint in bytes, fixed at O(S·N)
    pub fn memory_bytes(&self) -> usize {
        self.targets.len() * std::mem::size_of::<u32>()
            + self.delay_index.len() * std::mem::size_of::<u32>()
            + self.weights.len() * std::mem::size_of::<f32>()
    }
}

impl SynapseStorage for SynapseMatrix {
    fn neuron_count(&self) -> usize {
        self.neuron_count
    }

    fn fan_out(&self) -> usize {
        self.fan_out
    }

    fn max_delay(&self) -> usize {
        self.max_delay
    }

    fn targets(&self) -> &[u32] {
        &self.targets
    }

    fn delay_index(&self) -> &[u32] {
        &self.delay_index
    }

    fn weights(&self) -> &[f32] {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// N=3, S=2, D=2: neuron 0 → {1,2}, neuron 1 → {2,0}, neuron 2 → {0,1}
    fn small_matrix() -> SynapseMatrix {
        // Row-major S×N
        let targets = vec![1, 2, 0, 2, 0, 1];
        // Row 0: zero, row 1: one synapse of delay 0, row 2: all
        let delay_index = vec![0, 0, 0, 1, 0, 2, 2, 2, 2];
        let weights = vec![-0.5, 5.2, 5.9, -0.1, 5.4, 5.0];
        SynapseMatrix::from_parts(3, 2, 2, targets, delay_index, weights).unwrap()
    }

    #[test]
    fn test_from_parts_and_accessors() {
        let m = small_matrix();
        assert_eq!(m.synapse_count(), 6);
        assert_eq!(m.column_targets(1), vec![2, 0]);
        assert_eq!(m.column_weights(2), vec![5.9, 5.0]);
        assert_eq!(m.target(1, 0), 2);
        assert_eq!(m.delay_bucket_count(), 2);
        assert_eq!(m.memory_bytes(), 6 * 4 + 9 * 4 + 6 * 4);
    }

    #[test]
    fn test_delay_buckets_partition_column() {
        let m = small_matrix();
        assert_eq!(m.delay_bucket(0, 0), 0..1);
        assert_eq!(m.delay_bucket(0, 1), 1..2);
        assert_eq!(m.delay_bucket(1, 0), 0..0);
        assert_eq!(m.delay_bucket(1, 1), 0..2);
        assert_eq!(m.delay_bucket(2, 0), 0..2);
        assert_eq!(m.delay_bucket(2, 1), 2..2);
        // Past the last bucket
        assert_eq!(m.delay_bucket(0, 2), 0..0);
    }

    #[test]
    fn test_zero_delay_is_single_bucket() {
        let m = SynapseMatrix::from_parts(3, 1, 0, vec![1, 2, 0], vec![1, 1, 1], vec![0.0; 3])
            .unwrap();
        assert_eq!(m.delay_bucket_count(), 1);
        assert_eq!(m.delay_bucket(1, 0), 0..1);
        assert_eq!(m.delay_bucket(1, 1), 0..0);
    }

    #[test]
    fn test_unconnected() {
        let m = SynapseMatrix::unconnected(1).unwrap();
        assert_eq!(m.synapse_count(), 0);
        assert_eq!(m.delay_bucket(0, 0), 0..0);
    }

    #[test]
    fn test_rejects_self_target() {
        let err = SynapseMatrix::from_parts(2, 1, 0, vec![0, 0], vec![1, 1], vec![0.0; 2])
            .unwrap_err();
        assert!(err.to_string().contains("targets itself"));
    }

    #[test]
    fn test_rejects_duplicate_target() {
        // Neuron 0 → {2, 2}
        let targets = vec![2, 0, 0, 2, 2, 1];
        let err =
            SynapseMatrix::from_parts(3, 2, 0, targets, vec![2, 2, 2], vec![0.0; 6]).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_rejects_fan_out_too_large() {
        let err = SynapseMatrix::check_dimensions(4, 4, 2).unwrap_err();
        assert!(matches!(err, SnnError::InvalidTopology(_)));
        assert!(SynapseMatrix::check_dimensions(4, 3, 2).is_ok());
    }

    #[test]
    fn test_rejects_delay_out_of_range() {
        let err = SynapseMatrix::check_dimensions(10, 2, 101).unwrap_err();
        assert!(matches!(err, SnnError::InvalidTopology(_)));
        assert!(SynapseMatrix::check_dimensions(10, 2, 100).is_ok());
    }

    #[test]
    fn test_rejects_incomplete_delay_index() {
        let err = SynapseMatrix::from_parts(2, 1, 1, vec![1, 0], vec![0, 0, 0, 1], vec![0.0; 2])
            .unwrap_err();
        assert!(err.to_string().contains("covers 0 of 1"));
    }

    #[test]
    fn test_rejects_shape_mismatch() {
        let err = SynapseMatrix::from_parts(2, 1, 0, vec![1], vec![1, 1], vec![0.0; 2])
            .unwrap_err();
        assert!(matches!(err, SnnError::KernelDispatch { what: "targets", .. }));
    }

    #[test]
    fn test_weight_signs() {
        let m = small_matrix();
        let types = [
            NeuronType::Inhibitory,
            NeuronType::Excitatory,
            NeuronType::Excitatory,
        ];
        assert!(m.validate_weight_signs(&types).is_ok());

        let wrong = [NeuronType::Excitatory; 3];
        assert!(m.validate_weight_signs(&wrong).is_err());
    }
}
