// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*!
Topology Invariant Tests

Property tests over random (N, S, D, seed) covering:
- Target columns are distinct and never contain the presynaptic neuron
- Delay index columns are non-decreasing and end at S
- Delay buckets partition each neuron's S synapses
- Weight signs follow the presynaptic type after the +5 boost
*/

use proptest::prelude::*;
use snngine_brain_development::{ConnectivityBuilder, NetworkShape, TypeLayout};
use snngine_npu_neural::NeuronType;
use snngine_npu_runtime::{SynapseMatrix, SynapseStorage};

fn build(n: usize, s: usize, d: usize, seed: u64) -> (Vec<NeuronType>, SynapseMatrix) {
    let types = TypeLayout::HalfSplit.build(n).unwrap();
    let matrix = ConnectivityBuilder::new(n)
        .fan_out(s)
        .max_delay(d)
        .seed(seed)
        .build(&types)
        .unwrap();
    (types, matrix)
}

/// (N even in [2, 120], S in [0, N-1], D in [0, 12])
fn shape_strategy() -> impl Strategy<Value = (usize, usize, usize)> {
    (1usize..=60, 0usize..=12).prop_flat_map(|(half, d)| {
        let n = half * 2;
        (Just(n), 0..n, Just(d))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn targets_distinct_and_non_self((n, s, d) in shape_strategy(), seed in any::<u64>()) {
        let (_, m) = build(n, s, d, seed);
        for neuron in 0..n {
            let mut column = m.column_targets(neuron);
            prop_assert!(column.iter().all(|&t| (t as usize) < n));
            prop_assert!(!column.contains(&(neuron as u32)));
            column.sort_unstable();
            column.dedup();
            prop_assert_eq!(column.len(), s);
        }
    }

    #[test]
    fn delay_index_monotone_and_complete((n, s, d) in shape_strategy(), seed in any::<u64>()) {
        let (_, m) = build(n, s, d, seed);
        let index = m.delay_index();
        for neuron in 0..n {
            for row in 0..d {
                prop_assert!(index[row * n + neuron] <= index[(row + 1) * n + neuron]);
            }
            prop_assert!(index[d * n + neuron] as usize >= s);
        }
    }

    #[test]
    fn delay_buckets_partition_synapses((n, s, d) in shape_strategy(), seed in any::<u64>()) {
        let (_, m) = build(n, s, d, seed);
        for neuron in 0..n {
            let mut covered = 0;
            let mut expected_start = 0;
            for delay in 0..m.delay_bucket_count() {
                let bucket = m.delay_bucket(neuron, delay);
                prop_assert_eq!(bucket.start, expected_start);
                covered += bucket.len();
                expected_start = bucket.end;
            }
            prop_assert_eq!(covered, s);
        }
    }

    #[test]
    fn weight_signs_follow_type((n, s, d) in shape_strategy(), seed in any::<u64>()) {
        let (types, m) = build(n, s, d, seed);
        for neuron in 0..n {
            for w in m.column_weights(neuron) {
                match types[neuron] {
                    NeuronType::Inhibitory => prop_assert!(w <= 0.0),
                    NeuronType::Excitatory => prop_assert!(w >= 0.0),
                }
            }
        }
    }

    #[test]
    fn unseeded_builds_hold_invariants((n, s, d) in shape_strategy()) {
        let types = TypeLayout::HalfSplit.build(n).unwrap();
        let m = ConnectivityBuilder::new(n).fan_out(s).max_delay(d).build(&types).unwrap();
        prop_assert!(m.validate_structure().is_ok());
        prop_assert!(m.validate_weight_signs(&types).is_ok());
    }
}

#[test]
fn derived_shape_builds_for_small_networks() {
    for n in [2usize, 4, 10, 100] {
        let shape = NetworkShape::resolve(n, None, None).unwrap();
        assert!(shape.fan_out <= n - 1);
        let types = TypeLayout::HalfSplit.build(n).unwrap();
        let m = ConnectivityBuilder::new(n).seed(1).build(&types).unwrap();
        assert_eq!(m.fan_out(), shape.fan_out);
        assert_eq!(m.max_delay(), shape.max_delay);
    }
}

#[test]
fn seeded_builds_are_identical_across_thread_pools() {
    let types = TypeLayout::HalfSplit.build(200).unwrap();
    let builder = ConnectivityBuilder::new(200).seed(99);
    let wide = builder.build(&types).unwrap();
    let narrow = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap()
        .install(|| builder.build(&types).unwrap());
    assert_eq!(wide.targets(), narrow.targets());
    assert_eq!(wide.delay_index(), narrow.delay_index());
    assert_eq!(wide.weights(), narrow.weights());
}
