// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! CPU backend: sequential loop or rayon data-parallel loop

use super::ComputeBackend;
use crate::neural_dynamics::{
    process_neural_dynamics_parallel, process_neural_dynamics_sequential, DynamicsResult,
    TickInputs,
};
use rayon::{ThreadPool, ThreadPoolBuilder};
use snngine_npu_neural::{Result, SnnError, Tick};
use snngine_npu_runtime::NeuronStorage;

/// CPU kernel executor
pub struct CpuBackend {
    name: String,
    parallel: bool,
    /// Dedicated pool; `None` runs on rayon's global pool
    pool: Option<ThreadPool>,
}

impl CpuBackend {
    pub fn sequential() -> Self {
        Self {
            name: "CPU (sequential)".to_string(),
            parallel: false,
            pool: None,
        }
    }

    /// Parallel backend, optionally on a pool of `num_threads` workers
    pub fn parallel(num_threads: Option<usize>) -> Result<Self> {
        let pool = match num_threads {
            Some(0) => {
                return Err(SnnError::Configuration(
                    "thread count must be positive".to_string(),
                ))
            }
            Some(threads) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("snngine-kernel-{}", i))
                    .build()
                    .map_err(|e| SnnError::Configuration(format!("thread pool: {}", e)))?,
            ),
            None => None,
        };
        let name = match num_threads {
            Some(threads) => format!("CPU (rayon, {} threads)", threads),
            None => format!("CPU (rayon, {} threads)", rayon::current_num_threads()),
        };
        Ok(Self {
            name,
            parallel: true,
            pool,
        })
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::sequential()
    }
}

impl<N: NeuronStorage> ComputeBackend<N> for CpuBackend {
    fn backend_name(&self) -> &str {
        &self.name
    }

    fn process_neural_dynamics(
        &mut self,
        neurons: &mut N,
        inputs: &TickInputs<'_>,
        fired: &mut [Tick],
    ) -> Result<DynamicsResult> {
        if !self.parallel {
            return Ok(process_neural_dynamics_sequential(
                neurons.columns_mut(),
                inputs,
                fired,
            ));
        }
        let columns = neurons.columns_mut();
        let result = match &self.pool {
            Some(pool) => {
                pool.install(|| process_neural_dynamics_parallel(columns, inputs, fired))
            }
            None => process_neural_dynamics_parallel(columns, inputs, fired),
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural_dynamics::ThalamicCurrents;
    use snngine_npu_neural::NeuronType;
    use snngine_npu_runtime::NeuronStatePool;

    #[test]
    fn test_dedicated_pool_matches_sequential() {
        let n = 32;
        let types: Vec<NeuronType> = (0..n)
            .map(|k| {
                if k < n / 2 {
                    NeuronType::Inhibitory
                } else {
                    NeuronType::Excitatory
                }
            })
            .collect();
        let draws: Vec<f32> = (0..n).map(|k| k as f32 / n as f32).collect();
        let mut a = NeuronStatePool::from_draws(types.clone(), &draws, &draws).unwrap();
        let mut b = NeuronStatePool::from_draws(types, &draws, &draws).unwrap();

        let r = vec![0.3; n];
        let rt = vec![0.8; n];
        let inputs = TickInputs {
            tick: 1,
            r: &r,
            rt: &rt,
            thalamic: ThalamicCurrents::default(),
        };
        let mut fired_a = vec![0; n];
        let mut fired_b = vec![0; n];

        let mut seq = CpuBackend::sequential();
        let mut par = CpuBackend::parallel(Some(2)).unwrap();
        for _ in 0..10 {
            seq.process_tick(&mut a, &inputs, &mut fired_a).unwrap();
            par.process_tick(&mut b, &inputs, &mut fired_b).unwrap();
        }
        assert_eq!(a.v(), b.v());
        assert_eq!(fired_a, fired_b);
        assert!(ComputeBackend::<NeuronStatePool>::backend_name(&par).contains("2 threads"));
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(CpuBackend::parallel(Some(0)).is_err());
    }

    #[test]
    fn test_process_tick_checks_lengths() {
        let types = vec![NeuronType::Inhibitory, NeuronType::Excitatory];
        let mut pool = NeuronStatePool::from_draws(types, &[0.0; 2], &[0.0; 2]).unwrap();
        let r = [0.0; 2];
        let rt = [0.0; 2];
        let inputs = TickInputs {
            tick: 1,
            r: &r,
            rt: &rt,
            thalamic: ThalamicCurrents::default(),
        };
        let mut fired = [0; 3];
        let err = CpuBackend::sequential()
            .process_tick(&mut pool, &inputs, &mut fired)
            .unwrap_err();
        assert!(matches!(err, SnnError::KernelDispatch { what: "fired", .. }));
    }
}
