// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Compute backend abstraction for the update kernel
//!
//! The driver never calls the kernel functions directly; it holds a boxed
//! [`ComputeBackend`] chosen at construction from [`BackendConfig`].

use crate::neural_dynamics::{validate_tick_inputs, DynamicsResult, TickInputs};
use snngine_npu_neural::{Result, SnnError, Tick};
use snngine_npu_runtime::NeuronStorage;
use std::fmt;
use std::str::FromStr;
use tracing::info;

pub mod cpu;

pub use cpu::CpuBackend;

/// Kernel execution strategy
pub trait ComputeBackend<N: NeuronStorage>: Send {
    /// Backend name for logging
    fn backend_name(&self) -> &str;

    /// Run the kernel for one tick, writing `fired`
    fn process_neural_dynamics(
        &mut self,
        neurons: &mut N,
        inputs: &TickInputs<'_>,
        fired: &mut [Tick],
    ) -> Result<DynamicsResult>;

    /// Check input lengths, then run the kernel
    fn process_tick(
        &mut self,
        neurons: &mut N,
        inputs: &TickInputs<'_>,
        fired: &mut [Tick],
    ) -> Result<DynamicsResult> {
        let count = neurons.count();
        validate_tick_inputs(count, &neurons.columns_mut(), inputs, fired)?;
        self.process_neural_dynamics(neurons, inputs, fired)
    }
}

/// Backend type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendType {
    /// Single-threaded loop over neurons
    Sequential,
    /// Rayon data-parallel loop over neurons
    Parallel,
    /// Pick by network size
    #[default]
    Auto,
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendType::Sequential => write!(f, "sequential"),
            BackendType::Parallel => write!(f, "parallel"),
            BackendType::Auto => write!(f, "auto"),
        }
    }
}

impl FromStr for BackendType {
    type Err = SnnError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sequential" | "cpu" => Ok(BackendType::Sequential),
            "parallel" | "rayon" => Ok(BackendType::Parallel),
            "auto" => Ok(BackendType::Auto),
            other => Err(SnnError::Configuration(format!(
                "unknown backend '{}' (expected sequential, parallel or auto)",
                other
            ))),
        }
    }
}

/// Backend selection thresholds
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub backend_type: BackendType,
    /// Auto switches to the parallel kernel at this many neurons
    pub parallel_neuron_threshold: usize,
    /// Dedicated rayon pool size; `None` uses the global pool
    pub num_threads: Option<usize>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            backend_type: BackendType::Auto,
            parallel_neuron_threshold: 4096,
            num_threads: None,
        }
    }
}

/// Outcome of [`select_backend`]
#[derive(Debug, Clone, PartialEq)]
pub struct BackendDecision {
    pub backend_type: BackendType,
    pub reason: String,
}

/// Resolve `Auto` against the network size
pub fn select_backend(neuron_count: usize, config: &BackendConfig) -> BackendDecision {
    match config.backend_type {
        BackendType::Auto if neuron_count >= config.parallel_neuron_threshold => BackendDecision {
            backend_type: BackendType::Parallel,
            reason: format!(
                "{} neurons >= threshold {}",
                neuron_count, config.parallel_neuron_threshold
            ),
        },
        BackendType::Auto => BackendDecision {
            backend_type: BackendType::Sequential,
            reason: format!(
                "{} neurons < threshold {}",
                neuron_count, config.parallel_neuron_threshold
            ),
        },
        explicit => BackendDecision {
            backend_type: explicit,
            reason: "explicitly configured".to_string(),
        },
    }
}

/// Build the backend for a network of `neuron_count` neurons
pub fn create_backend<N: NeuronStorage>(
    neuron_count: usize,
    config: &BackendConfig,
) -> Result<Box<dyn ComputeBackend<N>>> {
    let decision = select_backend(neuron_count, config);
    let backend = match decision.backend_type {
        BackendType::Parallel => CpuBackend::parallel(config.num_threads)?,
        _ => CpuBackend::sequential(),
    };
    info!(
        "[BACKEND] Using {} backend ({})",
        ComputeBackend::<N>::backend_name(&backend),
        decision.reason
    );
    Ok(Box::new(backend))
}
