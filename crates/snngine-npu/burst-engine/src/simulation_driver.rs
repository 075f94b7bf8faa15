// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 hsc-projects
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Simulation Driver
//!
//! Owns the tick counter, the state pool, the topology and everything that
//! feeds current into `i` between kernel calls.
//!
//! ## Tick flow
//! ```text
//! 1. Apply queued parameter updates
//! 2. Drain synaptic current due at t into i
//! 3. Inject sensory currents
//! 4. Kernel (thalamic gate, reset, integration, i = 0)  -> fired[n] ∈ {0, t}
//! 5. Schedule outgoing current of every neuron with fired[n] == t
//! 6. Record fire history, update stats, notify observers
//! 7. t += 1
//! ```
//!
//! `advance` takes `&mut self`, so two ticks can never overlap.

use crate::backend::{create_backend, BackendConfig, ComputeBackend};
use crate::fire_history::FireHistory;
use crate::neural_dynamics::{ThalamicCurrents, TickInputs};
use crate::observer::{TickObserver, TickSnapshot};
use crate::parameter_update_queue::{ParameterUpdate, ParameterUpdateQueue};
use crate::sensory::SensoryInput;
use crate::synaptic_propagation::{propagate_spikes, DelayRing, SynapticScales};
use crate::SimulationStats;
use rand::rngs::StdRng;
use rand::Rng;
use snngine_brain_development::{resolve_seed, stream_rng, Stream};
use snngine_npu_neural::{Result, SnnError, Tick};
use snngine_npu_runtime::{NeuronStatePool, NeuronStorage, SynapseMatrix, SynapseStorage};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Default fire history window (ticks)
pub const DEFAULT_HISTORY_WINDOW: usize = 5000;

/// Run-level parameters fixed at construction (some adjustable via the update queue)
#[derive(Debug, Clone)]
pub struct SimulationParams {
    pub thalamic: ThalamicCurrents,
    pub scales: SynapticScales,
    pub sensory: SensoryInput,
    /// Route spikes through the synapse matrix
    pub synaptic_delivery: bool,
    /// Fire history window T
    pub history_window: usize,
    pub backend: BackendConfig,
    /// Base seed of the driver's own r/rt draws; `None` picks a fresh one
    pub seed: Option<u64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            thalamic: ThalamicCurrents::default(),
            scales: SynapticScales::default(),
            sensory: SensoryInput::default(),
            synaptic_delivery: true,
            history_window: DEFAULT_HISTORY_WINDOW,
            backend: BackendConfig::default(),
            seed: None,
        }
    }
}

/// Outcome of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    pub tick: Tick,
    pub neurons_fired: usize,
    pub thalamic_injections: usize,
    pub synaptic_events: usize,
    pub duration: Duration,
}

/// Tick loop over one network instance
pub struct SimulationDriver {
    neurons: NeuronStatePool,
    synapses: SynapseMatrix,
    backend: Box<dyn ComputeBackend<NeuronStatePool>>,
    thalamic: ThalamicCurrents,
    scales: SynapticScales,
    synaptic_delivery: bool,
    sensory: SensoryInput,
    ring: DelayRing,
    history: FireHistory,
    fired: Vec<Tick>,
    fired_indices: Vec<u32>,
    tick: Tick,
    last_tick_duration: Duration,
    stats: SimulationStats,
    update_queue: ParameterUpdateQueue,
    observers: Vec<Box<dyn TickObserver>>,
    seed: u64,
    rng: StdRng,
    r_buffer: Vec<f32>,
    rt_buffer: Vec<f32>,
}

impl SimulationDriver {
    /// Take ownership of a state pool and its topology
    pub fn new(
        neurons: NeuronStatePool,
        synapses: SynapseMatrix,
        params: SimulationParams,
    ) -> Result<Self> {
        let neuron_count = neurons.count();
        if synapses.neuron_count() != neuron_count {
            return Err(SnnError::Configuration(format!(
                "topology has {} neurons, state pool has {}",
                synapses.neuron_count(),
                neuron_count
            )));
        }
        synapses.validate_weight_signs(neurons.neuron_types())?;
        for channel in 0..crate::sensory::SENSORY_CHANNELS {
            if let Some(ch) = params.sensory.channel(channel) {
                if let Some(&bad) = ch.neurons.iter().find(|&&n| n as usize >= neuron_count) {
                    return Err(SnnError::Configuration(format!(
                        "sensory neuron {} out of range for N={}",
                        bad, neuron_count
                    )));
                }
            }
        }

        let history = FireHistory::new(params.history_window)
            .map_err(|e| SnnError::Configuration(format!("fire history: {}", e)))?;
        let backend = create_backend(neuron_count, &params.backend)?;
        let ring = DelayRing::new(neuron_count, synapses.delay_bucket_count());
        let seed = resolve_seed(params.seed);
        let rng = stream_rng(seed, Stream::Driver, 0);

        info!(
            "[DRIVER] Initialized: N={} S={} D={} delivery={} backend={} seed={}",
            neuron_count,
            synapses.fan_out(),
            synapses.max_delay(),
            params.synaptic_delivery,
            backend.backend_name(),
            seed
        );

        Ok(Self {
            neurons,
            synapses,
            backend,
            thalamic: params.thalamic,
            scales: params.scales,
            synaptic_delivery: params.synaptic_delivery,
            sensory: params.sensory,
            ring,
            history,
            fired: vec![0; neuron_count],
            fired_indices: Vec::new(),
            tick: 1,
            last_tick_duration: Duration::ZERO,
            stats: SimulationStats::default(),
            update_queue: ParameterUpdateQueue::new(),
            observers: Vec::new(),
            seed,
            rng,
            r_buffer: vec![0.0; neuron_count],
            rt_buffer: vec![0.0; neuron_count],
        })
    }

    /// Start counting at `tick` instead of 1 (0 is reserved for "not fired")
    pub fn with_start_tick(mut self, tick: Tick) -> Result<Self> {
        if tick == 0 {
            return Err(SnnError::Configuration(
                "start tick must be >= 1".to_string(),
            ));
        }
        self.tick = tick;
        Ok(self)
    }

    /// Advance one tick using externally supplied draws
    pub fn advance_with(&mut self, r: &[f32], rt: &[f32]) -> Result<TickSummary> {
        let neuron_count = self.neurons.count();
        SnnError::check_len("r", neuron_count, r.len())?;
        SnnError::check_len("rt", neuron_count, rt.len())?;
        self.step(r, rt)
    }

    /// Advance one tick drawing `r` and `rt` uniformly from [0, 1)
    pub fn advance(&mut self) -> Result<TickSummary> {
        let mut r = std::mem::take(&mut self.r_buffer);
        let mut rt = std::mem::take(&mut self.rt_buffer);
        for (draw, drive) in r.iter_mut().zip(rt.iter_mut()) {
            *draw = self.rng.gen();
            *drive = self.rng.gen();
        }
        let result = self.step(&r, &rt);
        self.r_buffer = r;
        self.rt_buffer = rt;
        result
    }

    /// Advance `ticks` times with driver-generated draws
    pub fn run(&mut self, ticks: u64) -> Result<()> {
        let start = Instant::now();
        for _ in 0..ticks {
            self.advance()?;
        }
        debug!(
            "[DRIVER] Ran {} ticks in {:.2}ms (now at t={})",
            ticks,
            start.elapsed().as_secs_f64() * 1000.0,
            self.tick
        );
        Ok(())
    }

    fn step(&mut self, r: &[f32], rt: &[f32]) -> Result<TickSummary> {
        let start = Instant::now();
        let tick = self.tick;
        self.apply_parameter_updates();

        self.ring.drain_into(tick, self.neurons.i_mut());
        self.sensory.inject(self.neurons.i_mut());

        let inputs = TickInputs {
            tick,
            r,
            rt,
            thalamic: self.thalamic,
        };
        let dynamics = self
            .backend
            .process_tick(&mut self.neurons, &inputs, &mut self.fired)?;

        self.fired_indices.clear();
        self.fired_indices.extend(
            self.fired
                .iter()
                .enumerate()
                .filter(|&(_, &f)| f == tick)
                .map(|(n, _)| n as u32),
        );

        let synaptic_events = if self.synaptic_delivery {
            propagate_spikes(
                &self.synapses,
                self.neurons.neuron_types(),
                &self.fired_indices,
                &self.scales,
                &mut self.ring,
                tick,
            )
        } else {
            0
        };

        if let Err(e) = self.history.record(tick, &self.fired_indices) {
            warn!("[DRIVER] Fire history rejected tick {}: {}", tick, e);
        }

        let duration = start.elapsed();
        self.last_tick_duration = duration;
        self.stats.total_ticks += 1;
        self.stats.total_spikes += dynamics.neurons_fired as u64;
        self.stats.total_synaptic_events += synaptic_events as u64;
        self.stats.total_processing_time_us += duration.as_micros() as u64;

        if !self.observers.is_empty() {
            let snapshot = TickSnapshot {
                tick,
                duration,
                v: self.neurons.v(),
                fired: &self.fired,
                spike_count: dynamics.neurons_fired,
            };
            for observer in self.observers.iter_mut() {
                if let Err(e) = observer.on_tick(&snapshot) {
                    warn!("[DRIVER] Observer '{}' failed at tick {}: {}", observer.name(), tick, e);
                }
            }
        }

        trace!(
            "[DRIVER] tick={} fired={} events={} thalamic={} in {:?}",
            tick,
            dynamics.neurons_fired,
            synaptic_events,
            dynamics.thalamic_injections,
            duration
        );

        self.tick += 1;
        Ok(TickSummary {
            tick,
            neurons_fired: dynamics.neurons_fired,
            thalamic_injections: dynamics.thalamic_injections,
            synaptic_events,
            duration,
        })
    }

    fn apply_parameter_updates(&mut self) {
        if self.update_queue.is_empty() {
            return;
        }
        for update in self.update_queue.drain_all() {
            debug!("[DRIVER] Applying {:?} before tick {}", update, self.tick);
            match update {
                ParameterUpdate::ThalamicCurrents { inh, exc } => {
                    self.thalamic = ThalamicCurrents { inh, exc };
                }
                ParameterUpdate::SensoryCurrent { channel, current } => {
                    if let Err(e) = self.sensory.set_current(channel, current) {
                        warn!("[DRIVER] Ignoring sensory update: {}", e);
                    }
                }
                ParameterUpdate::SensorySourceScale(scale) => self.sensory.set_source_scale(scale),
                ParameterUpdate::WeightScales(scales) => self.scales = scales,
                ParameterUpdate::SynapticDelivery(enabled) => {
                    if !enabled {
                        self.ring.clear();
                    }
                    self.synaptic_delivery = enabled;
                }
            }
        }
    }

    /// Next tick to be computed
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn neuron_count(&self) -> usize {
        self.neurons.count()
    }

    /// Base seed of the per-tick draws, resolved at construction
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn v(&self) -> &[f32] {
        self.neurons.v()
    }

    /// Firing ticks from the last advance (0 or the tick just computed)
    pub fn fired(&self) -> &[Tick] {
        &self.fired
    }

    /// Neurons that fired in the last advance
    pub fn fired_indices(&self) -> &[u32] {
        &self.fired_indices
    }

    pub fn last_tick_duration(&self) -> Duration {
        self.last_tick_duration
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn neurons(&self) -> &NeuronStatePool {
        &self.neurons
    }

    pub fn synapses(&self) -> &SynapseMatrix {
        &self.synapses
    }

    pub fn history(&self) -> &FireHistory {
        &self.history
    }

    pub fn thalamic(&self) -> ThalamicCurrents {
        self.thalamic
    }

    pub fn scales(&self) -> SynapticScales {
        self.scales
    }

    pub fn synaptic_delivery(&self) -> bool {
        self.synaptic_delivery
    }

    pub fn sensory(&self) -> &SensoryInput {
        &self.sensory
    }

    pub fn sensory_mut(&mut self) -> &mut SensoryInput {
        &mut self.sensory
    }

    pub fn backend_name(&self) -> &str {
        self.backend.backend_name()
    }

    /// Producer handle for live parameter changes
    pub fn update_queue(&self) -> ParameterUpdateQueue {
        self.update_queue.clone()
    }

    pub fn add_observer(&mut self, observer: Box<dyn TickObserver>) {
        info!("[DRIVER] Registered observer '{}'", observer.name());
        self.observers.push(observer);
    }

    /// Bytes held by state, topology, delay ring and tick buffers
    pub fn memory_bytes(&self) -> usize {
        self.neurons.memory_bytes()
            + self.synapses.memory_bytes()
            + self.ring.memory_bytes()
            + self.fired.len() * std::mem::size_of::<Tick>()
            + (self.r_buffer.len() + self.rt_buffer.len()) * std::mem::size_of::<f32>()
    }

    /// End the run and return its totals
    pub fn shutdown(self) -> SimulationStats {
        info!(
            "[DRIVER] Shutdown at t={}: {} ticks, {} spikes, {} synaptic events, avg {:.1}us/tick",
            self.tick,
            self.stats.total_ticks,
            self.stats.total_spikes,
            self.stats.total_synaptic_events,
            self.stats.avg_tick_time_us()
        );
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snngine_npu_neural::NeuronType;
    use snngine_npu_runtime::std_impl::NeuronColumns;
    use std::sync::{Arc, Mutex};

    fn single_neuron(v: f32) -> NeuronStatePool {
        NeuronStatePool::from_columns(NeuronColumns {
            pt: vec![0.0],
            u: vec![0.0],
            v: vec![v],
            a: vec![0.02],
            b: vec![0.2],
            c: vec![-65.0],
            d: vec![8.0],
            i: vec![0.0],
            neuron_types: vec![NeuronType::Excitatory],
        })
        .unwrap()
    }

    fn driver(v: f32) -> SimulationDriver {
        SimulationDriver::new(
            single_neuron(v),
            SynapseMatrix::unconnected(1).unwrap(),
            SimulationParams {
                seed: Some(1),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_tick_counter_and_fired_value() {
        let mut d = driver(31.0).with_start_tick(5).unwrap();
        let summary = d.advance_with(&[1.0], &[0.0]).unwrap();
        assert_eq!(summary.tick, 5);
        assert_eq!(d.fired(), &[5]);
        assert_eq!(d.tick(), 6);
        assert_eq!(d.history().latest().map(|(t, b)| (t, b.len())), Some((5, 1)));
    }

    fn gated_driver(seed: Option<u64>) -> SimulationDriver {
        let pool = NeuronStatePool::from_columns(NeuronColumns {
            pt: vec![0.5, 0.5],
            u: vec![-13.0, -13.0],
            v: vec![-65.0, -65.0],
            a: vec![0.02, 0.02],
            b: vec![0.2, 0.2],
            c: vec![-65.0, -65.0],
            d: vec![8.0, 8.0],
            i: vec![0.0, 0.0],
            neuron_types: vec![NeuronType::Inhibitory, NeuronType::Excitatory],
        })
        .unwrap();
        SimulationDriver::new(
            pool,
            SynapseMatrix::unconnected(2).unwrap(),
            SimulationParams {
                seed,
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_unseeded_driver_replays_from_resolved_seed() {
        let mut fresh = gated_driver(None);
        let mut replay = gated_driver(Some(fresh.seed()));
        assert_eq!(gated_driver(Some(42)).seed(), 42);

        fresh.run(50).unwrap();
        replay.run(50).unwrap();
        assert_eq!(fresh.v(), replay.v());
        assert_eq!(fresh.stats().total_spikes, replay.stats().total_spikes);
    }

    #[test]
    fn test_start_tick_zero_rejected() {
        assert!(driver(-65.0).with_start_tick(0).is_err());
    }

    #[test]
    fn test_advance_with_checks_lengths() {
        let mut d = driver(-65.0);
        let err = d.advance_with(&[0.0, 0.0], &[0.0]).unwrap_err();
        assert!(matches!(err, SnnError::KernelDispatch { what: "r", .. }));
        assert_eq!(d.tick(), 1);
    }

    #[test]
    fn test_mismatched_topology_rejected() {
        let err = SimulationDriver::new(
            single_neuron(-65.0),
            SynapseMatrix::unconnected(2).unwrap(),
            SimulationParams::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, SnnError::Configuration(_)));
    }

    #[test]
    fn test_parameter_updates_applied_between_ticks() {
        let mut d = driver(-65.0);
        let queue = d.update_queue();
        queue.push(ParameterUpdate::ThalamicCurrents { inh: 1.0, exc: 2.0 });
        queue.push(ParameterUpdate::SynapticDelivery(false));
        assert_eq!(d.thalamic(), ThalamicCurrents::default());
        d.advance().unwrap();
        assert_eq!(d.thalamic(), ThalamicCurrents { inh: 1.0, exc: 2.0 });
        assert!(!d.synaptic_delivery());
        assert!(queue.is_empty());
    }

    struct Recorder(Arc<Mutex<Vec<(Tick, usize)>>>);

    impl TickObserver for Recorder {
        fn on_tick(&mut self, snapshot: &TickSnapshot<'_>) -> std::result::Result<(), String> {
            self.0.lock().unwrap().push((snapshot.tick, snapshot.spike_count));
            Ok(())
        }
    }

    #[test]
    fn test_observers_and_stats() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut d = driver(31.0);
        d.add_observer(Box::new(Recorder(seen.clone())));
        d.run(3).unwrap();
        assert_eq!(seen.lock().unwrap()[0], (1, 1));
        assert_eq!(seen.lock().unwrap().len(), 3);

        let stats = d.shutdown();
        assert_eq!(stats.total_ticks, 3);
        assert!(stats.total_spikes >= 1);
    }
}
