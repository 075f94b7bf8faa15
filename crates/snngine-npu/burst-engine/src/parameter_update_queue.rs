// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Lock-protected queue of live parameter changes
//!
//! Producers (a UI thread, a control socket) push updates at any time; the
//! driver drains the whole queue between ticks, so a change never lands
//! mid-tick.

use crate::synaptic_propagation::SynapticScales;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// One live parameter change
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterUpdate {
    ThalamicCurrents { inh: f32, exc: f32 },
    SensoryCurrent { channel: usize, current: f32 },
    SensorySourceScale(f32),
    WeightScales(SynapticScales),
    SynapticDelivery(bool),
}

/// Thread-safe FIFO shared between producers and the driver
#[derive(Debug, Clone, Default)]
pub struct ParameterUpdateQueue {
    queue: Arc<Mutex<VecDeque<ParameterUpdate>>>,
}

impl ParameterUpdateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, update: ParameterUpdate) {
        self.queue.lock().push_back(update);
    }

    /// Take every queued update in arrival order
    pub fn drain_all(&self) -> Vec<ParameterUpdate> {
        self.queue.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}
