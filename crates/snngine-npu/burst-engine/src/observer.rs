// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Read-only hook for whatever displays or records a run
//!
//! Observers run on the driver thread after a tick completes, so the slices
//! in a [`TickSnapshot`] are never mid-update.

use snngine_npu_neural::Tick;
use std::time::Duration;

/// State of the network right after a tick
#[derive(Debug, Clone, Copy)]
pub struct TickSnapshot<'a> {
    pub tick: Tick,
    pub duration: Duration,
    pub v: &'a [f32],
    /// `fired[n] == tick` for neurons that fired this tick, 0 otherwise
    pub fired: &'a [Tick],
    pub spike_count: usize,
}

impl TickSnapshot<'_> {
    /// Indices of the neurons that fired this tick
    pub fn fired_neurons(&self) -> impl Iterator<Item = u32> + '_ {
        let tick = self.tick;
        self.fired
            .iter()
            .enumerate()
            .filter(move |&(_, &f)| f == tick)
            .map(|(n, _)| n as u32)
    }
}

/// Receives a snapshot after every tick
///
/// Errors are logged by the driver and never stop the run.
pub trait TickObserver: Send {
    fn name(&self) -> &str {
        "observer"
    }

    fn on_tick(&mut self, snapshot: &TickSnapshot<'_>) -> Result<(), String>;
}
