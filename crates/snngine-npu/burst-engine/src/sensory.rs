// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Sensory input channels
//!
//! Two channels, each a caller-assigned neuron set with a constant current.
//! Every tick each member receives `current * source_scale` before the kernel.

use snngine_npu_neural::{Result, SnnError};

/// Number of sensory channels
pub const SENSORY_CHANNELS: usize = 2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensoryChannel {
    pub neurons: Vec<u32>,
    pub current: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensoryInput {
    channels: [SensoryChannel; SENSORY_CHANNELS],
    source_scale: f32,
}

impl Default for SensoryInput {
    fn default() -> Self {
        Self::new([65.0, 25.0], 0.75)
    }
}

impl SensoryInput {
    pub fn new(currents: [f32; SENSORY_CHANNELS], source_scale: f32) -> Self {
        Self {
            channels: currents.map(|current| SensoryChannel {
                neurons: Vec::new(),
                current,
            }),
            source_scale,
        }
    }

    pub fn channel(&self, channel: usize) -> Option<&SensoryChannel> {
        self.channels.get(channel)
    }

    pub fn source_scale(&self) -> f32 {
        self.source_scale
    }

    pub fn set_source_scale(&mut self, scale: f32) {
        self.source_scale = scale;
    }

    /// Assign the neuron set of `channel`; every index must be below `neuron_count`
    pub fn set_neurons(
        &mut self,
        channel: usize,
        neurons: Vec<u32>,
        neuron_count: usize,
    ) -> Result<()> {
        if let Some(&bad) = neurons.iter().find(|&&n| n as usize >= neuron_count) {
            return Err(SnnError::Configuration(format!(
                "sensory neuron {} out of range for N={}",
                bad, neuron_count
            )));
        }
        let slot = self.channel_mut(channel)?;
        slot.neurons = neurons;
        Ok(())
    }

    pub fn set_current(&mut self, channel: usize, current: f32) -> Result<()> {
        self.channel_mut(channel)?.current = current;
        Ok(())
    }

    fn channel_mut(&mut self, channel: usize) -> Result<&mut SensoryChannel> {
        self.channels.get_mut(channel).ok_or_else(|| {
            SnnError::Configuration(format!(
                "sensory channel {} does not exist (have {})",
                channel, SENSORY_CHANNELS
            ))
        })
    }

    /// Add each channel's current to its members; returns neurons driven
    pub fn inject(&self, i: &mut [f32]) -> usize {
        let mut driven = 0;
        for channel in &self.channels {
            let amount = channel.current * self.source_scale;
            for &n in &channel.neurons {
                if let Some(slot) = i.get_mut(n as usize) {
                    *slot += amount;
                    driven += 1;
                }
            }
        }
        driven
    }
}
