// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Excitatory/inhibitory neuron classification

use super::error::SnnError;

/// Neuron type bit (0 = inhibitory, 1 = excitatory)
///
/// `repr(u8)` keeps a `Vec<NeuronType>` byte-compatible with the 0/1 type
/// vectors handed in by external collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum NeuronType {
    Inhibitory = 0,
    Excitatory = 1,
}

impl NeuronType {
    /// The type bit as used by the model formulas
    #[inline(always)]
    pub fn bit(self) -> f32 {
        match self {
            NeuronType::Inhibitory => 0.0,
            NeuronType::Excitatory => 1.0,
        }
    }

    #[inline(always)]
    pub fn is_excitatory(self) -> bool {
        matches!(self, NeuronType::Excitatory)
    }

    /// Convert a raw 0/1 type vector, rejecting anything else
    pub fn from_bits(bits: &[u8]) -> Result<Vec<NeuronType>, SnnError> {
        bits.iter()
            .enumerate()
            .map(|(n, &bit)| {
                NeuronType::try_from(bit).map_err(|_| {
                    SnnError::Configuration(format!(
                        "neuron type at index {} must be 0 or 1, got {}",
                        n, bit
                    ))
                })
            })
            .collect()
    }
}

impl TryFrom<u8> for NeuronType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(NeuronType::Inhibitory),
            1 => Ok(NeuronType::Excitatory),
            other => Err(other),
        }
    }
}

impl From<NeuronType> for u8 {
    fn from(value: NeuronType) -> Self {
        value as u8
    }
}
