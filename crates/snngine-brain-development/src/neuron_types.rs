// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*!
Excitatory/inhibitory type layouts.
*/

use snngine_npu_neural::{NeuronType, Result, SnnError};

/// How neuron types are assigned over `[0, N)`
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TypeLayout {
    /// First N/2 inhibitory, last N/2 excitatory
    #[default]
    HalfSplit,
    /// Leading inhibitory block, trailing excitatory block of `round(N × fraction)`
    ExcitatoryFraction(f32),
    /// Caller-provided vector
    Explicit(Vec<NeuronType>),
}

impl TypeLayout {
    /// Materialize the layout for `neuron_count` neurons
    pub fn build(&self, neuron_count: usize) -> Result<Vec<NeuronType>> {
        match self {
            TypeLayout::HalfSplit => Ok(split(neuron_count, neuron_count / 2)),
            TypeLayout::ExcitatoryFraction(fraction) => {
                if !(0.0..=1.0).contains(fraction) {
                    return Err(SnnError::Configuration(format!(
                        "excitatory fraction must be in [0, 1], got {}",
                        fraction
                    )));
                }
                let n_exc = (neuron_count as f64 * *fraction as f64).round() as usize;
                Ok(split(neuron_count, neuron_count - n_exc.min(neuron_count)))
            }
            TypeLayout::Explicit(types) => {
                if types.len() != neuron_count {
                    return Err(SnnError::Configuration(format!(
                        "type vector has length {}, expected {}",
                        types.len(),
                        neuron_count
                    )));
                }
                Ok(types.clone())
            }
        }
    }
}

fn split(neuron_count: usize, n_inhibitory: usize) -> Vec<NeuronType> {
    (0..neuron_count)
        .map(|n| {
            if n < n_inhibitory {
                NeuronType::Inhibitory
            } else {
                NeuronType::Excitatory
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_split() {
        let types = TypeLayout::HalfSplit.build(4).unwrap();
        assert_eq!(
            types,
            vec![
                NeuronType::Inhibitory,
                NeuronType::Inhibitory,
                NeuronType::Excitatory,
                NeuronType::Excitatory
            ]
        );
    }

    #[test]
    fn test_excitatory_fraction() {
        let types = TypeLayout::ExcitatoryFraction(0.8).build(10).unwrap();
        assert_eq!(types.iter().filter(|t| t.is_excitatory()).count(), 8);
        assert_eq!(types[0], NeuronType::Inhibitory);
        assert_eq!(types[9], NeuronType::Excitatory);

        assert!(TypeLayout::ExcitatoryFraction(1.5).build(10).is_err());
    }

    #[test]
    fn test_explicit_length_checked() {
        let layout = TypeLayout::Explicit(vec![NeuronType::Excitatory; 3]);
        assert!(layout.build(3).is_ok());
        assert!(matches!(
            layout.build(4),
            Err(SnnError::Configuration(_))
        ));
    }
}
