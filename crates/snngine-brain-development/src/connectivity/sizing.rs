// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*!
Fan-out and delay sizing.

```text
S = min(1000, max(√N + 50, 2))                 capped at N-1
D = min(max(log10(N) × (1 + √log10(N)), 2), 20)
```
*/

use snngine_npu_neural::Result;
use snngine_npu_runtime::SynapseMatrix;

/// Upper bound of the derived fan-out
pub const MAX_DERIVED_FAN_OUT: usize = 1000;

/// Upper bound of the derived maximum delay
pub const MAX_DERIVED_DELAY: usize = 20;

/// Derived fan-out for `neuron_count` neurons
pub fn derive_fan_out(neuron_count: usize) -> usize {
    let s = ((neuron_count as f64).sqrt() + 50.0)
        .max(2.0)
        .min(MAX_DERIVED_FAN_OUT as f64) as usize;
    s.min(neuron_count.saturating_sub(1))
}

/// Derived maximum delay for `neuron_count` neurons
pub fn derive_max_delay(neuron_count: usize) -> usize {
    let log_n = (neuron_count.max(1) as f64).log10();
    let d = (log_n * (1.0 + log_n.sqrt())).max(2.0) as usize;
    d.min(MAX_DERIVED_DELAY)
}

/// Resolved network dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkShape {
    /// N
    pub neuron_count: usize,
    /// S
    pub fan_out: usize,
    /// D
    pub max_delay: usize,
}

impl NetworkShape {
    /// Fill in S and D where not given, then check the bounds
    ///
    /// An explicit `fan_out` above N-1 is an error; the derived one is capped.
    pub fn resolve(
        neuron_count: usize,
        fan_out: Option<usize>,
        max_delay: Option<usize>,
    ) -> Result<Self> {
        let shape = Self {
            neuron_count,
            fan_out: fan_out.unwrap_or_else(|| derive_fan_out(neuron_count)),
            max_delay: max_delay.unwrap_or_else(|| derive_max_delay(neuron_count)),
        };
        SynapseMatrix::check_dimensions(shape.neuron_count, shape.fan_out, shape.max_delay)?;
        Ok(shape)
    }

    /// Number of synapses (S × N)
    pub fn synapse_count(&self) -> usize {
        self.fan_out * self.neuron_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snngine_npu_neural::SnnError;

    #[test]
    fn test_derive_fan_out() {
        // sqrt(100000) = 316.2 → 366
        assert_eq!(derive_fan_out(100_000), 366);
        // sqrt(4) + 50 = 52, capped at N-1 = 3
        assert_eq!(derive_fan_out(4), 3);
        // Large networks hit the ceiling
        assert_eq!(derive_fan_out(10_000_000), 1000);
        assert_eq!(derive_fan_out(1_000), 81);
    }

    #[test]
    fn test_derive_max_delay() {
        // log10(1e5) = 5 → 5 × (1 + 2.236) = 16.18
        assert_eq!(derive_max_delay(100_000), 16);
        // log10(100) = 2 → 2 × 2.414 = 4.83
        assert_eq!(derive_max_delay(100), 4);
        // Small networks are floored at 2
        assert_eq!(derive_max_delay(2), 2);
        // log10(1e7) = 7 → 7 × 3.65 = 25.5, capped at 20
        assert_eq!(derive_max_delay(10_000_000), 20);
    }

    #[test]
    fn test_resolve_explicit_fan_out_checked() {
        let err = NetworkShape::resolve(10, Some(10), None).unwrap_err();
        assert!(matches!(err, SnnError::InvalidTopology(_)));

        let shape = NetworkShape::resolve(10, Some(9), Some(0)).unwrap();
        assert_eq!(shape.fan_out, 9);
        assert_eq!(shape.max_delay, 0);
        assert_eq!(shape.synapse_count(), 90);
    }

    #[test]
    fn test_resolve_derived() {
        let shape = NetworkShape::resolve(100_000, None, None).unwrap();
        assert_eq!(shape.fan_out, 366);
        assert_eq!(shape.max_delay, 16);
    }
}
