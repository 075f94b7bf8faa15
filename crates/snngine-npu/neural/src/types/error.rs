// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Error types for simulation construction and dispatch
//!
//! All three kinds indicate a programming or configuration mistake, never a
//! transient condition: they are detected before the first tick and are fatal
//! to the simulation instance that raised them.

/// Error types for simulation operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnnError {
    /// Invalid neuron count, type vector length mismatch, bad parameter
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Fan-out/delay out of bounds, duplicate target generation
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// Grid/array size mismatch between state pool, topology, and tick inputs
    #[error("Kernel dispatch error: {what}: expected {expected}, got {actual}")]
    KernelDispatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl SnnError {
    /// Shorthand for the length check every dispatch path performs
    pub fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(SnnError::KernelDispatch {
                what,
                expected,
                actual,
            })
        }
    }
}

pub type Result<T> = core::result::Result<T, SnnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_len() {
        assert!(SnnError::check_len("r", 4, 4).is_ok());
        let err = SnnError::check_len("r", 4, 3).unwrap_err();
        assert_eq!(
            err,
            SnnError::KernelDispatch {
                what: "r",
                expected: 4,
                actual: 3
            }
        );
        assert_eq!(
            err.to_string(),
            "Kernel dispatch error: r: expected 4, got 3"
        );
    }
}
