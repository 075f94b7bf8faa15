// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Storage abstraction traits
//!
//! - **Storage Abstraction**: the kernel sees slices, never the container
//! - **Zero-Cost**: traits compile to direct calls
//! - **Disjoint Borrows**: [`NeuronColumnsMut`] hands out the mutable rows and
//!   the read-only rows at the same time so a parallel kernel can zip them

pub mod storage;

pub use storage::{NeuronColumnsMut, NeuronStorage, StateRow, SynapseStorage};
