// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! # snngine-observability
//!
//! Logging setup shared by every SNNgine binary and test harness, with
//! per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: rolling JSON log files, one folder per run

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known SNNgine crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "snngine",
    "snngine-config",
    "snngine-npu-neural",
    "snngine-npu-runtime",
    "snngine-npu-burst-engine",
    "snngine-brain-development",
];
