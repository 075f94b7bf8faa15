// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Logging configuration types

use std::path::PathBuf;

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Base level for every crate (trace, debug, info, warn, error)
    pub level: String,

    /// Console format
    pub format: LogFormat,

    /// Console stream
    pub output: LogOutput,

    /// Base directory for per-run log folders; `None` disables file logs
    pub log_dir: Option<PathBuf>,

    /// Number of most recent run folders kept under `log_dir`
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Text,
            output: LogOutput::Stderr,
            log_dir: None,
            retention_runs: 10,
        }
    }
}

impl LoggingConfig {
    /// Console logging at `level`, nothing on disk
    pub fn console(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// Also write JSON log files under `log_dir` (needs the `file-logging` feature)
    pub fn with_log_dir(mut self, log_dir: Option<PathBuf>) -> Self {
        self.log_dir = log_dir;
        self
    }
}

/// Log format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Console output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
}
