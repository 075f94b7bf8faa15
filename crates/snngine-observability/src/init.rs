// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for SNNgine
//!
//! Console output always; with the `file-logging` feature and a `log_dir`,
//! also a JSON log file in a timestamped run folder:
//!
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       └── snngine.log
//! ```
//!
//! `RUST_LOG`, when set, replaces the filter built from the config and flags.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LogOutput, LoggingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps background log writers alive; flushes on drop
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder holding this run's log files, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Normalize a configured level name to an `EnvFilter` directive
pub fn normalize_level(level: &str) -> String {
    match level.trim().to_lowercase().as_str() {
        "warning" => "warn".to_string(),
        other => other.to_string(),
    }
}

/// Filter from `RUST_LOG` if set, otherwise from the config level and debug flags
pub fn build_filter(config: &LoggingConfig, debug_flags: &CrateDebugFlags) -> Result<EnvFilter> {
    if std::env::var("RUST_LOG").is_ok() {
        return EnvFilter::try_from_default_env().context("Invalid RUST_LOG filter");
    }
    let directives = debug_flags.to_filter_string(&normalize_level(&config.level));
    EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid log filter: {}", directives))
}

/// Install the global subscriber
///
/// # Errors
/// Fails on an invalid filter, an unwritable log directory, or when a global
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig, debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);
    let console: BoxedLayer = match (config.format, config.output) {
        (LogFormat::Text, LogOutput::Stdout) => console
            .with_writer(std::io::stdout)
            .with_filter(build_filter(config, debug_flags)?)
            .boxed(),
        (LogFormat::Text, LogOutput::Stderr) => console
            .with_writer(std::io::stderr)
            .with_filter(build_filter(config, debug_flags)?)
            .boxed(),
        (LogFormat::Json, LogOutput::Stdout) => console
            .json()
            .with_writer(std::io::stdout)
            .with_filter(build_filter(config, debug_flags)?)
            .boxed(),
        (LogFormat::Json, LogOutput::Stderr) => console
            .json()
            .with_writer(std::io::stderr)
            .with_filter(build_filter(config, debug_flags)?)
            .boxed(),
    };
    layers.push(console);

    #[cfg(feature = "file-logging")]
    let (file_guards, log_dir) = match &config.log_dir {
        Some(base) => {
            let (layer, guard, run_folder) = file_layer(base, config, debug_flags)?;
            layers.push(layer);
            (vec![guard], Some(run_folder))
        }
        None => (Vec::new(), None),
    };
    #[cfg(not(feature = "file-logging"))]
    let log_dir = None;

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
        log_dir,
    })
}

#[cfg(feature = "file-logging")]
fn file_layer(
    base_log_dir: &Path,
    config: &LoggingConfig,
    debug_flags: &CrateDebugFlags,
) -> Result<(BoxedLayer, tracing_appender::non_blocking::WorkerGuard, PathBuf)> {
    let run_folder = create_run_folder(base_log_dir)?;
    cleanup_old_runs(base_log_dir, config.retention_runs)?;

    let appender = tracing_appender::rolling::daily(&run_folder, "snngine.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_filter(build_filter(config, debug_flags)?)
        .boxed();
    Ok((layer, guard, run_folder))
}

/// Create `<base>/run_<UTC timestamp>`
pub fn create_run_folder(base_log_dir: &Path) -> Result<PathBuf> {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_folder = base_log_dir.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
    Ok(run_folder)
}

/// Keep only the `keep` most recent `run_*` folders under `base_log_dir`
///
/// Returns the number of folders removed.
pub fn cleanup_old_runs(base_log_dir: &Path, keep: usize) -> Result<usize> {
    if !base_log_dir.exists() {
        return Ok(0);
    }

    let mut runs: Vec<(PathBuf, chrono::NaiveDateTime)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let stamp = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix("run_"))
            .and_then(|s| chrono::NaiveDateTime::parse_from_str(s, "%Y%m%d_%H%M%S").ok());
        if let Some(stamp) = stamp {
            runs.push((path, stamp));
        }
    }

    // Oldest first
    runs.sort_by_key(|(_, stamp)| *stamp);
    let excess = runs.len().saturating_sub(keep);
    let mut removed = 0;
    for (path, _) in runs.into_iter().take(excess) {
        match std::fs::remove_dir_all(&path) {
            Ok(()) => removed += 1,
            Err(e) => eprintln!(
                "Warning: Failed to remove old log directory {}: {}",
                path.display(),
                e
            ),
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("WARNING"), "warn");
        assert_eq!(normalize_level(" Info "), "info");
    }

    #[test]
    fn test_build_filter_from_flags() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let flags = CrateDebugFlags::from_args(vec!["--debug-snngine-config".to_string()]);
        let filter = build_filter(&LoggingConfig::console("warning"), &flags).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("snngine_config=debug"));
        assert!(rendered.contains("warn"));
    }

    #[test]
    fn test_cleanup_keeps_most_recent_runs() {
        let dir = tempfile::tempdir().unwrap();
        for stamp in ["20240101_000000", "20240102_000000", "20240103_000000"] {
            std::fs::create_dir(dir.path().join(format!("run_{}", stamp))).unwrap();
        }
        std::fs::create_dir(dir.path().join("unrelated")).unwrap();

        assert_eq!(cleanup_old_runs(dir.path(), 2).unwrap(), 1);
        assert!(!dir.path().join("run_20240101_000000").exists());
        assert!(dir.path().join("run_20240103_000000").exists());
        assert!(dir.path().join("unrelated").exists());
    }

    #[test]
    fn test_create_run_folder() {
        let dir = tempfile::tempdir().unwrap();
        let run = create_run_folder(dir.path()).unwrap();
        assert!(run.is_dir());
        assert!(run.file_name().unwrap().to_str().unwrap().starts_with("run_"));
    }
}
