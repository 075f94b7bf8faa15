// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

//! Logging into a run folder under a configured log directory
//!
//! Installs the global subscriber, so it lives in its own test binary.

#![cfg(feature = "file-logging")]

use snngine_observability::{init_logging, CrateDebugFlags, LoggingConfig};

#[test]
fn test_log_file_written_to_run_folder() {
    let dir = tempfile::tempdir().unwrap();
    let config = LoggingConfig::console("info").with_log_dir(Some(dir.path().to_path_buf()));
    let guard = init_logging(&config, &CrateDebugFlags::default()).unwrap();

    let run_folder = guard.log_dir().unwrap().to_path_buf();
    assert!(run_folder.starts_with(dir.path()));
    assert!(run_folder
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("run_")));

    tracing::info!("[TEST] line for the run folder");
    // Dropping the guard flushes the non-blocking writer
    drop(guard);

    let log = std::fs::read_dir(&run_folder)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .find(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("snngine.log"))
        })
        .expect("no log file in run folder");
    let contents = std::fs::read_to_string(log).unwrap();
    assert!(contents.contains("line for the run folder"));
}
