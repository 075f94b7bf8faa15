// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*!
Headless SNNgine runner

Loads `snngine_configuration.toml` (or defaults), builds the network and
advances it until the tick budget is spent or Ctrl-C is pressed, then reports
run statistics.

Usage:
  cargo run --release --bin snngine -- --neurons 10000 --ticks 1000 --seed 7
  cargo run --release --bin snngine -- --config my.toml --set backend=sequential --json
  cargo run --release --bin snngine -- --debug-snngine-npu-burst-engine
  cargo run --release --bin snngine -- --log-dir logs

Copyright 2025 hsc-projects
Licensed under the Apache License, Version 2.0
*/

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::json;
use snngine::burst_engine::{SimulationDriver, TickObserver, TickSnapshot};
use snngine::config::{load_config, load_config_or_default};
use snngine::observability::{
    debug_flags_help, init_logging, parse_debug_flags, LogFormat, LoggingConfig,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// SNNgine - headless spiking network simulation
#[derive(Parser, Debug)]
#[command(name = "snngine", version, author, long_about = None, after_help = debug_flags_help())]
struct Args {
    /// Path to the configuration file (searched for when absent)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ticks to run; 0 runs until Ctrl-C
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Neuron count N (even)
    #[arg(short, long)]
    neurons: Option<usize>,

    /// Seed for construction and per-tick draws
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write JSON log files into a run folder under this directory
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Config override as key=value (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Log a progress line every this many frames (0 = off)
    #[arg(long, default_value_t = 100)]
    report_every: u64,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Print the final report as JSON (and log as JSON)
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// Logs spike counts once every `every` frames
struct ProgressReporter {
    ticks_per_frame: u64,
    every: u64,
    frame_spikes: usize,
    ticks_in_frame: u64,
    frames: u64,
}

impl ProgressReporter {
    fn new(ticks_per_frame: usize, every: u64) -> Self {
        Self {
            ticks_per_frame: ticks_per_frame.max(1) as u64,
            every,
            frame_spikes: 0,
            ticks_in_frame: 0,
            frames: 0,
        }
    }
}

impl TickObserver for ProgressReporter {
    fn name(&self) -> &str {
        "progress"
    }

    fn on_tick(&mut self, snapshot: &TickSnapshot) -> Result<(), String> {
        self.frame_spikes += snapshot.spike_count;
        self.ticks_in_frame += 1;
        if self.ticks_in_frame < self.ticks_per_frame {
            return Ok(());
        }

        self.frames += 1;
        if self.frames % self.every == 0 {
            info!(
                "[RUN] tick {}: {} spikes in last frame ({:?}/tick)",
                snapshot.tick, self.frame_spikes, snapshot.duration
            );
        }
        self.frame_spikes = 0;
        self.ticks_in_frame = 0;
        Ok(())
    }
}

fn main() -> Result<()> {
    // --debug-* flags are read by the observability crate, not clap
    let args = Args::parse_from(std::env::args().filter(|a| !a.starts_with("--debug-")));
    let debug_flags = parse_debug_flags();

    let cli_overrides = collect_overrides(&args)?;
    let (config, config_path) = match &args.config {
        Some(path) => (
            load_config(Some(path), Some(&cli_overrides))?,
            Some(path.clone()),
        ),
        None => load_config_or_default(Some(&cli_overrides))?,
    };

    let mut logging = LoggingConfig::console(if args.verbose {
        "debug"
    } else {
        config.system.log_level.as_str()
    })
    .with_log_dir(config.system.log_dir.clone());
    if args.json {
        logging.format = LogFormat::Json;
    }
    let guard = init_logging(&logging, &debug_flags)?;
    match (guard.log_dir(), &config.system.log_dir) {
        (Some(run_folder), _) => info!("[LOGGING] Writing log files to {}", run_folder.display()),
        (None, Some(dir)) => warn!(
            "[LOGGING] log_dir {} ignored: built without the file-logging feature",
            dir.display()
        ),
        (None, None) => {}
    }

    match &config_path {
        Some(path) => info!("[CONFIG] Loaded {}", path.display()),
        None => info!("[CONFIG] No configuration file found, using defaults"),
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl-C handler")?;

    let mut driver = snngine::build_driver(&config)?;
    if args.report_every > 0 {
        driver.add_observer(Box::new(ProgressReporter::new(
            config.updates_per_frame(),
            args.report_every,
        )));
    }

    let budget = config.simulation.ticks;
    if budget == 0 {
        info!("[RUN] Running until Ctrl-C (backend: {})", driver.backend_name());
    } else {
        info!("[RUN] Running {} ticks (backend: {})", budget, driver.backend_name());
    }

    let started = Instant::now();
    let completed = run_until(&mut driver, budget, &running)?;
    let elapsed = started.elapsed();
    if !running.load(Ordering::SeqCst) {
        warn!("[RUN] Interrupted after {} ticks", completed);
    }

    report(driver, elapsed, args.json)
}

/// Flags and `--set` pairs as loader overrides; flags win over `--set`
fn collect_overrides(args: &Args) -> Result<HashMap<String, String>> {
    let mut overrides = HashMap::new();
    for pair in &args.overrides {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("--set expects KEY=VALUE, got '{}'", pair);
        };
        overrides.insert(key.trim().to_string(), value.trim().to_string());
    }
    if let Some(ticks) = args.ticks {
        overrides.insert("ticks".to_string(), ticks.to_string());
    }
    if let Some(neurons) = args.neurons {
        overrides.insert("neurons".to_string(), neurons.to_string());
    }
    if let Some(seed) = args.seed {
        overrides.insert("seed".to_string(), seed.to_string());
    }
    if let Some(log_dir) = &args.log_dir {
        overrides.insert("log_dir".to_string(), log_dir.display().to_string());
    }
    Ok(overrides)
}

/// Advance until `budget` ticks (0 = unbounded) or `running` clears
fn run_until(driver: &mut SimulationDriver, budget: u64, running: &AtomicBool) -> Result<u64> {
    let mut completed = 0;
    while running.load(Ordering::SeqCst) && (budget == 0 || completed < budget) {
        driver.advance()?;
        completed += 1;
    }
    Ok(completed)
}

fn report(
    driver: SimulationDriver,
    elapsed: Duration,
    as_json: bool,
) -> Result<()> {
    let neurons = driver.neuron_count();
    let seed = driver.seed();
    let memory_mib = driver.memory_bytes() as f64 / (1024.0 * 1024.0);
    let backend = driver.backend_name().to_string();
    let stats = driver.shutdown();
    let firing_rate = stats.firing_rate_hz(neurons);

    if as_json {
        let summary = json!({
            "neurons": neurons,
            "seed": seed,
            "backend": backend,
            "memory_mib": memory_mib,
            "elapsed_ms": elapsed.as_millis() as u64,
            "ticks": stats.total_ticks,
            "spikes": stats.total_spikes,
            "synaptic_events": stats.total_synaptic_events,
            "avg_spikes_per_tick": stats.avg_spikes_per_tick(),
            "avg_tick_time_us": stats.avg_tick_time_us(),
            "firing_rate_hz": firing_rate,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("SNNgine run summary");
    println!("  Neurons:          {}", neurons);
    println!("  Seed:             {}", seed);
    println!("  Backend:          {}", backend);
    println!("  Memory:           {:.1} MiB", memory_mib);
    println!("  Ticks:            {}", stats.total_ticks);
    println!("  Spikes:           {}", stats.total_spikes);
    println!("  Synaptic events:  {}", stats.total_synaptic_events);
    println!("  Spikes/tick:      {:.1}", stats.avg_spikes_per_tick());
    println!("  Tick time:        {:.1} us", stats.avg_tick_time_us());
    println!("  Firing rate:      {:.2} Hz", firing_rate);
    println!("  Wall clock:       {:?}", elapsed);
    Ok(())
}
