// src/lib.rs

//! # workerctl
//!
//! A single-worker background task controller: one [`Worker`] owns at most
//! one background unit of work, starts it deterministically, lets the owner
//! request cooperative cancellation, and waits (bounded) for it to finish.
//!
//! - [`worker`]: the controller and its hook slots.
//! - [`exec`]: launch backends, the execution envelope, the invocation
//!   context and outcomes.
//! - [`signal`]: cancellation token, run flags and the done-signal.
//! - [`config`]: TOML-backed worker configuration.

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod signal;
pub mod types;
pub mod worker;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn};

use crate::cli::{CliArgs, FaultKind};
use crate::config::{default_config_path, load_and_validate};

pub use crate::config::WorkerConfig;
pub use crate::errors::WorkerError;
pub use crate::exec::{InvocationContext, RunOutcome, StartOptions, WorkerFault};
pub use crate::signal::CancelToken;
pub use crate::types::LaunchStrategy;
pub use crate::worker::Worker;

/// High-level entry point used by `main.rs`.
///
/// Blocking: resolves the config, runs the demo callback on a worker for
/// `--run-ms`, stops it and prints a short summary.
pub fn run(args: CliArgs) -> Result<()> {
    let config = resolve_config(&args)?;

    if args.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    let ticks = Arc::new(AtomicU64::new(0));
    let mut worker: Worker<String, tracing::Span> = Worker::with_config(config);

    worker
        .on_pre_start(|| debug!("pre-start hook"))
        .on_pre_stop(|| debug!("pre-stop hook"))
        .on_fault(|fault| warn!(error = %fault, "demo callback fault"));

    {
        let ticks = Arc::clone(&ticks);
        let tick = Duration::from_millis(args.tick_ms.max(1));
        let fail_after = args.fail_after;
        let fault = args.fault;

        worker.on_work(move |ctx| {
            while !ctx.is_cancelled() {
                thread::sleep(tick);
                let n = ticks.fetch_add(1, Ordering::SeqCst) + 1;
                ctx.log().in_scope(|| {
                    info!(device = ctx.device_id(), tick = n, handle = %ctx.handle(), "tick")
                });

                if fail_after == Some(n) {
                    match fault {
                        FaultKind::Error => anyhow::bail!("injected failure after {n} ticks"),
                        FaultKind::Panic => panic!("injected panic after {n} ticks"),
                    }
                }
            }
            Ok(())
        });
    }

    let span = info_span!("work", worker = %worker.name());
    worker.start_with(
        format!("device:{}", args.device),
        span,
        StartOptions::new()
            .device(args.device)
            .initial_delay(Duration::from_millis(args.initial_delay_ms)),
    );

    thread::sleep(Duration::from_millis(args.run_ms));
    worker.stop().context("stopping demo worker")?;

    println!("workerctl summary");
    println!("  strategy    = {}", worker.strategy());
    println!("  invocations = {}", worker.invocations());
    println!("  ticks       = {}", ticks.load(Ordering::SeqCst));
    match worker.last_fault() {
        Some(fault) => println!("  fault       = {fault}"),
        None => println!("  fault       = none"),
    }

    worker.dispose().context("disposing demo worker")?;
    Ok(())
}

/// Config file (explicit, or `Workerctl.toml` when it exists) plus the
/// `--name`, `--strategy` and `--stop-timeout-ms` overrides.
pub fn resolve_config(args: &CliArgs) -> Result<WorkerConfig> {
    let path = args
        .config
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| Some(default_config_path()).filter(|p| p.is_file()));

    let mut config = match path {
        Some(path) => load_config(&path)?,
        None => WorkerConfig::default(),
    };

    if let Some(name) = &args.name {
        config = config.with_name(name.as_str());
    }
    if let Some(strategy) = args.strategy {
        config = config.with_strategy(strategy);
    }
    if let Some(ms) = args.stop_timeout_ms {
        config = config.with_stop_timeout(Duration::from_millis(ms));
    }
    Ok(config)
}

fn load_config(path: &Path) -> Result<WorkerConfig> {
    let config = load_and_validate(path)
        .with_context(|| format!("loading worker config from {}", path.display()))?;
    info!(path = %path.display(), "loaded worker config");
    Ok(config)
}

fn print_dry_run(config: &WorkerConfig) {
    println!("workerctl dry-run");
    println!("  worker.name            = {}", config.name());
    println!("  worker.strategy        = {}", config.strategy());
    println!(
        "  worker.stop_timeout_ms = {}",
        config.stop_timeout().as_millis()
    );

    debug!("dry-run complete (no worker started)");
}
