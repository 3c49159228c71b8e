// src/cli.rs

//! CLI argument parsing for the `workerctl` demo driver, using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::LaunchStrategy;

/// Command-line arguments for `workerctl`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "workerctl",
    version,
    about = "Run a demo callback on a single background worker, then stop it.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Workerctl.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Worker name override (thread and log name). Blank values are ignored.
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Launch strategy override (dedicated, pooled).
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<LaunchStrategy>,

    /// Stop timeout override in milliseconds.
    #[arg(long, value_name = "MS")]
    pub stop_timeout_ms: Option<u64>,

    /// How long to let the worker run before stopping it.
    #[arg(long, value_name = "MS", default_value_t = 500)]
    pub run_ms: u64,

    /// Interval between demo ticks inside the callback.
    #[arg(long, value_name = "MS", default_value_t = 50)]
    pub tick_ms: u64,

    /// Delay before the callback is invoked.
    #[arg(long, value_name = "MS", default_value_t = 0)]
    pub initial_delay_ms: u64,

    /// Device id forwarded to the callback.
    #[arg(long, default_value_t = 0)]
    pub device: i32,

    /// Inject a fault after this many ticks.
    #[arg(long, value_name = "TICKS")]
    pub fail_after: Option<u64>,

    /// Kind of injected fault.
    #[arg(long, value_enum, default_value_t = FaultKind::Error)]
    pub fault: FaultKind,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WORKERCTL_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the worker configuration without starting anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// How the demo callback fails when `--fail-after` is given.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum FaultKind {
    Error,
    Panic,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
