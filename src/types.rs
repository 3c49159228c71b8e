use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// How the background unit of a [`Worker`](crate::worker::Worker) is launched.
///
/// Both strategies honour the same start/stop contract; they only differ in
/// what the unit costs.
///
/// - `Dedicated`: a named OS thread owned by the worker for one invocation.
/// - `Pooled`: a task on a tokio blocking pool (default). The pool of the
///   ambient runtime is used when there is one, otherwise a shared
///   process-wide pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchStrategy {
    Dedicated,
    Pooled,
}

impl Default for LaunchStrategy {
    fn default() -> Self {
        LaunchStrategy::Pooled
    }
}

impl LaunchStrategy {
    /// Map the legacy "use a thread instead of a task" switch.
    pub fn from_use_thread(use_thread: bool) -> Self {
        if use_thread {
            LaunchStrategy::Dedicated
        } else {
            LaunchStrategy::Pooled
        }
    }
}

impl fmt::Display for LaunchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchStrategy::Dedicated => f.write_str("dedicated"),
            LaunchStrategy::Pooled => f.write_str("pooled"),
        }
    }
}

impl FromStr for LaunchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dedicated" | "thread" => Ok(LaunchStrategy::Dedicated),
            "pooled" | "task" => Ok(LaunchStrategy::Pooled),
            other => Err(format!(
                "invalid launch strategy: {other} (expected \"dedicated\" or \"pooled\")"
            )),
        }
    }
}
