// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::types::LaunchStrategy;

/// How long `stop` waits for the done-signal unless configured otherwise.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(10);

/// Worker configuration as read from a TOML file.
///
/// ```toml
/// [worker]
/// name = "prefetch"
/// strategy = "dedicated"
/// stop_timeout_ms = 10000
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawWorkerConfig {
    #[serde(default)]
    pub worker: RawWorkerSection,
}

/// `[worker]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWorkerSection {
    /// Used for log fields and as the dedicated thread name.
    #[serde(default = "default_name")]
    pub name: String,

    /// `"dedicated"` or `"pooled"` (default).
    #[serde(default)]
    pub strategy: LaunchStrategy,

    /// Upper bound for the termination wait in `stop`.
    #[serde(default = "default_stop_timeout_ms")]
    pub stop_timeout_ms: u64,
}

fn default_name() -> String {
    "worker".to_string()
}

fn default_stop_timeout_ms() -> u64 {
    u64::try_from(DEFAULT_STOP_TIMEOUT.as_millis()).unwrap_or(u64::MAX)
}

impl Default for RawWorkerSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            strategy: LaunchStrategy::default(),
            stop_timeout_ms: default_stop_timeout_ms(),
        }
    }
}

/// Validated worker configuration.
///
/// Obtain one through `WorkerConfig::try_from(raw)`, [`WorkerConfig::new`]
/// or `Default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    name: String,
    strategy: LaunchStrategy,
    stop_timeout: Duration,
}

impl WorkerConfig {
    /// Defaults with the given strategy.
    pub fn new(strategy: LaunchStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub(crate) fn new_unchecked(
        name: String,
        strategy: LaunchStrategy,
        stop_timeout: Duration,
    ) -> Self {
        Self {
            name,
            strategy,
            stop_timeout,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategy(&self) -> LaunchStrategy {
        self.strategy
    }

    pub fn stop_timeout(&self) -> Duration {
        self.stop_timeout
    }

    /// Blank names are ignored.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() && !name.contains('\0') {
            self.name = name.trim().to_string();
        }
        self
    }

    pub fn with_strategy(mut self, strategy: LaunchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Zero is ignored; the termination wait always has a positive bound.
    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.stop_timeout = timeout;
        }
        self
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self::new_unchecked(default_name(), LaunchStrategy::default(), DEFAULT_STOP_TIMEOUT)
    }
}
