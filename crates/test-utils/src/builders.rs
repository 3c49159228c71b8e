#![allow(dead_code)]

use std::time::Duration;

use workerctl::config::{RawWorkerConfig, RawWorkerSection};
use workerctl::{LaunchStrategy, Worker, WorkerConfig};

/// Builder for `WorkerConfig` that goes through the same validation as a
/// TOML file.
pub struct WorkerConfigBuilder {
    config: RawWorkerConfig,
}

impl WorkerConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawWorkerConfig {
                worker: RawWorkerSection::default(),
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.config.worker.name = name.to_string();
        self
    }

    pub fn strategy(mut self, strategy: LaunchStrategy) -> Self {
        self.config.worker.strategy = strategy;
        self
    }

    pub fn stop_timeout(mut self, timeout: Duration) -> Self {
        self.config.worker.stop_timeout_ms =
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn build(self) -> WorkerConfig {
        WorkerConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }

    /// A worker with no hooks, using unit handles.
    pub fn build_worker(self) -> Worker<(), ()> {
        Worker::with_config(self.build())
    }
}

impl Default for WorkerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Both strategies, for tests that must hold for either.
pub const ALL_STRATEGIES: [LaunchStrategy; 2] = [LaunchStrategy::Dedicated, LaunchStrategy::Pooled];
