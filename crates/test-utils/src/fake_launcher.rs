use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use workerctl::LaunchStrategy;
use workerctl::errors::{Result, WorkerError};
use workerctl::exec::{DedicatedThread, Job, Launcher, UnitHandle};

/// A launcher that never launches anything.
#[derive(Debug, Default)]
pub struct RefusingLauncher;

impl Launcher for RefusingLauncher {
    fn strategy(&self) -> LaunchStrategy {
        LaunchStrategy::Dedicated
    }

    fn launch(&self, name: &str, _job: Job) -> Result<UnitHandle> {
        Err(WorkerError::Launch {
            name: name.to_string(),
            reason: "launcher refuses by construction".to_string(),
        })
    }
}

/// A dedicated-thread launcher that counts successful launches.
#[derive(Debug, Clone, Default)]
pub struct CountingLauncher {
    launches: Arc<AtomicUsize>,
}

impl CountingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared counter, readable after the launcher moved into a worker.
    pub fn launches(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.launches)
    }
}

impl Launcher for CountingLauncher {
    fn strategy(&self) -> LaunchStrategy {
        LaunchStrategy::Dedicated
    }

    fn launch(&self, name: &str, job: Job) -> Result<UnitHandle> {
        let handle = DedicatedThread.launch(name, job)?;
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(handle)
    }
}
