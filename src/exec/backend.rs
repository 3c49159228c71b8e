// src/exec/backend.rs

//! Pluggable launch backends for the background unit.
//!
//! A `Worker` talks to a `Launcher` instead of spawning threads itself. Two
//! production implementations exist, one per [`LaunchStrategy`]:
//!
//! - `DedicatedThread` spawns a named `std::thread` per invocation.
//! - `PooledTask` runs the invocation on a tokio blocking pool, which is
//!   meant for long-running synchronous work.
//!
//! Tests can provide their own `Launcher`, e.g. one that refuses to launch.

use std::fmt;
use std::sync::OnceLock;
use std::thread;

use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{debug, error};

use crate::errors::{Result, WorkerError};
use crate::types::LaunchStrategy;

/// A unit of work to run on the background unit.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Trait abstracting how the background unit is started.
pub trait Launcher: Send + Sync + fmt::Debug {
    fn strategy(&self) -> LaunchStrategy;

    /// Start `job` on a new background unit named `name`.
    fn launch(&self, name: &str, job: Job) -> Result<UnitHandle>;
}

/// Handle to a launched background unit.
///
/// Dropping it detaches the unit; completion is observed through the
/// done-signal, not by joining.
#[derive(Debug)]
pub enum UnitHandle {
    Thread(thread::JoinHandle<()>),
    Task(tokio::task::JoinHandle<()>),
}

impl UnitHandle {
    /// Whether the underlying thread/task has fully exited.
    pub fn is_finished(&self) -> bool {
        match self {
            UnitHandle::Thread(h) => h.is_finished(),
            UnitHandle::Task(h) => h.is_finished(),
        }
    }
}

/// Build the launcher for a strategy.
pub fn launcher_for(strategy: LaunchStrategy) -> Box<dyn Launcher> {
    match strategy {
        LaunchStrategy::Dedicated => Box::new(DedicatedThread),
        LaunchStrategy::Pooled => Box::new(PooledTask::new()),
    }
}

/// One OS thread per invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DedicatedThread;

impl Launcher for DedicatedThread {
    fn strategy(&self) -> LaunchStrategy {
        LaunchStrategy::Dedicated
    }

    fn launch(&self, name: &str, job: Job) -> Result<UnitHandle> {
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(job)
            .map_err(|e| WorkerError::Launch {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(UnitHandle::Thread(handle))
    }
}

/// A task on a tokio blocking pool.
///
/// Pool resolution order: the handle given to [`PooledTask::with_handle`],
/// the runtime the caller is currently inside of, then a lazily built shared
/// pool for callers without a runtime.
#[derive(Debug, Clone, Default)]
pub struct PooledTask {
    handle: Option<Handle>,
}

impl PooledTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    fn resolve_handle(&self, name: &str) -> Result<Handle> {
        if let Some(handle) = &self.handle {
            return Ok(handle.clone());
        }
        if let Ok(handle) = Handle::try_current() {
            return Ok(handle);
        }
        shared_pool()
            .map(|rt| rt.handle().clone())
            .ok_or_else(|| WorkerError::Launch {
                name: name.to_string(),
                reason: "shared worker pool is unavailable".to_string(),
            })
    }
}

impl Launcher for PooledTask {
    fn strategy(&self) -> LaunchStrategy {
        LaunchStrategy::Pooled
    }

    fn launch(&self, name: &str, job: Job) -> Result<UnitHandle> {
        let handle = self.resolve_handle(name)?;
        Ok(UnitHandle::Task(handle.spawn_blocking(job)))
    }
}

/// Process-wide runtime backing `PooledTask` outside of any runtime.
///
/// It is never shut down; its blocking threads are reclaimed after their
/// keep-alive elapses.
fn shared_pool() -> Option<&'static Runtime> {
    static POOL: OnceLock<Option<Runtime>> = OnceLock::new();

    POOL.get_or_init(|| {
        match Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("workerctl-pool")
            .enable_all()
            .build()
        {
            Ok(rt) => {
                debug!("shared worker pool started");
                Some(rt)
            }
            Err(err) => {
                error!(error = %err, "failed to build shared worker pool");
                None
            }
        }
    })
    .as_ref()
}
