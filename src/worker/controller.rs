// src/worker/controller.rs

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, trace, warn};

use crate::config::WorkerConfig;
use crate::errors::{Result, WorkerError};
use crate::exec::envelope::Envelope;
use crate::exec::{
    InvocationContext, Launcher, StartOptions, UnitHandle, WorkerFault, launcher_for,
};
use crate::signal::{CancelToken, DoneReceiver, DoneWait, RunSignals, done_signal};
use crate::types::LaunchStrategy;

use super::hooks::Hooks;

/// The background unit of the current invocation.
struct ActiveUnit {
    handle: UnitHandle,
    done: DoneReceiver,
    invocation: u64,
}

/// Owns exactly one background unit of work and its start/stop lifecycle.
///
/// `C` is the contextual (compute) handle and `L` the logging sink handle
/// passed through to the work callback untouched.
///
/// ```no_run
/// use workerctl::{LaunchStrategy, Worker};
///
/// let mut worker: Worker<(), ()> = Worker::new(LaunchStrategy::Dedicated);
/// worker.on_work(|ctx| {
///     while !ctx.is_cancelled() {
///         std::thread::sleep(std::time::Duration::from_millis(5));
///     }
///     Ok(())
/// });
/// worker.start((), ());
/// worker.stop().expect("worker did not stop in time");
/// ```
///
/// Dropping a worker that still has a live unit stops it first.
pub struct Worker<C, L> {
    config: WorkerConfig,
    launcher: Box<dyn Launcher>,
    /// Token of the most recent invocation; replaced by every `start`, so an
    /// orphaned unit keeps the one it was launched with.
    cancel: CancelToken,
    disposed: bool,
    /// Signals of the most recent invocation.
    signals: Arc<RunSignals>,
    unit: Option<ActiveUnit>,
    hooks: Hooks<C, L>,
    last_fault: Option<WorkerFault>,
    invocations: u64,
}

impl<C, L> Worker<C, L> {
    /// Worker with default settings and the given launch strategy.
    pub fn new(strategy: LaunchStrategy) -> Self {
        Self::with_config(WorkerConfig::new(strategy))
    }

    pub fn with_config(config: WorkerConfig) -> Self {
        let launcher = launcher_for(config.strategy());
        Self::with_launcher(config, launcher)
    }

    /// Worker using a caller-provided launcher; its strategy overrides the
    /// one in `config`.
    pub fn with_launcher(config: WorkerConfig, launcher: Box<dyn Launcher>) -> Self {
        let config = config.with_strategy(launcher.strategy());
        Self {
            config,
            launcher,
            cancel: CancelToken::new(),
            disposed: false,
            signals: Arc::new(RunSignals::new()),
            unit: None,
            hooks: Hooks::default(),
            last_fault: None,
            invocations: 0,
        }
    }

    /// Register the work callback run on the background unit.
    ///
    /// The callback is picked up by the next `start`; a running invocation
    /// keeps the one it was started with.
    pub fn on_work<F>(&mut self, work: F) -> &mut Self
    where
        F: Fn(&mut InvocationContext<C, L>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hooks.work = Some(Arc::new(work));
        self
    }

    /// Runs on the caller's thread right before the unit is launched.
    pub fn on_pre_start<F>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut() + Send + 'static,
    {
        self.hooks.pre_start = Some(Box::new(hook));
        self
    }

    /// Runs on the caller's thread at the top of every `stop`, whether or
    /// not a unit is alive.
    pub fn on_pre_stop<F>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut() + Send + 'static,
    {
        self.hooks.pre_stop = Some(Box::new(hook));
        self
    }

    /// Receives every fault the worker collects: callback errors and panics
    /// (delivered when `stop` collects the done-signal) and launch failures.
    pub fn on_fault<F>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut(&WorkerFault) + Send + 'static,
    {
        self.hooks.fault = Some(Box::new(hook));
        self
    }

    /// Stop the background unit, if any.
    ///
    /// Fires `on_pre_stop`, sets the cancellation token, raises the abort
    /// signal and waits up to the configured stop timeout for the done-signal.
    /// The unit handle is released either way; on timeout the unit is
    /// detached and `WorkerError::StopTimeout` is returned.
    pub fn stop(&mut self) -> Result<()> {
        self.hooks.fire_pre_stop();

        let Some(unit) = self.unit.take() else {
            trace!(worker = %self.config.name(), "stop: no background unit alive");
            return Ok(());
        };

        self.cancel.cancel();

        self.wait_for_terminate(unit)
    }

    fn wait_for_terminate(&mut self, unit: ActiveUnit) -> Result<()> {
        self.signals.request_abort();

        let timeout = self.config.stop_timeout();
        debug!(
            worker = %self.config.name(),
            invocation = unit.invocation,
            ?timeout,
            "waiting for background unit to finish"
        );

        match unit.done.wait(timeout) {
            DoneWait::Fired(outcome) => {
                info!(
                    worker = %self.config.name(),
                    invocation = outcome.invocation(),
                    success = outcome.is_success(),
                    elapsed_ms = u64::try_from(outcome.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "worker stopped"
                );
                if let Some(fault) = outcome.into_fault() {
                    self.record_fault(fault);
                }
                Ok(())
            }
            DoneWait::Lost => {
                self.record_fault(WorkerFault::Lost);
                Ok(())
            }
            DoneWait::TimedOut => {
                error!(
                    worker = %self.config.name(),
                    invocation = unit.invocation,
                    finished = unit.handle.is_finished(),
                    ?timeout,
                    "background unit failed to stop; detaching it"
                );
                Err(WorkerError::StopTimeout {
                    name: self.config.name().to_string(),
                    timeout,
                })
            }
        }
    }

    fn record_fault(&mut self, fault: WorkerFault) {
        warn!(
            worker = %self.config.name(),
            error = %fault,
            "background unit reported a fault"
        );
        self.hooks.fire_fault(&fault);
        self.last_fault = Some(fault);
    }

    /// `stop`, then mark the worker disposed.
    ///
    /// Repeatable: later calls only re-run `on_pre_stop`. A disposed worker
    /// ignores `start`.
    pub fn dispose(&mut self) -> Result<()> {
        let res = self.stop();
        if !self.disposed {
            self.disposed = true;
            self.cancel.cancel();
            debug!(worker = %self.config.name(), "worker disposed");
        }
        res
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether `stop` is currently (or was last) waiting on the unit.
    ///
    /// Reset by `start`. The callback sees the same flag through
    /// [`InvocationContext::cancellation_pending`].
    pub fn cancellation_pending(&self) -> bool {
        self.signals.is_abort_requested()
    }

    /// Whether the soft cancellation request of the latest invocation is set.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// True from a successful `start` until the next `stop`, even if the
    /// callback already returned.
    pub fn is_started(&self) -> bool {
        self.unit.is_some()
    }

    /// Whether the envelope of the latest invocation is executing.
    pub fn is_running(&self) -> bool {
        self.signals.is_running()
    }

    /// Whether the latest invocation has fired its done-signal.
    pub fn is_done(&self) -> bool {
        self.signals.is_done()
    }

    /// Number of invocations started on this worker.
    pub fn invocations(&self) -> u64 {
        self.invocations
    }

    pub fn last_fault(&self) -> Option<&WorkerFault> {
        self.last_fault.as_ref()
    }

    pub fn take_fault(&mut self) -> Option<WorkerFault> {
        self.last_fault.take()
    }

    pub fn strategy(&self) -> LaunchStrategy {
        self.config.strategy()
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }
}

impl<C, L> Worker<C, L>
where
    C: Send + 'static,
    L: Send + 'static,
{
    /// Start with device 0, no argument and no initial delay.
    pub fn start(&mut self, handle: C, log: L) {
        self.start_with(handle, log, StartOptions::default());
    }

    /// Launch a new invocation unless one is already alive.
    ///
    /// Creates fresh cancellation and abort signals, fires `on_pre_start`, then
    /// hands a fresh [`InvocationContext`] to the launcher. Never fails: a
    /// launch failure is logged and reported as [`WorkerFault::Launch`], and
    /// callback faults only show up when `stop` collects the outcome.
    pub fn start_with(&mut self, handle: C, log: L, options: StartOptions) {
        if let Some(unit) = &self.unit {
            debug!(
                worker = %self.config.name(),
                invocation = unit.invocation,
                "start ignored; background unit already alive"
            );
            return;
        }

        if self.disposed {
            warn!(worker = %self.config.name(), "start ignored; worker has been disposed");
            return;
        }

        self.cancel = CancelToken::new();
        self.signals = Arc::new(RunSignals::new());

        self.hooks.fire_pre_start();

        self.invocations += 1;
        let invocation = self.invocations;
        let (done, done_rx) = done_signal();

        let envelope = Envelope {
            worker: self.config.name().to_string(),
            ctx: InvocationContext::new(
                handle,
                log,
                self.cancel.clone(),
                Arc::clone(&self.signals),
                invocation,
                options,
            ),
            work: self.hooks.work.clone(),
            signals: Arc::clone(&self.signals),
            done,
        };

        let launched = self
            .launcher
            .launch(self.config.name(), Box::new(move || envelope.run()));

        match launched {
            Ok(handle) => {
                info!(
                    worker = %self.config.name(),
                    invocation,
                    strategy = %self.launcher.strategy(),
                    "worker started"
                );
                self.unit = Some(ActiveUnit {
                    handle,
                    done: done_rx,
                    invocation,
                });
            }
            Err(err) => {
                error!(
                    worker = %self.config.name(),
                    invocation,
                    error = %err,
                    "failed to launch background unit"
                );
                self.record_fault(WorkerFault::Launch(err.to_string()));
            }
        }
    }
}

impl<C, L> fmt::Debug for Worker<C, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("config", &self.config)
            .field("started", &self.is_started())
            .field("running", &self.is_running())
            .field("invocations", &self.invocations)
            .field("disposed", &self.is_disposed())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl<C, L> Drop for Worker<C, L> {
    fn drop(&mut self) {
        if self.is_disposed() {
            return;
        }
        if let Err(err) = self.dispose() {
            error!(worker = %self.config.name(), error = %err, "dispose on drop failed");
        }
    }
}

impl<C, L> Default for Worker<C, L> {
    fn default() -> Self {
        Self::with_config(WorkerConfig::default())
    }
}
