// src/exec/envelope.rs

//! The wrapper that runs on the background unit around the work callback.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::{debug, trace};

use crate::exec::context::InvocationContext;
use crate::exec::outcome::{RunOutcome, WorkerFault};
use crate::signal::{DoneSender, RunSignals};

/// The work callback registered with `Worker::on_work`.
pub type WorkFn<C, L> =
    Arc<dyn Fn(&mut InvocationContext<C, L>) -> anyhow::Result<()> + Send + Sync>;

/// One invocation, ready to be moved onto a background unit.
pub(crate) struct Envelope<C, L> {
    pub(crate) worker: String,
    pub(crate) ctx: InvocationContext<C, L>,
    pub(crate) work: Option<WorkFn<C, L>>,
    pub(crate) signals: Arc<RunSignals>,
    pub(crate) done: DoneSender,
}

impl<C, L> Envelope<C, L> {
    /// Run the invocation to completion.
    ///
    /// 1. set `running`
    /// 2. sleep for the initial delay, if any (cancellation is not consulted)
    /// 3. call the work callback, if one is registered
    /// 4. on every exit path: clear `running`, set `done`, fire the
    ///    done-signal with the outcome
    ///
    /// Errors and panics from step 2–3 end up in the outcome; they never skip
    /// step 4.
    pub(crate) fn run(self) {
        let Envelope {
            worker,
            mut ctx,
            work,
            signals,
            done,
        } = self;

        let invocation = ctx.invocation();
        let started = Instant::now();

        signals.mark_running();
        debug!(worker = %worker, invocation, "background unit running");

        let result = panic::catch_unwind(AssertUnwindSafe(move || {
            let delay = ctx.initial_delay();
            if !delay.is_zero() {
                trace!(invocation, ?delay, "sleeping for initial delay");
                thread::sleep(delay);
            }

            let res = match work {
                Some(work) => work(&mut ctx),
                None => Ok(()),
            };

            // Release the forwarded handles before anyone is told we're done.
            drop(ctx);
            res
        }));

        let elapsed = started.elapsed();
        let outcome = match result {
            Ok(Ok(())) => RunOutcome::completed(invocation, elapsed),
            Ok(Err(err)) => RunOutcome::faulted(invocation, elapsed, WorkerFault::Failed(err)),
            Err(payload) => {
                RunOutcome::faulted(invocation, elapsed, WorkerFault::from_panic(payload))
            }
        };

        signals.mark_finished();
        debug!(
            worker = %worker,
            invocation,
            success = outcome.is_success(),
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "background unit finished"
        );
        done.fire(outcome);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::exec::context::StartOptions;
    use crate::signal::{CancelToken, DoneWait, done_signal};

    type Ctx = InvocationContext<(), ()>;

    fn envelope(
        work: Option<WorkFn<(), ()>>,
        options: StartOptions,
    ) -> (Envelope<(), ()>, Arc<RunSignals>, crate::signal::DoneReceiver) {
        let signals = Arc::new(RunSignals::new());
        let (done, rx) = done_signal();
        let ctx = InvocationContext::new((), (), CancelToken::new(), signals.clone(), 1, options);
        let env = Envelope {
            worker: "test".to_string(),
            ctx,
            work,
            signals: signals.clone(),
            done,
        };
        (env, signals, rx)
    }

    fn fired(rx: &crate::signal::DoneReceiver) -> RunOutcome {
        match rx.wait(Duration::from_secs(1)) {
            DoneWait::Fired(outcome) => outcome,
            other => panic!("expected done to fire, got {other:?}"),
        }
    }

    #[test]
    fn missing_callback_still_signals_done() {
        let (env, signals, rx) = envelope(None, StartOptions::default());
        env.run();

        assert!(fired(&rx).is_success());
        assert!(signals.is_done());
        assert!(!signals.is_running());
    }

    #[test]
    fn callback_runs_with_running_set() {
        let (env, signals, rx) = envelope(None, StartOptions::default());
        let observer = signals.clone();
        let check: WorkFn<(), ()> = Arc::new(move |ctx: &mut Ctx| -> anyhow::Result<()> {
            anyhow::ensure!(observer.is_running(), "running not set during callback");
            anyhow::ensure!(!ctx.cancellation_pending(), "abort set without a stop");
            Ok(())
        });
        Envelope {
            work: Some(check),
            ..env
        }
        .run();

        assert!(fired(&rx).is_success());
    }

    #[test]
    fn error_is_captured_as_fault() {
        let work: WorkFn<(), ()> = Arc::new(|_ctx: &mut Ctx| -> anyhow::Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        });
        let (env, signals, rx) = envelope(Some(work), StartOptions::default());
        env.run();

        let outcome = fired(&rx);
        match outcome.fault() {
            Some(WorkerFault::Failed(err)) => assert!(err.to_string().contains("disk on fire")),
            other => panic!("expected Failed fault, got {other:?}"),
        }
        assert!(!signals.is_running());
    }

    #[test]
    fn panic_is_captured_as_fault() {
        let work: WorkFn<(), ()> = Arc::new(|_ctx: &mut Ctx| -> anyhow::Result<()> { panic!("kaboom") });
        let (env, signals, rx) = envelope(Some(work), StartOptions::default());
        env.run();

        let outcome = fired(&rx);
        assert!(matches!(outcome.fault(), Some(WorkerFault::Panicked(m)) if m == "kaboom"));
        assert!(signals.is_done());
        assert!(!signals.is_running());
    }

    #[test]
    fn initial_delay_is_included_in_elapsed() {
        let (env, _signals, rx) = envelope(
            None,
            StartOptions::new().initial_delay(Duration::from_millis(30)),
        );
        env.run();

        assert!(fired(&rx).elapsed() >= Duration::from_millis(30));
    }
}
