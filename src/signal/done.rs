// src/signal/done.rs

//! One-shot done-signal carrying the outcome of one invocation.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use crate::exec::outcome::RunOutcome;

/// Create a connected done-signal pair for one invocation.
pub fn done_signal() -> (DoneSender, DoneReceiver) {
    // Capacity 1: the envelope never blocks on fire, even if nobody waits.
    let (tx, rx) = mpsc::sync_channel(1);
    (DoneSender { tx }, DoneReceiver { rx })
}

/// Sending half, owned by the execution envelope.
///
/// `fire` consumes the sender, so the signal fires at most once.
#[derive(Debug)]
pub struct DoneSender {
    tx: mpsc::SyncSender<RunOutcome>,
}

impl DoneSender {
    pub fn fire(self, outcome: RunOutcome) {
        // A dropped receiver means the worker gave up waiting (stop timeout).
        let _ = self.tx.try_send(outcome);
    }
}

/// Receiving half, owned by the worker while the unit is alive.
#[derive(Debug)]
pub struct DoneReceiver {
    rx: mpsc::Receiver<RunOutcome>,
}

/// Result of waiting on a [`DoneReceiver`].
#[derive(Debug)]
pub enum DoneWait {
    /// The envelope finished and reported its outcome.
    Fired(RunOutcome),
    /// The bound elapsed first.
    TimedOut,
    /// The sender went away without firing (the unit never ran).
    Lost,
}

impl DoneReceiver {
    /// Block the calling thread until the signal fires or `timeout` elapses.
    pub fn wait(&self, timeout: Duration) -> DoneWait {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => DoneWait::Fired(outcome),
            Err(RecvTimeoutError::Timeout) => DoneWait::TimedOut,
            Err(RecvTimeoutError::Disconnected) => DoneWait::Lost,
        }
    }
}
