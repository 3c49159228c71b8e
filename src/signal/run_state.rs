// src/signal/run_state.rs

use std::sync::atomic::{AtomicBool, Ordering};

/// The `abort`, `running` and `done` flags of one invocation.
///
/// A fresh set is created for every `start`, so a unit orphaned by a stop
/// timeout keeps writing to its own flags and never to those of a later run.
#[derive(Debug, Default)]
pub struct RunSignals {
    abort: AtomicBool,
    running: AtomicBool,
    done: AtomicBool,
}

impl RunSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set by `stop` right before it starts the bounded termination wait.
    pub fn request_abort(&self) {
        self.abort.store(true, Ordering::Release);
    }

    pub fn is_abort_requested(&self) -> bool {
        self.abort.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    pub(crate) fn mark_running(&self) {
        self.running.store(true, Ordering::Release);
    }

    /// Clears `running` before raising `done`; observers of `done` never see
    /// `running` still set.
    pub(crate) fn mark_finished(&self) {
        self.running.store(false, Ordering::Release);
        self.done.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finishing_clears_running_and_sets_done() {
        let signals = RunSignals::new();
        signals.mark_running();
        assert!(signals.is_running());
        assert!(!signals.is_done());

        signals.mark_finished();
        assert!(!signals.is_running());
        assert!(signals.is_done());
        assert!(!signals.is_abort_requested());
    }
}
