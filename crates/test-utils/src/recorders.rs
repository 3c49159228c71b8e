use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use workerctl::Worker;

/// Counts lifecycle hook invocations of a worker.
#[derive(Clone, Default)]
pub struct HookCounter {
    pre_start: Arc<AtomicUsize>,
    pre_stop: Arc<AtomicUsize>,
    faults: Arc<AtomicUsize>,
}

impl HookCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install counting `on_pre_start`, `on_pre_stop` and `on_fault` hooks.
    pub fn attach<C, L>(&self, worker: &mut Worker<C, L>) {
        let pre_start = Arc::clone(&self.pre_start);
        let pre_stop = Arc::clone(&self.pre_stop);
        let faults = Arc::clone(&self.faults);

        worker
            .on_pre_start(move || {
                pre_start.fetch_add(1, Ordering::SeqCst);
            })
            .on_pre_stop(move || {
                pre_stop.fetch_add(1, Ordering::SeqCst);
            })
            .on_fault(move |_| {
                faults.fetch_add(1, Ordering::SeqCst);
            });
    }

    pub fn pre_start(&self) -> usize {
        self.pre_start.load(Ordering::SeqCst)
    }

    pub fn pre_stop(&self) -> usize {
        self.pre_stop.load(Ordering::SeqCst)
    }

    pub fn faults(&self) -> usize {
        self.faults.load(Ordering::SeqCst)
    }
}

/// Tracks how many callback bodies run at once and the peak.
#[derive(Clone, Default)]
pub struct ConcurrencyTracker {
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    entered: Arc<AtomicUsize>,
}

impl ConcurrencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a callback body as entered; the guard marks it as left.
    pub fn enter(&self) -> ConcurrencyGuard {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.entered.fetch_add(1, Ordering::SeqCst);
        ConcurrencyGuard {
            current: Arc::clone(&self.current),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn entered(&self) -> usize {
        self.entered.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }
}

pub struct ConcurrencyGuard {
    current: Arc<AtomicUsize>,
}

impl Drop for ConcurrencyGuard {
    fn drop(&mut self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A shared boolean flag for callbacks to flip.
#[derive(Clone, Default)]
pub struct Flag(Arc<AtomicBool>);

impl Flag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
