// src/worker/hooks.rs

use std::fmt;

use crate::exec::{WorkFn, WorkerFault};

/// A synchronous lifecycle hook (`on_pre_start`, `on_pre_stop`).
pub type HookFn = Box<dyn FnMut() + Send>;

/// Receives faults collected from finished invocations.
pub type FaultHook = Box<dyn FnMut(&WorkerFault) + Send>;

/// The single-slot callbacks of a worker. Setting a slot replaces what was
/// there before.
pub(crate) struct Hooks<C, L> {
    pub(crate) work: Option<WorkFn<C, L>>,
    pub(crate) pre_start: Option<HookFn>,
    pub(crate) pre_stop: Option<HookFn>,
    pub(crate) fault: Option<FaultHook>,
}

impl<C, L> Hooks<C, L> {
    pub(crate) fn fire_pre_start(&mut self) {
        if let Some(hook) = self.pre_start.as_mut() {
            hook();
        }
    }

    pub(crate) fn fire_pre_stop(&mut self) {
        if let Some(hook) = self.pre_stop.as_mut() {
            hook();
        }
    }

    pub(crate) fn fire_fault(&mut self, fault: &WorkerFault) {
        if let Some(hook) = self.fault.as_mut() {
            hook(fault);
        }
    }
}

impl<C, L> Default for Hooks<C, L> {
    fn default() -> Self {
        Self {
            work: None,
            pre_start: None,
            pre_stop: None,
            fault: None,
        }
    }
}

impl<C, L> fmt::Debug for Hooks<C, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("work", &self.work.is_some())
            .field("pre_start", &self.pre_start.is_some())
            .field("pre_stop", &self.pre_stop.is_some())
            .field("fault", &self.fault.is_some())
            .finish()
    }
}
