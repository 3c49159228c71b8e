// src/exec/context.rs

//! Per-invocation argument bundle handed to the work callback.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::signal::{CancelToken, RunSignals};

/// Opaque caller-supplied argument.
pub type WorkArg = Arc<dyn Any + Send + Sync>;

/// Optional start parameters: device id, argument and initial delay.
#[derive(Clone, Default)]
pub struct StartOptions {
    pub device_id: i32,
    pub arg: Option<WorkArg>,
    pub initial_delay: Duration,
}

impl StartOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device(mut self, device_id: i32) -> Self {
        self.device_id = device_id;
        self
    }

    pub fn arg<T: Any + Send + Sync>(mut self, arg: T) -> Self {
        self.arg = Some(Arc::new(arg));
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }
}

impl fmt::Debug for StartOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartOptions")
            .field("device_id", &self.device_id)
            .field("has_arg", &self.arg.is_some())
            .field("initial_delay", &self.initial_delay)
            .finish()
    }
}

/// Everything one run of the work callback gets to see.
///
/// `C` is the contextual (compute) handle and `L` the logging sink handle;
/// the worker never looks inside either. The contextual handle is the only
/// field the callback may change, e.g. to swap in a re-bound handle. Nobody
/// else reads it during the run, so the change is not synchronized.
pub struct InvocationContext<C, L> {
    handle: C,
    log: L,
    cancel: CancelToken,
    signals: Arc<RunSignals>,
    device_id: i32,
    arg: Option<WorkArg>,
    initial_delay: Duration,
    invocation: u64,
}

impl<C, L> InvocationContext<C, L> {
    pub(crate) fn new(
        handle: C,
        log: L,
        cancel: CancelToken,
        signals: Arc<RunSignals>,
        invocation: u64,
        options: StartOptions,
    ) -> Self {
        Self {
            handle,
            log,
            cancel,
            signals,
            device_id: options.device_id,
            arg: options.arg,
            initial_delay: options.initial_delay,
            invocation,
        }
    }

    pub fn handle(&self) -> &C {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut C {
        &mut self.handle
    }

    /// Swap in a new contextual handle, returning the previous one.
    pub fn replace_handle(&mut self, handle: C) -> C {
        std::mem::replace(&mut self.handle, handle)
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// The soft "please wind down" request.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// `stop` is actively waiting for this run to end.
    pub fn cancellation_pending(&self) -> bool {
        self.signals.is_abort_requested()
    }

    pub fn device_id(&self) -> i32 {
        self.device_id
    }

    pub fn arg(&self) -> Option<&WorkArg> {
        self.arg.as_ref()
    }

    /// The argument downcast to `T`, if present and of that type.
    pub fn arg_as<T: Any>(&self) -> Option<&T> {
        self.arg.as_deref().and_then(|a| a.downcast_ref::<T>())
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// 1-based sequence number of this run on its worker.
    pub fn invocation(&self) -> u64 {
        self.invocation
    }
}

impl<C, L> fmt::Debug for InvocationContext<C, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationContext")
            .field("invocation", &self.invocation)
            .field("device_id", &self.device_id)
            .field("has_arg", &self.arg.is_some())
            .field("initial_delay", &self.initial_delay)
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(options: StartOptions) -> InvocationContext<String, ()> {
        InvocationContext::new(
            "gpu:0".to_string(),
            (),
            CancelToken::new(),
            Arc::new(RunSignals::new()),
            1,
            options,
        )
    }

    #[test]
    fn defaults_match_plain_start() {
        let ctx = context(StartOptions::default());
        assert_eq!(ctx.device_id(), 0);
        assert!(ctx.arg().is_none());
        assert_eq!(ctx.initial_delay(), Duration::ZERO);
        assert!(!ctx.is_cancelled());
        assert!(!ctx.cancellation_pending());
    }

    #[test]
    fn arg_downcasts_only_to_its_type() {
        let ctx = context(StartOptions::new().device(2).arg(17_usize));
        assert_eq!(ctx.device_id(), 2);
        assert_eq!(ctx.arg_as::<usize>(), Some(&17));
        assert!(ctx.arg_as::<String>().is_none());
    }

    #[test]
    fn handle_can_be_rebound() {
        let mut ctx = context(StartOptions::default());
        let old = ctx.replace_handle("gpu:1".to_string());
        assert_eq!(old, "gpu:0");
        ctx.handle_mut().push_str("/b");
        assert_eq!(ctx.handle(), "gpu:1/b");
    }
}
