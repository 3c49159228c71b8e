// src/exec/outcome.rs

use std::any::Any;
use std::time::Duration;

use thiserror::Error;

/// Why an invocation did not complete normally.
#[derive(Debug, Error)]
pub enum WorkerFault {
    /// The work callback returned an error.
    #[error("work callback failed: {0:#}")]
    Failed(anyhow::Error),

    /// The work callback panicked.
    #[error("work callback panicked: {0}")]
    Panicked(String),

    /// No background unit could be launched.
    #[error("background unit could not be launched: {0}")]
    Launch(String),

    /// The unit went away without firing its done-signal.
    #[error("background unit ended without reporting an outcome")]
    Lost,
}

impl WorkerFault {
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        WorkerFault::Panicked(msg)
    }
}

/// What the execution envelope reports through the done-signal.
#[derive(Debug)]
pub struct RunOutcome {
    invocation: u64,
    elapsed: Duration,
    fault: Option<WorkerFault>,
}

impl RunOutcome {
    pub fn completed(invocation: u64, elapsed: Duration) -> Self {
        Self {
            invocation,
            elapsed,
            fault: None,
        }
    }

    pub fn faulted(invocation: u64, elapsed: Duration, fault: WorkerFault) -> Self {
        Self {
            invocation,
            elapsed,
            fault: Some(fault),
        }
    }

    /// Sequence number of the invocation (1-based per worker).
    pub fn invocation(&self) -> u64 {
        self.invocation
    }

    /// Wall time spent inside the envelope, initial delay included.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_success(&self) -> bool {
        self.fault.is_none()
    }

    pub fn fault(&self) -> Option<&WorkerFault> {
        self.fault.as_ref()
    }

    pub fn into_fault(self) -> Option<WorkerFault> {
        self.fault
    }
}
