// src/exec/mod.rs

//! Execution layer: everything that runs on, or launches, the background unit.
//!
//! - [`backend`] provides the `Launcher` trait with the `DedicatedThread` and
//!   `PooledTask` implementations.
//! - [`envelope`] is the wrapper run on the background unit; it owns the
//!   `running`/`done` signalling around the work callback.
//! - [`context`] is the per-invocation argument bundle.
//! - [`outcome`] is what an invocation reports back through the done-signal.

pub mod backend;
pub mod context;
pub mod envelope;
pub mod outcome;

pub use backend::{DedicatedThread, Job, Launcher, PooledTask, UnitHandle, launcher_for};
pub use context::{InvocationContext, StartOptions, WorkArg};
pub use envelope::WorkFn;
pub use outcome::{RunOutcome, WorkerFault};
