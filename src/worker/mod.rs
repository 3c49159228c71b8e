// src/worker/mod.rs

//! The single-worker controller.
//!
//! A [`Worker`] owns at most one background unit at a time:
//!
//! ```text
//! start ─► on_pre_start ─► Launcher::launch ─► Envelope::run
//!                                               ├─ running = true
//!                                               ├─ sleep(initial_delay)
//!                                               ├─ on_work(ctx)
//!                                               └─ running = false, done ─┐
//! stop  ─► on_pre_stop ─► cancel ─► abort ─► wait(done, stop_timeout) ◄───┘
//! ```
//!
//! Hook registration lives in [`hooks`]; the lifecycle in [`controller`].

pub mod controller;
pub mod hooks;

pub use controller::Worker;
pub use hooks::{FaultHook, HookFn};
