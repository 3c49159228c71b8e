// src/signal/mod.rs

//! Signalling primitives shared between a worker and its background unit.
//!
//! - [`cancel`] holds the cooperative "please wind down" token.
//! - [`run_state`] holds the per-invocation `abort` / `running` / `done` flags.
//! - [`done`] is the one-shot channel that carries the invocation outcome
//!   back to `stop`.

pub mod cancel;
pub mod done;
pub mod run_state;

pub use cancel::CancelToken;
pub use done::{DoneReceiver, DoneSender, DoneWait, done_signal};
pub use run_state::RunSignals;
