//! The driver side of the state machine.
//!
//! A [`Context`] owns the current state slot and the client's shared data.
//! It runs the current state, installs whatever that state reports next and
//! stops once the terminal marker is installed.

mod context;
mod error;

pub use context::{Context, RunOutcome, DEFAULT_HISTORY_LIMIT};
pub use error::MachineError;
