//! Errors reported while driving a machine.

use crate::enforcement::PolicyViolation;
use thiserror::Error;

/// Errors that can occur while running states.
#[derive(Debug, Error)]
pub enum MachineError {
    /// A state was run without providing its behavior.
    #[error("State '{state}' does not implement run()")]
    NotImplemented { state: String },

    /// `run_once` was called after the machine reached its terminal marker.
    #[error("State machine is finished; call reset() before running it again")]
    Finished,

    /// A run policy check failed under the `Abort` strategy.
    #[error("Run policy violated in state '{state}' ({} violation(s))", .violations.len())]
    PolicyViolated {
        state: String,
        violations: Vec<PolicyViolation>,
    },
}
