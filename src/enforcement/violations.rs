//! Reasons a bounded run may refuse the next step.

use thiserror::Error;

/// One check that did not hold before a step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("step {current} is past the limit of {max}")]
    MaxStepsExceeded { max: usize, current: usize },

    #[error("{message}")]
    CustomCheckFailed { message: String },
}

/// What `run_with_policy` does once a step is refused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViolationStrategy {
    /// Return `MachineError::PolicyViolated`; the refused state stays current.
    #[default]
    Abort,

    /// Install the terminal marker and return `RunOutcome::Halted`.
    Halt,

    /// Emit a warning per violation and run the step anyway.
    IgnoreAndLog,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        let steps = PolicyViolation::MaxStepsExceeded { max: 4, current: 5 };
        assert_eq!(steps.to_string(), "step 5 is past the limit of 4");

        let custom = PolicyViolation::CustomCheckFailed {
            message: "queue drained".to_string(),
        };
        assert_eq!(custom.to_string(), "queue drained");
    }
}
