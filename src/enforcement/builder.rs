//! Builder API for creating run policies.

use crate::enforcement::context::StepContext;
use crate::enforcement::rules::{PolicyCheck, RunPolicy};
use crate::enforcement::violations::{PolicyViolation, ViolationStrategy};

/// Builder for creating run policies
#[derive(Default)]
pub struct PolicyBuilder {
    max_steps: Option<usize>,
    required_checks: Vec<PolicyCheck>,
    on_violation: ViolationStrategy,
}

impl PolicyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of states a run may execute
    pub fn max_steps(mut self, n: usize) -> Self {
        self.max_steps = Some(n);
        self
    }

    /// Add a custom check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&StepContext) -> Result<(), PolicyViolation> + Send + Sync + 'static,
    {
        self.required_checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&StepContext) -> bool + Send + Sync + 'static,
    {
        self.require(move |ctx: &StepContext| {
            if predicate(ctx) {
                Ok(())
            } else {
                Err(PolicyViolation::CustomCheckFailed {
                    message: error_msg.clone(),
                })
            }
        })
    }

    /// Set violation handling strategy
    pub fn on_violation(mut self, strategy: ViolationStrategy) -> Self {
        self.on_violation = strategy;
        self
    }

    pub fn build(self) -> RunPolicy {
        RunPolicy {
            max_steps: self.max_steps,
            required_checks: self.required_checks,
            on_violation: self.on_violation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_stores_limits() {
        let policy = PolicyBuilder::new()
            .max_steps(7)
            .require_pred(|ctx| ctx.step % 2 == 1, "odd steps only".to_string())
            .on_violation(ViolationStrategy::Halt)
            .build();

        assert_eq!(policy.max_steps(), Some(7));
        assert_eq!(policy.check_count(), 1);
        assert_eq!(policy.violation_strategy(), ViolationStrategy::Halt);
    }

    #[test]
    fn default_builder_has_no_limits() {
        let policy = PolicyBuilder::new().build();

        assert_eq!(policy.max_steps(), None);
        assert_eq!(policy.check_count(), 0);
        assert_eq!(policy.violation_strategy(), ViolationStrategy::Abort);
    }
}
