//! Run policy evaluation using Validation.

use crate::enforcement::context::StepContext;
use crate::enforcement::violations::{PolicyViolation, ViolationStrategy};
use std::fmt;
use stillwater::{NonEmptyVec, Validation};

/// Type alias for custom policy checks
pub type PolicyCheck = Box<dyn Fn(&StepContext) -> Result<(), PolicyViolation> + Send + Sync>;

/// Step limit plus caller-supplied checks for a bounded run.
/// Uses Validation to report every failed check at once.
#[derive(Default)]
pub struct RunPolicy {
    pub(crate) max_steps: Option<usize>,
    pub(crate) required_checks: Vec<PolicyCheck>,
    pub(crate) on_violation: ViolationStrategy,
}

impl RunPolicy {
    /// Evaluate the step limit and every custom check against `context`.
    /// Returns `Validation::Success(())` if all checks pass and
    /// `Validation::Failure` with ALL violations otherwise.
    pub fn enforce(&self, context: &StepContext) -> Validation<(), NonEmptyVec<PolicyViolation>> {
        let mut violations = Vec::new();

        if let Some(max) = self.max_steps {
            if context.step > max {
                violations.push(PolicyViolation::MaxStepsExceeded {
                    max,
                    current: context.step,
                });
            }
        }

        violations.extend(
            self.required_checks
                .iter()
                .filter_map(|check| check(context).err()),
        );

        match NonEmptyVec::from_vec(violations) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(()),
        }
    }

    pub fn violation_strategy(&self) -> ViolationStrategy {
        self.on_violation
    }

    pub fn max_steps(&self) -> Option<usize> {
        self.max_steps
    }

    /// Number of custom checks registered.
    pub fn check_count(&self) -> usize {
        self.required_checks.len()
    }
}

impl fmt::Debug for RunPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunPolicy")
            .field("max_steps", &self.max_steps)
            .field("required_checks", &self.required_checks.len())
            .field("on_violation", &self.on_violation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enforcement::builder::PolicyBuilder;

    fn step(step: usize) -> StepContext {
        StepContext {
            state: "Working".to_string(),
            step,
        }
    }

    fn violations(result: Validation<(), NonEmptyVec<PolicyViolation>>) -> Vec<PolicyViolation> {
        match result {
            Validation::Failure(errors) => errors.into_iter().collect(),
            Validation::Success(_) => Vec::new(),
        }
    }

    #[test]
    fn enforcement_accumulates_all_violations() {
        let policy = PolicyBuilder::new()
            .max_steps(3)
            .require_pred(|_ctx| false, "Custom check always fails".to_string())
            .require_pred(|ctx| ctx.step < 2, "Too late for this".to_string())
            .build();

        let errors = violations(policy.enforce(&step(5)));

        assert_eq!(
            errors,
            vec![
                PolicyViolation::MaxStepsExceeded { max: 3, current: 5 },
                PolicyViolation::CustomCheckFailed {
                    message: "Custom check always fails".to_string()
                },
                PolicyViolation::CustomCheckFailed {
                    message: "Too late for this".to_string()
                },
            ]
        );
    }

    #[test]
    fn enforcement_succeeds_when_all_checks_pass() {
        let policy = PolicyBuilder::new()
            .max_steps(10)
            .require_pred(|_ctx| true, "This check always passes".to_string())
            .build();

        assert!(matches!(policy.enforce(&step(1)), Validation::Success(())));
    }

    #[test]
    fn custom_check_sees_state_name() {
        let policy = PolicyBuilder::new()
            .require(|ctx: &StepContext| {
                if ctx.state == "Forbidden" {
                    Err(PolicyViolation::CustomCheckFailed {
                        message: format!("{} may not run", ctx.state),
                    })
                } else {
                    Ok(())
                }
            })
            .build();

        assert!(violations(policy.enforce(&step(1))).is_empty());

        let forbidden = StepContext {
            state: "Forbidden".to_string(),
            ..step(1)
        };
        assert_eq!(
            violations(policy.enforce(&forbidden)),
            vec![PolicyViolation::CustomCheckFailed {
                message: "Forbidden may not run".to_string()
            }]
        );
    }

    #[test]
    fn max_steps_boundary() {
        let policy = PolicyBuilder::new().max_steps(3).build();

        assert!(violations(policy.enforce(&step(3))).is_empty());
        assert_eq!(
            violations(policy.enforce(&step(4))),
            vec![PolicyViolation::MaxStepsExceeded { max: 3, current: 4 }]
        );
    }

    #[test]
    fn empty_policy_never_fails() {
        let policy = RunPolicy::default();

        assert!(violations(policy.enforce(&step(usize::MAX))).is_empty());
        assert_eq!(policy.check_count(), 0);
        assert_eq!(policy.violation_strategy(), ViolationStrategy::Abort);
    }

    #[test]
    fn debug_lists_only_step_limit_and_checks() {
        let policy = PolicyBuilder::new()
            .max_steps(2)
            .require_pred(|_ctx| true, "unused".to_string())
            .build();

        assert_eq!(
            format!("{policy:?}"),
            "RunPolicy { max_steps: Some(2), required_checks: 1, on_violation: Abort }"
        );
    }
}
