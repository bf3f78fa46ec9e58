//! Validation-based run policies.
//!
//! A plain [`Context::run`](crate::Context::run) loops for as long as its
//! states keep reporting successors. A [`RunPolicy`] bounds a run instead:
//! before each step the step limit and any custom checks are evaluated, and
//! ALL violations are collected with Stillwater's `Validation` rather than
//! stopping at the first one. Policies never look at the wall clock.
//!
//! # Example
//!
//! ```rust
//! use stepwise::enforcement::{PolicyBuilder, RunPolicy, ViolationStrategy};
//!
//! let policy: RunPolicy = PolicyBuilder::new()
//!     .max_steps(100)
//!     .require_pred(|step| step.state != "Forbidden", "forbidden state".to_string())
//!     .on_violation(ViolationStrategy::Halt)
//!     .build();
//!
//! assert_eq!(policy.max_steps(), Some(100));
//! ```

pub mod builder;
pub mod context;
pub mod rules;
pub mod violations;

pub use builder::PolicyBuilder;
pub use context::StepContext;
pub use rules::{PolicyCheck, RunPolicy};
pub use violations::{PolicyViolation, ViolationStrategy};
