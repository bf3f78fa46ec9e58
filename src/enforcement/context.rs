//! What a run policy sees before each step.

/// Snapshot handed to policy checks before a state runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepContext {
    /// Name of the state about to run
    pub state: String,
    /// 1-based index of the step about to run
    pub step: usize,
}
