//! The context that drives states.

use crate::core::{Next, StateHistory, StateRef, TransitionRecord};
use crate::enforcement::{PolicyViolation, RunPolicy, StepContext, ViolationStrategy};
use crate::machine::error::MachineError;
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use stillwater::Validation;
use tracing::{debug, trace, warn};

/// Number of transition records a context keeps unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

/// How a policy-bounded run ended.
#[derive(Clone, Debug, PartialEq)]
pub enum RunOutcome {
    /// A state reported the terminal marker.
    Completed { steps: usize },

    /// The policy halted the machine before it finished on its own.
    Halted {
        steps: usize,
        violations: Vec<PolicyViolation>,
    },
}

impl RunOutcome {
    /// Number of states executed during the run.
    pub fn steps(&self) -> usize {
        match self {
            Self::Completed { steps } | Self::Halted { steps, .. } => *steps,
        }
    }
}

/// Driver of a state machine whose shared data is `D`.
///
/// Holds the initial and current state, the client's shared data and the
/// transition history. A context with no current state is done.
///
/// The history keeps the most recent [`DEFAULT_HISTORY_LIMIT`] records by
/// default; see [`with_history_limit`](Self::with_history_limit).
///
/// # Example
///
/// ```rust
/// use stepwise::{from_fn, Context, Next};
///
/// let finish = from_fn("Finish", |ctx: &mut Context<Vec<&'static str>>| {
///     ctx.data_mut().push("finish");
///     Ok(Next::done())
/// });
/// let start = from_fn("Start", move |ctx: &mut Context<Vec<&'static str>>| {
///     ctx.data_mut().push("start");
///     Ok(Next::to(finish.clone()))
/// });
///
/// let mut context = Context::new(start, Vec::new());
/// context.run().unwrap();
///
/// assert!(context.is_done());
/// assert_eq!(context.data(), &vec!["start", "finish"]);
/// assert_eq!(context.history().get_path(), vec!["Start", "Finish"]);
///
/// context.reset();
/// assert_eq!(context.current_name(), Some("Start"));
/// ```
pub struct Context<D = ()> {
    initial: Option<StateRef<D>>,
    current: Option<StateRef<D>>,
    data: D,
    history: StateHistory,
    executed: bool,
}

impl<D> Context<D> {
    /// Create a context positioned at `initial`.
    pub fn new(initial: StateRef<D>, data: D) -> Self {
        Self {
            current: Some(Arc::clone(&initial)),
            initial: Some(initial),
            data,
            history: StateHistory::with_limit(DEFAULT_HISTORY_LIMIT),
            executed: false,
        }
    }

    /// Create a context with no initial state.
    ///
    /// The machine starts done; supply the initial state with
    /// [`run_from`](Self::run_from) or [`set_state`](Self::set_state).
    pub fn detached(data: D) -> Self {
        Self {
            initial: None,
            current: None,
            data,
            history: StateHistory::with_limit(DEFAULT_HISTORY_LIMIT),
            executed: false,
        }
    }

    /// Keep at most `limit` transition records, `None` for no cap.
    ///
    /// Existing records are discarded.
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history = match limit {
            Some(limit) => StateHistory::with_limit(limit),
            None => StateHistory::new(),
        };
        self
    }

    /// Run the current state once without installing its successor.
    ///
    /// Install the result with [`apply`](Self::apply) or
    /// [`set_state`](Self::set_state). The current state's side effects happen
    /// on every call.
    pub fn run_once(&mut self) -> Result<Next<D>, MachineError> {
        let state = self.current.clone().ok_or(MachineError::Finished)?;
        trace!(state = state.name(), "running state");
        self.executed = true;
        state.run(self)
    }

    /// Install `next` as the current state. `None` finishes the machine.
    pub fn set_state(&mut self, next: Option<StateRef<D>>) {
        let from = self.current_name().map(str::to_string);
        let to = next.as_ref().map(|s| s.name().to_string());
        debug!(from = ?from, to = ?to, "installing state");

        self.history = std::mem::take(&mut self.history).record(TransitionRecord {
            from,
            to,
            executed: self.executed,
            timestamp: Utc::now(),
        });
        self.current = next;
        self.executed = false;
    }

    /// Run `transition` with this context, then install `next`.
    ///
    /// The callback observes the outgoing state as still current.
    pub fn set_state_with<F>(&mut self, next: Option<StateRef<D>>, transition: F)
    where
        F: FnOnce(&mut Self),
    {
        transition(self);
        self.set_state(next);
    }

    /// Install a reported [`Next`], running its hook first if it carries one.
    pub fn apply(&mut self, next: Next<D>) {
        match next.into_parts() {
            (state, Some(transition)) => self.set_state_with(state, transition),
            (state, None) => self.set_state(state),
        }
    }

    /// Run from the current state until a state reports the terminal marker.
    ///
    /// A state graph that never reaches the terminal marker makes this loop
    /// forever; use [`run_with_policy`](Self::run_with_policy) to bound it.
    pub fn run(&mut self) -> Result<(), MachineError> {
        debug!(state = ?self.current_name(), "running state machine");
        while !self.is_done() {
            let next = self.run_once()?;
            self.apply(next);
        }
        debug!(transitions = self.history.len(), "state machine finished");
        Ok(())
    }

    /// Install `initial` as current and run to completion.
    ///
    /// If the context has no designated initial state yet, `initial` becomes
    /// the one [`reset`](Self::reset) returns to.
    pub fn run_from(&mut self, initial: StateRef<D>) -> Result<(), MachineError> {
        if self.initial.is_none() {
            self.initial = Some(Arc::clone(&initial));
        }
        self.set_state(Some(initial));
        self.run()
    }

    /// Run to completion while enforcing `policy` before every step.
    pub fn run_with_policy(&mut self, policy: &RunPolicy) -> Result<RunOutcome, MachineError> {
        let mut steps = 0;

        while let Some(name) = self.current_name().map(str::to_string) {
            let step = StepContext {
                state: name,
                step: steps + 1,
            };

            if let Validation::Failure(errors) = policy.enforce(&step) {
                let violations: Vec<PolicyViolation> = errors.into_iter().collect();
                match policy.violation_strategy() {
                    ViolationStrategy::Abort => {
                        return Err(MachineError::PolicyViolated {
                            state: step.state,
                            violations,
                        });
                    }
                    ViolationStrategy::Halt => {
                        warn!(state = %step.state, count = violations.len(), "run policy halted state machine");
                        self.set_state(None);
                        return Ok(RunOutcome::Halted { steps, violations });
                    }
                    ViolationStrategy::IgnoreAndLog => {
                        for violation in &violations {
                            warn!(state = %step.state, %violation, "run policy violated, continuing");
                        }
                    }
                }
            }

            let next = self.run_once()?;
            self.apply(next);
            steps += 1;
        }

        Ok(RunOutcome::Completed { steps })
    }

    /// True iff there is no current state.
    pub fn is_done(&self) -> bool {
        self.current.is_none()
    }

    /// Return to the initial state.
    ///
    /// Shared data is left untouched; the transition history is cleared.
    /// Wrappers that layer their own fields on top should call this before
    /// resetting them, or use [`reset_with`](Self::reset_with).
    pub fn reset(&mut self) {
        debug!(state = ?self.initial.as_ref().map(|s| s.name()), "resetting state machine");
        self.current = self.initial.clone();
        self.history = self.history.cleared();
        self.executed = false;
    }

    /// [`reset`](Self::reset), then reset the shared data with `reset_data`.
    pub fn reset_with<F>(&mut self, reset_data: F)
    where
        F: FnOnce(&mut D),
    {
        self.reset();
        reset_data(&mut self.data);
    }

    pub fn current_state(&self) -> Option<&StateRef<D>> {
        self.current.as_ref()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref().map(|s| s.name())
    }

    pub fn initial_state(&self) -> Option<&StateRef<D>> {
        self.initial.as_ref()
    }

    /// True if `state` is the very instance installed as current.
    pub fn is_current(&self, state: &StateRef<D>) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| same_state(current, state))
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    pub fn into_data(self) -> D {
        self.data
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }
}

impl<D: Default> Default for Context<D> {
    fn default() -> Self {
        Self::detached(D::default())
    }
}

impl<D: fmt::Debug> fmt::Debug for Context<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("initial", &self.initial.as_ref().map(|s| s.name()))
            .field("current", &self.current_name())
            .field("data", &self.data)
            .field("history", &self.history)
            .finish()
    }
}

// Compares data pointers only; vtable pointers for the same type may differ
// between codegen units.
fn same_state<D>(a: &StateRef<D>, b: &StateRef<D>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
