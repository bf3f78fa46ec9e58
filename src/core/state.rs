//! The `State` trait and the values a state hands back to its context.
//!
//! A state is one unit of behavior. Each time it is visited the context calls
//! [`State::run`], passing itself by mutable reference, and the state answers
//! with a [`Next`]: the state to move to (or none, meaning the machine is
//! finished) and an optional hook to run before the move happens.

use crate::machine::{Context, MachineError};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Shared handle to a state.
///
/// States are reference counted so the same instance can be the initial
/// state, the current state, and the successor of several other states.
pub type StateRef<D> = Arc<dyn State<D>>;

/// Callback run with the context immediately before a new state is installed.
pub type TransitionHook<D> = Box<dyn FnOnce(&mut Context<D>) + Send>;

/// Trait for the states of a machine whose shared data is `D`.
///
/// The context reference passed to [`run`](State::run) is rebound on every
/// step and is only valid for the duration of that call. States never own
/// their context.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use stepwise::{Context, MachineError, Next, State, StateRef};
///
/// struct Greet;
///
/// impl State<Vec<String>> for Greet {
///     fn name(&self) -> &str {
///         "Greet"
///     }
///
///     fn run(&self, context: &mut Context<Vec<String>>) -> Result<Next<Vec<String>>, MachineError> {
///         context.data_mut().push("hello".to_string());
///         Ok(Next::done())
///     }
/// }
///
/// let initial: StateRef<Vec<String>> = Arc::new(Greet);
/// let mut context = Context::new(initial, Vec::new());
/// context.run().unwrap();
///
/// assert!(context.is_done());
/// assert_eq!(context.data(), &vec!["hello".to_string()]);
/// ```
pub trait State<D>: Send + Sync {
    /// Name used in logs and transition history.
    ///
    /// Defaults to the unqualified type name, without generic arguments.
    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Perform this state's behavior and report where to go next.
    ///
    /// The default body is the abstract form: it reports
    /// [`MachineError::NotImplemented`] so a state that forgot to provide its
    /// behavior fails loudly instead of silently ending the machine.
    fn run(&self, context: &mut Context<D>) -> Result<Next<D>, MachineError> {
        let _ = context;
        Err(MachineError::NotImplemented {
            state: self.name().to_string(),
        })
    }
}

impl<D> fmt::Debug for dyn State<D> + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({})", self.name())
    }
}

/// Outcome of running a state: the successor plus an optional hook.
pub struct Next<D> {
    pub(crate) state: Option<StateRef<D>>,
    pub(crate) transition: Option<TransitionHook<D>>,
}

impl<D> Next<D> {
    /// Move to an existing shared state.
    pub fn to(state: StateRef<D>) -> Self {
        Self {
            state: Some(state),
            transition: None,
        }
    }

    /// Move to a freshly constructed state.
    pub fn to_new<S>(state: S) -> Self
    where
        S: State<D> + 'static,
    {
        Self::to(Arc::new(state))
    }

    /// The terminal marker: the machine stops after this state.
    pub fn done() -> Self {
        Self {
            state: None,
            transition: None,
        }
    }

    /// Attach a hook that runs before the next state is installed.
    ///
    /// The hook sees the outgoing state as still current.
    pub fn with_transition<F>(mut self, transition: F) -> Self
    where
        F: FnOnce(&mut Context<D>) + Send + 'static,
    {
        self.transition = Some(Box::new(transition));
        self
    }

    /// The reported successor, `None` for the terminal marker.
    pub fn state(&self) -> Option<&StateRef<D>> {
        self.state.as_ref()
    }

    pub fn is_done(&self) -> bool {
        self.state.is_none()
    }

    pub fn has_transition(&self) -> bool {
        self.transition.is_some()
    }

    /// Split into the successor and the hook.
    pub fn into_parts(self) -> (Option<StateRef<D>>, Option<TransitionHook<D>>) {
        (self.state, self.transition)
    }
}

impl<D> From<Option<StateRef<D>>> for Next<D> {
    fn from(state: Option<StateRef<D>>) -> Self {
        Self {
            state,
            transition: None,
        }
    }
}

impl<D> From<StateRef<D>> for Next<D> {
    fn from(state: StateRef<D>) -> Self {
        Self::to(state)
    }
}

impl<D> fmt::Debug for Next<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("state", &self.state.as_ref().map(|s| s.name()))
            .field("transition", &self.transition.is_some())
            .finish()
    }
}

/// A state whose behavior is a closure.
pub struct FnState<D, F> {
    name: String,
    behavior: F,
    _phantom: PhantomData<fn(D)>,
}

impl<D, F> State<D> for FnState<D, F>
where
    F: Fn(&mut Context<D>) -> Result<Next<D>, MachineError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, context: &mut Context<D>) -> Result<Next<D>, MachineError> {
        (self.behavior)(context)
    }
}

/// Build a shared state from a closure.
///
/// # Example
///
/// ```rust
/// use stepwise::{from_fn, Context, Next};
///
/// let count = from_fn("Count", |ctx: &mut Context<u32>| {
///     *ctx.data_mut() += 1;
///     Ok(Next::done())
/// });
///
/// let mut context = Context::new(count, 0);
/// context.run().unwrap();
/// assert_eq!(*context.data(), 1);
/// ```
pub fn from_fn<D, F>(name: impl Into<String>, behavior: F) -> StateRef<D>
where
    D: 'static,
    F: Fn(&mut Context<D>) -> Result<Next<D>, MachineError> + Send + Sync + 'static,
{
    Arc::new(FnState {
        name: name.into(),
        behavior,
        _phantom: PhantomData,
    })
}
