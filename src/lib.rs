//! Stepwise: a minimal state machine execution framework
//!
//! Client code describes behavior as [`State`]s and drives them with a
//! [`Context`]. The context runs its current state, the state reports the
//! next one, and the context installs it, running an optional transition
//! hook first. The machine is done once a state reports the terminal marker
//! ([`Next::done`]).
//!
//! # Core Concepts
//!
//! - **State**: one unit of behavior, implemented via the `State` trait
//! - **Context**: the driver holding the current state and shared data
//! - **History**: the recorded path of installed states
//! - **Run policy**: optional step and time limits for bounded runs
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use stepwise::{Context, MachineError, Next, State, StateRef};
//!
//! #[derive(Default)]
//! struct Tally {
//!     ticks: u32,
//! }
//!
//! struct Tick;
//! struct Stop;
//!
//! impl State<Tally> for Tick {
//!     fn run(&self, context: &mut Context<Tally>) -> Result<Next<Tally>, MachineError> {
//!         context.data_mut().ticks += 1;
//!         if context.data().ticks < 3 {
//!             Ok(Next::to_new(Tick))
//!         } else {
//!             Ok(Next::to_new(Stop))
//!         }
//!     }
//! }
//!
//! impl State<Tally> for Stop {
//!     fn run(&self, _context: &mut Context<Tally>) -> Result<Next<Tally>, MachineError> {
//!         Ok(Next::done())
//!     }
//! }
//!
//! let initial: StateRef<Tally> = Arc::new(Tick);
//! let mut context = Context::new(initial, Tally::default());
//! context.run().unwrap();
//!
//! assert!(context.is_done());
//! assert_eq!(context.data().ticks, 3);
//! assert_eq!(context.history().get_path(), vec!["Tick", "Tick", "Tick", "Stop"]);
//! ```

pub mod builder;
pub mod core;
pub mod enforcement;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, ContextBuilder};
pub use crate::core::{from_fn, FnState, Next, State, StateHistory, StateRef, TransitionRecord};
pub use enforcement::{PolicyBuilder, RunPolicy, ViolationStrategy};
pub use machine::{Context, MachineError, RunOutcome};
