//! Core state types.
//!
//! This module contains the leaf side of the state machine:
//! - State behavior via the `State` trait
//! - The `Next` value a state reports after running
//! - Transition history recorded by the driving context

mod history;
mod state;

pub use history::{StateHistory, TransitionRecord};
pub use state::{from_fn, FnState, Next, State, StateRef, TransitionHook};
