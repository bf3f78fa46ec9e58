//! Builder for constructing contexts.

use crate::builder::error::BuildError;
use crate::core::{State, StateRef};
use crate::machine::Context;
use std::sync::Arc;

/// Builder for constructing contexts with a fluent API.
///
/// # Example
///
/// ```rust
/// use stepwise::{from_fn, Context, ContextBuilder, Next};
///
/// let start = from_fn("Start", |_ctx: &mut Context<u8>| Ok(Next::done()));
///
/// let context = ContextBuilder::new()
///     .initial(start)
///     .data(7u8)
///     .build()
///     .unwrap();
///
/// assert_eq!(context.current_name(), Some("Start"));
/// assert_eq!(*context.data(), 7);
/// ```
pub struct ContextBuilder<D> {
    initial: Option<StateRef<D>>,
    data: Option<D>,
}

impl<D> ContextBuilder<D> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            data: None,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: StateRef<D>) -> Self {
        self.initial = Some(state);
        self
    }

    /// Set the initial state from a concrete value.
    pub fn initial_state<S>(self, state: S) -> Self
    where
        S: State<D> + 'static,
    {
        self.initial(Arc::new(state))
    }

    /// Set the shared data.
    pub fn data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    /// Build the context.
    /// Returns an error if the initial state or the data is missing.
    pub fn build(self) -> Result<Context<D>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let data = self.data.ok_or(BuildError::MissingData)?;
        Ok(Context::new(initial, data))
    }

    /// Build the context, falling back to `D::default()` for missing data.
    pub fn build_default(self) -> Result<Context<D>, BuildError>
    where
        D: Default,
    {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        Ok(Context::new(initial, self.data.unwrap_or_default()))
    }
}

impl<D> Default for ContextBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Next;
    use crate::machine::MachineError;

    struct Finish;

    impl State<u32> for Finish {
        fn run(&self, context: &mut Context<u32>) -> Result<Next<u32>, MachineError> {
            *context.data_mut() += 1;
            Ok(Next::done())
        }
    }

    #[test]
    fn builder_requires_initial_state() {
        let result = ContextBuilder::<u32>::new().data(1).build();

        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn builder_requires_data() {
        let result = ContextBuilder::<u32>::new().initial_state(Finish).build();

        assert!(matches!(result, Err(BuildError::MissingData)));
    }

    #[test]
    fn build_default_fills_in_data() {
        let mut context = ContextBuilder::<u32>::new()
            .initial_state(Finish)
            .build_default()
            .unwrap();

        context.run().unwrap();

        assert_eq!(*context.data(), 1);
    }

    #[test]
    fn fluent_api_builds_context() {
        let context = ContextBuilder::new()
            .initial_state(Finish)
            .data(10u32)
            .build()
            .unwrap();

        assert!(!context.is_done());
        assert_eq!(context.current_name(), Some("Finish"));
        assert_eq!(*context.data(), 10);
    }
}
