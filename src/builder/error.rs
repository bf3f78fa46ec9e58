//! Build errors for context builders.

use thiserror::Error;

/// Errors that can occur when building a context.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Shared data not specified. Call .data(value) or use .build_default()")]
    MissingData,
}
