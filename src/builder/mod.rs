//! Builder API for constructing contexts.

pub mod context;
pub mod error;

pub use context::ContextBuilder;
pub use error::BuildError;
