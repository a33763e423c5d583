// vigil/src/pipeline/mod.rs

//! Defines the `Pipeline<P, T, E>` struct, its composition, the fluent builder and
//! the execution logic.

pub mod builder;
pub mod definition;
pub mod execution;

// Re-export the main types
pub use builder::{Action, ActionBuilder};
pub use definition::Pipeline;
