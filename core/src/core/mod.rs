pub mod context;
pub mod handler;
pub mod outcome;
pub mod step;

// Re-export key types for easier access from other vigil modules (and lib.rs)
pub use context::{Context, MergePolicy, Request, INPUT_SCHEMA_KEY};
pub use handler::TerminalHandler;
pub use outcome::{ActionOutcome, DynamicError, ErrorCode, ValidationOutcome};
pub use step::{FnValidator, Validator};
