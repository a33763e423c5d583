// src/lib.rs

//! Vigil: an ASYNC, type-safe action pipeline for Rust.
//!
//! An action is assembled from:
//!  - An optional input schema, stored in the execution context for later steps.
//!  - Zero or more ordered validators. Each one either passes, optionally adding
//!    entries to the execution context, or fails with a typed error that ends the run.
//!  - Exactly one terminal handler that does the actual work.
//!
//! The first failing validator short-circuits the pipeline and its error becomes the
//! action's `ActionOutcome::Failure` verbatim. Every invocation gets its own context,
//! so one `Action` can serve concurrent callers.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod schema;

// --- Re-exports for the Public API ---

pub use crate::core::context::{Context, MergePolicy, Request, INPUT_SCHEMA_KEY};
pub use crate::core::handler::TerminalHandler;
pub use crate::core::outcome::{ActionOutcome, DynamicError, ErrorCode, ValidationOutcome};
pub use crate::core::step::{FnValidator, Validator};

pub use crate::pipeline::{Action, ActionBuilder, Pipeline};

pub use crate::schema::{
  validate_params, validate_schema, JsonSchema, Schema, SchemaError, SchemaIssue, SchemaValidator, SCHEMA_ERROR_CODE,
};

pub use crate::error::{VigilError, VigilResult};

/*
    Typical use:
    1. Define a params type and an error enum whose variants are the failure codes;
       implement `ErrorCode` for it (and `From<SchemaError>` if schema validation is used).
    2. `ActionBuilder::<Params, Payload, MyError>::new()`
       - `.input_schema(JsonSchema::compile(json!({...}))?)` and `.validate_input()`
       - `.validate(|req| async move { ... })` for each pre-check, in order.
    3. `.action(|req| async move { ActionOutcome::success_with("done", payload) })`
    4. `action.run(params).await?` and match on the outcome.
*/
