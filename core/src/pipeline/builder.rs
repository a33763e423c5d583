// vigil/src/pipeline/builder.rs

//! The fluent `ActionBuilder` and the `Action` entry point it produces.

use crate::core::context::{MergePolicy, Request};
use crate::core::handler::boxed_handler;
use crate::core::outcome::{ActionOutcome, ErrorCode, ValidationOutcome};
use crate::core::step::{FnValidator, Validator};
use crate::error::VigilError;
use crate::pipeline::definition::{Pipeline, DEFAULT_ACTION_NAME};
use crate::schema::{Schema, SchemaError, SchemaValidator};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::{event, Level};

/// Fluent builder for an action pipeline.
///
/// Every composition call consumes and returns the builder. `action` finalizes: it
/// returns an invocable `Action` and leaves the builder usable, so one builder can act
/// as a shared base (e.g. an authenticated client) for several actions.
///
/// ```ignore
/// let base = ActionBuilder::<Params, Post, AppError>::new().validate(require_session);
/// let create_post = base.clone().named("create_post").validate(require_admin).action(create);
/// ```
pub struct ActionBuilder<P, T, E>
where
  P: Send + Sync + 'static,
  T: Send + 'static,
  E: ErrorCode + Send + 'static,
{
  pipeline: Pipeline<P, T, E>,
}

impl<P, T, E> ActionBuilder<P, T, E>
where
  P: Send + Sync + 'static,
  T: Send + 'static,
  E: ErrorCode + Send + 'static,
{
  pub fn new() -> Self {
    Self {
      pipeline: Pipeline::new(DEFAULT_ACTION_NAME),
    }
  }

  /// Sets the name used in logs and in `VigilError::HandlerMissing`.
  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.pipeline.name = name.into();
    self
  }

  /// Declares the input shape. Nothing is validated by this call; the schema is only
  /// made available to later steps (see `validate_input`). Replaces any earlier schema.
  pub fn input_schema(mut self, schema: impl Schema + 'static) -> Self {
    self.pipeline.set_input_schema(Arc::new(schema));
    self
  }

  pub fn merge_policy(mut self, policy: MergePolicy) -> Self {
    self.pipeline.set_merge_policy(policy);
    self
  }

  /// Appends an async closure as the next validator.
  pub fn validate<F, Fut>(mut self, validator_fn: F) -> Self
  where
    F: Fn(Request<P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ValidationOutcome<E>> + Send + 'static,
  {
    self.pipeline.push_validator_fn(validator_fn);
    self
  }

  /// Like `validate`, with an explicit step name for logs.
  pub fn validate_named<F, Fut>(mut self, name: impl Into<String>, validator_fn: F) -> Self
  where
    F: Fn(Request<P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ValidationOutcome<E>> + Send + 'static,
  {
    self
      .pipeline
      .push_validator(Arc::new(FnValidator::new(name, validator_fn)));
    self
  }

  /// Appends a `Validator` implementation as the next step.
  pub fn validate_with(mut self, validator: impl Validator<P, E> + 'static) -> Self {
    self.pipeline.push_validator(Arc::new(validator));
    self
  }

  /// Appends a schema validator that checks the params against the declared input schema.
  pub fn validate_input(self) -> Self
  where
    P: Serialize,
    E: From<SchemaError>,
  {
    self.validate_with(SchemaValidator::declared())
  }

  /// Finalizes with the terminal handler and returns the invocable action.
  ///
  /// The builder is left untouched; the handler belongs to the returned `Action` only.
  pub fn action<F, Fut>(&self, handler_fn: F) -> Action<P, T, E>
  where
    F: Fn(Request<P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActionOutcome<T, E>> + Send + 'static,
  {
    let mut pipeline = self.pipeline.clone();
    pipeline.set_shared_handler(boxed_handler(handler_fn));
    event!(
      Level::DEBUG,
      action = %pipeline.name,
      num_validators = pipeline.validators.len(),
      "Action finalized."
    );
    Action {
      pipeline: Arc::new(pipeline),
    }
  }

  /// Gives up the fluent API and returns the pipeline as composed so far, without a
  /// terminal handler unless one is set on it afterwards.
  pub fn into_pipeline(self) -> Pipeline<P, T, E> {
    self.pipeline
  }
}

impl<P, T, E> Default for ActionBuilder<P, T, E>
where
  P: Send + Sync + 'static,
  T: Send + 'static,
  E: ErrorCode + Send + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<P, T, E> Clone for ActionBuilder<P, T, E>
where
  P: Send + Sync + 'static,
  T: Send + 'static,
  E: ErrorCode + Send + 'static,
{
  fn clone(&self) -> Self {
    Self {
      pipeline: self.pipeline.clone(),
    }
  }
}

/// An assembled pipeline with its terminal handler, ready to be invoked.
///
/// Cheap to clone; clones share the same read-only pipeline.
pub struct Action<P, T, E>
where
  P: Send + Sync + 'static,
  T: Send + 'static,
  E: ErrorCode + Send + 'static,
{
  pipeline: Arc<Pipeline<P, T, E>>,
}

impl<P, T, E> Action<P, T, E>
where
  P: Send + Sync + 'static,
  T: Send + 'static,
  E: ErrorCode + Send + 'static,
{
  pub async fn run(&self, params: P) -> Result<ActionOutcome<T, E>, VigilError> {
    self.pipeline.run(params).await
  }

  pub fn name(&self) -> &str {
    self.pipeline.name()
  }

  pub fn pipeline(&self) -> &Pipeline<P, T, E> {
    &self.pipeline
  }
}

impl<P, T, E> Clone for Action<P, T, E>
where
  P: Send + Sync + 'static,
  T: Send + 'static,
  E: ErrorCode + Send + 'static,
{
  fn clone(&self) -> Self {
    Self {
      pipeline: Arc::clone(&self.pipeline),
    }
  }
}

impl<P, T, E> From<Pipeline<P, T, E>> for ActionBuilder<P, T, E>
where
  P: Send + Sync + 'static,
  T: Send + 'static,
  E: ErrorCode + Send + 'static,
{
  fn from(pipeline: Pipeline<P, T, E>) -> Self {
    Self { pipeline }
  }
}
