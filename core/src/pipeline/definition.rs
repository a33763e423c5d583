// vigil/src/pipeline/definition.rs

//! Contains the `Pipeline<P, T, E>` struct definition and the methods used to
//! compose it: declaring the input schema, appending validators and setting the
//! terminal handler.

use crate::core::context::MergePolicy;
use crate::core::handler::{boxed_handler, TerminalHandler};
use crate::core::outcome::{ActionOutcome, ErrorCode, ValidationOutcome};
use crate::core::step::{FnValidator, Validator};
use crate::core::Request;
use crate::schema::Schema;
use std::future::Future;
use std::sync::Arc;

pub(crate) const DEFAULT_ACTION_NAME: &str = "action";

/// The core Pipeline type.
///
/// - `P` is the parameters type every invocation is called with.
/// - `T` is the success payload type produced by the terminal handler.
/// - `E` is the failure type shared by every validator and the terminal handler;
///   its variants are the pipeline's known error codes.
///
/// The validator list and the handler are read-only once the pipeline is being run,
/// so one pipeline can serve any number of concurrent invocations.
pub struct Pipeline<P, T, E>
where
  P: Send + Sync + 'static,
  T: Send + 'static,
  E: ErrorCode + Send + 'static,
{
  pub(crate) name: String,
  pub(crate) input_schema: Option<Arc<dyn Schema>>,
  /// Ordered; append order is execution order.
  pub(crate) validators: Vec<Arc<dyn Validator<P, E>>>,
  pub(crate) handler: Option<TerminalHandler<P, T, E>>,
  pub(crate) merge_policy: MergePolicy,
}

impl<P, T, E> Pipeline<P, T, E>
where
  P: Send + Sync + 'static,
  T: Send + 'static,
  E: ErrorCode + Send + 'static,
{
  /// Creates an empty pipeline: no input schema, no validators, no terminal handler.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      input_schema: None,
      validators: Vec::new(),
      handler: None,
      merge_policy: MergePolicy::default(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn validator_count(&self) -> usize {
    self.validators.len()
  }

  pub fn validator_names(&self) -> Vec<&str> {
    self.validators.iter().map(|v| v.name()).collect()
  }

  pub fn has_handler(&self) -> bool {
    self.handler.is_some()
  }

  pub fn input_schema(&self) -> Option<&Arc<dyn Schema>> {
    self.input_schema.as_ref()
  }

  pub fn merge_policy(&self) -> MergePolicy {
    self.merge_policy
  }

  /// Records the input schema, replacing any previously declared one.
  pub fn set_input_schema(&mut self, schema: Arc<dyn Schema>) {
    if self.input_schema.is_some() {
      tracing::debug!(action = %self.name, "Replacing previously declared input schema.");
    }
    self.input_schema = Some(schema);
  }

  pub fn set_merge_policy(&mut self, policy: MergePolicy) {
    self.merge_policy = policy;
  }

  /// Appends a validator to the end of the ordered list.
  pub fn push_validator(&mut self, validator: Arc<dyn Validator<P, E>>) {
    self.validators.push(validator);
  }

  /// Appends an async closure as a validator, named after its position.
  pub fn push_validator_fn<F, Fut>(&mut self, validator_fn: F)
  where
    F: Fn(Request<P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ValidationOutcome<E>> + Send + 'static,
  {
    let name = format!("validator_{}", self.validators.len());
    self.push_validator(Arc::new(FnValidator::new(name, validator_fn)));
  }

  /// Records the terminal handler, replacing any previous one.
  pub fn set_handler<F, Fut>(&mut self, handler_fn: F)
  where
    F: Fn(Request<P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActionOutcome<T, E>> + Send + 'static,
  {
    self.handler = Some(boxed_handler(handler_fn));
  }

  pub(crate) fn set_shared_handler(&mut self, handler: TerminalHandler<P, T, E>) {
    self.handler = Some(handler);
  }
}

impl<P, T, E> Default for Pipeline<P, T, E>
where
  P: Send + Sync + 'static,
  T: Send + 'static,
  E: ErrorCode + Send + 'static,
{
  fn default() -> Self {
    Self::new(DEFAULT_ACTION_NAME)
  }
}

// Validators and the handler are shared through `Arc`, so cloning copies the
// step list but never the steps themselves.
impl<P, T, E> Clone for Pipeline<P, T, E>
where
  P: Send + Sync + 'static,
  T: Send + 'static,
  E: ErrorCode + Send + 'static,
{
  fn clone(&self) -> Self {
    Self {
      name: self.name.clone(),
      input_schema: self.input_schema.clone(),
      validators: self.validators.clone(),
      handler: self.handler.clone(),
      merge_policy: self.merge_policy,
    }
  }
}

impl<P, T, E> std::fmt::Debug for Pipeline<P, T, E>
where
  P: Send + Sync + 'static,
  T: Send + 'static,
  E: ErrorCode + Send + 'static,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline")
      .field("name", &self.name)
      .field("input_schema_present", &self.input_schema.is_some())
      .field("validators", &self.validator_names())
      .field("handler_present", &self.handler.is_some())
      .field("merge_policy", &self.merge_policy)
      .finish()
  }
}
