// vigil/src/core/outcome.rs

//! The result algebra: what a validator step reports and what an action returns.
//!
//! Error codes and their payloads are paired by construction. A pipeline's error
//! type `E` is normally an enum with one variant per code, the variant's fields
//! being that code's payload, so matching on the variant yields the exact payload
//! shape. `DynamicError` covers the open-ended case.

use crate::core::context::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::convert::Infallible;

/// Exposes the string code of a failure value.
pub trait ErrorCode {
  /// The code identifying this failure, e.g. `"schemaError"`.
  fn code(&self) -> &str;

  /// Human-readable message used for `ActionOutcome::Failure` when a validator rejects
  /// a request.
  fn message(&self) -> Cow<'_, str> {
    Cow::Owned(format!("Request rejected: {}", self.code()))
  }
}

impl ErrorCode for Infallible {
  fn code(&self) -> &str {
    match *self {}
  }
}

/// Outcome of a single validator step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ValidationOutcome<E> {
  /// The step accepted the request, optionally contributing a context fragment.
  Pass { context: Option<Context> },
  /// The step rejected the request.
  Fail { error: E },
}

impl<E> ValidationOutcome<E> {
  pub fn pass() -> Self {
    ValidationOutcome::Pass { context: None }
  }

  pub fn pass_with(context: Context) -> Self {
    ValidationOutcome::Pass { context: Some(context) }
  }

  pub fn fail(error: impl Into<E>) -> Self {
    ValidationOutcome::Fail { error: error.into() }
  }

  pub fn is_pass(&self) -> bool {
    matches!(self, ValidationOutcome::Pass { .. })
  }

  pub fn error(&self) -> Option<&E> {
    match self {
      ValidationOutcome::Fail { error } => Some(error),
      ValidationOutcome::Pass { .. } => None,
    }
  }

  pub fn map_err<E2>(self, f: impl FnOnce(E) -> E2) -> ValidationOutcome<E2> {
    match self {
      ValidationOutcome::Pass { context } => ValidationOutcome::Pass { context },
      ValidationOutcome::Fail { error } => ValidationOutcome::Fail { error: f(error) },
    }
  }

  pub fn into_result(self) -> Result<Option<Context>, E> {
    match self {
      ValidationOutcome::Pass { context } => Ok(context),
      ValidationOutcome::Fail { error } => Err(error),
    }
  }
}

impl<E> From<Result<Option<Context>, E>> for ValidationOutcome<E> {
  fn from(result: Result<Option<Context>, E>) -> Self {
    match result {
      Ok(context) => ValidationOutcome::Pass { context },
      Err(error) => ValidationOutcome::Fail { error },
    }
  }
}

/// Outcome of a full action invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ActionOutcome<T, E> {
  Success { message: String, payload: Option<T> },
  Failure { message: String, error: E },
}

impl<T, E> ActionOutcome<T, E> {
  pub fn success(message: impl Into<String>) -> Self {
    ActionOutcome::Success {
      message: message.into(),
      payload: None,
    }
  }

  pub fn success_with(message: impl Into<String>, payload: T) -> Self {
    ActionOutcome::Success {
      message: message.into(),
      payload: Some(payload),
    }
  }

  pub fn failure(message: impl Into<String>, error: impl Into<E>) -> Self {
    ActionOutcome::Failure {
      message: message.into(),
      error: error.into(),
    }
  }

  pub fn is_success(&self) -> bool {
    matches!(self, ActionOutcome::Success { .. })
  }

  pub fn message(&self) -> &str {
    match self {
      ActionOutcome::Success { message, .. } | ActionOutcome::Failure { message, .. } => message,
    }
  }

  pub fn payload(&self) -> Option<&T> {
    match self {
      ActionOutcome::Success { payload, .. } => payload.as_ref(),
      ActionOutcome::Failure { .. } => None,
    }
  }

  pub fn error(&self) -> Option<&E> {
    match self {
      ActionOutcome::Failure { error, .. } => Some(error),
      ActionOutcome::Success { .. } => None,
    }
  }

  pub fn into_result(self) -> Result<Option<T>, E> {
    match self {
      ActionOutcome::Success { payload, .. } => Ok(payload),
      ActionOutcome::Failure { error, .. } => Err(error),
    }
  }
}

impl<T, E: ErrorCode> ActionOutcome<T, E> {
  /// The failure code, `None` on success.
  pub fn code(&self) -> Option<&str> {
    self.error().map(ErrorCode::code)
  }
}

/// A failure whose code is only known at run time, carrying an opaque JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicError {
  pub code: String,
  pub payload: Value,
}

impl DynamicError {
  pub fn new(code: impl Into<String>, payload: impl Into<Value>) -> Self {
    Self {
      code: code.into(),
      payload: payload.into(),
    }
  }
}

impl ErrorCode for DynamicError {
  fn code(&self) -> &str {
    &self.code
  }
}

impl std::fmt::Display for DynamicError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}: {}", self.code, self.payload)
  }
}
