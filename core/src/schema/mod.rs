// vigil/src/schema/mod.rs

//! Schema validation as a pipeline step.
//!
//! The engine is pluggable through the `Schema` trait; `JsonSchema` is the bundled
//! engine. `validate_schema`/`validate_params` are the one-shot adapter and
//! `SchemaValidator` wraps them as a reusable `Validator`.

pub mod adapter;
pub mod json;

use crate::core::outcome::{DynamicError, ErrorCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

pub use adapter::{validate_params, validate_schema, SchemaValidator};
pub use json::JsonSchema;

/// The fixed error code reported by the schema validator adapter.
pub const SCHEMA_ERROR_CODE: &str = "schemaError";

/// Something that can check a JSON value against a schema.
pub trait Schema: Send + Sync {
  /// Checks `value`, returning the engine's issues in the order it reported them.
  fn check(&self, value: &Value) -> Result<(), Vec<SchemaIssue>>;

  /// The schema itself as JSON, stored in the execution context for introspection.
  fn to_json(&self) -> Value;
}

/// One structured issue produced by a schema engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIssue {
  /// Location of the offending field, outermost segment first. Empty for the root value.
  pub path: Vec<String>,
  pub message: String,
}

impl SchemaIssue {
  pub fn new(path: Vec<String>, message: impl Into<String>) -> Self {
    Self {
      path,
      message: message.into(),
    }
  }

  pub fn root(message: impl Into<String>) -> Self {
    Self::new(Vec::new(), message)
  }
}

impl fmt::Display for SchemaIssue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.path.is_empty() {
      write!(f, "{}", self.message)
    } else {
      write!(f, "{}: {}", self.path.join("."), self.message)
    }
  }
}

/// Payload of the `schemaError` code: the engine's issue list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("Input failed schema validation with {} issue(s)", .issues.len())]
pub struct SchemaError {
  pub issues: Vec<SchemaIssue>,
}

impl ErrorCode for SchemaError {
  fn code(&self) -> &str {
    SCHEMA_ERROR_CODE
  }

  fn message(&self) -> Cow<'_, str> {
    Cow::Owned(self.to_string())
  }
}

impl From<SchemaError> for DynamicError {
  fn from(err: SchemaError) -> Self {
    let issues = err
      .issues
      .into_iter()
      .map(|issue| json!({ "path": issue.path, "message": issue.message }))
      .collect();
    DynamicError::new(SCHEMA_ERROR_CODE, Value::Array(issues))
  }
}
