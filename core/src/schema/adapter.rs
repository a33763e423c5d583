// vigil/src/schema/adapter.rs

//! The schema validator adapter: runs a `Schema` against request parameters and
//! reports the result as a `ValidationOutcome`.

use crate::core::context::Request;
use crate::core::outcome::ValidationOutcome;
use crate::core::step::Validator;
use crate::schema::{Schema, SchemaError, SchemaIssue};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{event, Level};

/// Checks `value` against `schema`.
///
/// Passes without contributing context (the value already lives in the request's params),
/// or fails with a `SchemaError` carrying the engine's issues.
pub fn validate_schema<E>(schema: &dyn Schema, value: &Value) -> ValidationOutcome<E>
where
  E: From<SchemaError>,
{
  match schema.check(value) {
    Ok(()) => ValidationOutcome::pass(),
    Err(issues) => {
      event!(Level::DEBUG, issue_count = issues.len(), "Value failed schema validation.");
      ValidationOutcome::fail(SchemaError { issues })
    }
  }
}

/// Serializes `params` to JSON and checks it against `schema`.
///
/// Parameters that cannot be represented as JSON fail with a single root-level issue.
pub fn validate_params<P, E>(schema: &dyn Schema, params: &P) -> ValidationOutcome<E>
where
  P: Serialize + ?Sized,
  E: From<SchemaError>,
{
  match serde_json::to_value(params) {
    Ok(value) => validate_schema(schema, &value),
    Err(err) => {
      event!(Level::WARN, error = %err, "Parameters could not be serialized for schema validation.");
      ValidationOutcome::fail(SchemaError {
        issues: vec![SchemaIssue::root(format!("parameters could not be serialized: {}", err))],
      })
    }
  }
}

/// A stateless validator step that checks request parameters against a schema.
///
/// Built with `new` it always uses its own schema; built with `declared` it uses the
/// input schema declared on whichever pipeline runs it.
#[derive(Clone)]
pub struct SchemaValidator {
  schema: Option<Arc<dyn Schema>>,
}

impl SchemaValidator {
  pub fn new(schema: impl Schema + 'static) -> Self {
    Self {
      schema: Some(Arc::new(schema)),
    }
  }

  pub fn from_shared(schema: Arc<dyn Schema>) -> Self {
    Self { schema: Some(schema) }
  }

  pub fn declared() -> Self {
    Self { schema: None }
  }
}

#[async_trait]
impl<P, E> Validator<P, E> for SchemaValidator
where
  P: Serialize + Send + Sync + 'static,
  E: From<SchemaError> + Send + 'static,
{
  fn name(&self) -> &str {
    "schema"
  }

  async fn validate(&self, request: Request<P>) -> ValidationOutcome<E> {
    let schema = match self.schema.as_ref().or(request.input_schema()) {
      Some(schema) => Arc::clone(schema),
      None => {
        event!(
          Level::WARN,
          "Schema validator has no schema of its own and the pipeline declares none; passing."
        );
        return ValidationOutcome::pass();
      }
    };
    validate_params(schema.as_ref(), request.params())
  }
}

impl std::fmt::Debug for SchemaValidator {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SchemaValidator")
      .field("own_schema", &self.schema.is_some())
      .finish()
  }
}
