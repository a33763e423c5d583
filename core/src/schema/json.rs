// vigil/src/schema/json.rs

use crate::error::{VigilError, VigilResult};
use crate::schema::{Schema, SchemaIssue};
use jsonschema::error::ValidationErrorKind;
use jsonschema::JSONSchema;
use serde_json::Value;
use tracing::{event, Level};

/// A compiled JSON Schema document.
pub struct JsonSchema {
  raw: Value,
  compiled: JSONSchema,
}

impl JsonSchema {
  /// Compiles `raw`, failing with `VigilError::SchemaCompile` if it is not a valid schema.
  pub fn compile(raw: Value) -> VigilResult<Self> {
    let compiled = JSONSchema::compile(&raw).map_err(|err| {
      event!(Level::ERROR, error = %err, "JSON schema failed to compile.");
      VigilError::SchemaCompile {
        message: err.to_string(),
      }
    })?;
    Ok(Self { raw, compiled })
  }

  pub fn raw(&self) -> &Value {
    &self.raw
  }
}

impl Schema for JsonSchema {
  fn check(&self, value: &Value) -> Result<(), Vec<SchemaIssue>> {
    match self.compiled.validate(value) {
      Ok(()) => Ok(()),
      Err(errors) => Err(
        errors
          .map(|err| {
            let mut path = pointer_segments(&err.instance_path.to_string());
            // `required` is reported on the parent object; point at the missing field.
            if let ValidationErrorKind::Required { property } = &err.kind {
              path.push(property_segment(property));
            }
            SchemaIssue::new(path, err.to_string())
          })
          .collect(),
      ),
    }
  }

  fn to_json(&self) -> Value {
    self.raw.clone()
  }
}

impl std::fmt::Debug for JsonSchema {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("JsonSchema").field("raw", &self.raw).finish()
  }
}

/// Splits a JSON pointer ("/items/0/name") into unescaped segments.
fn pointer_segments(pointer: &str) -> Vec<String> {
  pointer
    .split('/')
    .skip(1)
    .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
    .collect()
}

fn property_segment(property: &Value) -> String {
  match property {
    Value::String(name) => name.clone(),
    other => other.to_string(),
  }
}
