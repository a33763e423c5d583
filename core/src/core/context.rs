// vigil/src/core/context.rs

//! The per-invocation execution context and the `Request<P>` value handed to
//! every validator step and to the terminal handler.

use crate::error::{VigilError, VigilResult};
use crate::schema::Schema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Reserved context key under which the declared input schema (in its JSON form)
/// is stored at the start of every invocation.
pub const INPUT_SCHEMA_KEY: &str = "inputSchema";

/// What happens when a validator contributes a key that is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
  /// The later fragment's value replaces the earlier one.
  #[default]
  Overwrite,
  /// The earlier value is kept and the fragment's value is dropped.
  KeepExisting,
}

/// An accumulating mapping from string keys to JSON values.
///
/// A fresh `Context` is created for every invocation of a pipeline; it grows as
/// validators pass and is never shared between invocations. There is no way to
/// remove an entry once it has been added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(Map<String, Value>);

impl Context {
  pub fn new() -> Self {
    Self(Map::new())
  }

  /// Builder-style insert, handy for assembling a fragment inside a validator.
  pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.insert(key, value);
    self
  }

  /// Inserts `value` under `key`, returning the previous value if there was one.
  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
    self.0.insert(key.into(), value.into())
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  /// Decodes the entry under `key` into `T`.
  ///
  /// Returns `Ok(None)` when the key is absent.
  pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> VigilResult<Option<T>> {
    match self.0.get(key) {
      None => Ok(None),
      Some(value) => T::deserialize(value)
        .map(Some)
        .map_err(|source| VigilError::ContextDecode {
          key: key.to_string(),
          source,
        }),
    }
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.0.contains_key(key)
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// The JSON form of the declared input schema, if one was configured.
  pub fn input_schema(&self) -> Option<&Value> {
    self.0.get(INPUT_SCHEMA_KEY)
  }

  /// Additively merges `fragment` into this context.
  ///
  /// Keys not yet present are added. Keys already present are resolved by `policy`.
  /// Returns the colliding keys, in fragment order.
  pub fn merge(&mut self, fragment: Context, policy: MergePolicy) -> Vec<String> {
    let mut collisions = Vec::new();
    for (key, value) in fragment.0 {
      if self.0.contains_key(&key) {
        collisions.push(key.clone());
        if policy == MergePolicy::KeepExisting {
          continue;
        }
      }
      self.0.insert(key, value);
    }
    collisions
  }
}

impl From<Map<String, Value>> for Context {
  fn from(map: Map<String, Value>) -> Self {
    Context(map)
  }
}

impl FromIterator<(String, Value)> for Context {
  fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
    Context(iter.into_iter().collect())
  }
}

/// The `{ params, context }` pair every step receives.
///
/// `params` is shared (the same `Arc` is handed to every step of one invocation);
/// `context` is an owned snapshot of everything accumulated so far.
pub struct Request<P> {
  pub params: Arc<P>,
  pub context: Context,
  pub(crate) input_schema: Option<Arc<dyn Schema>>,
}

impl<P> Request<P> {
  pub fn new(params: P, context: Context) -> Self {
    Self {
      params: Arc::new(params),
      context,
      input_schema: None,
    }
  }

  pub fn params(&self) -> &P {
    &self.params
  }

  pub fn context(&self) -> &Context {
    &self.context
  }

  /// The typed input schema declared on the pipeline, for steps that need to
  /// re-validate something against it.
  pub fn input_schema(&self) -> Option<&Arc<dyn Schema>> {
    self.input_schema.as_ref()
  }

  pub fn with_input_schema(mut self, schema: Arc<dyn Schema>) -> Self {
    self.input_schema = Some(schema);
    self
  }
}

impl<P> Clone for Request<P> {
  fn clone(&self) -> Self {
    Self {
      params: Arc::clone(&self.params),
      context: self.context.clone(),
      input_schema: self.input_schema.clone(),
    }
  }
}

impl<P: std::fmt::Debug> std::fmt::Debug for Request<P> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Request")
      .field("params", &self.params)
      .field("context", &self.context)
      .field("input_schema_present", &self.input_schema.is_some())
      .finish()
  }
}
