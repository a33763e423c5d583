// vigil/src/core/step.rs

//! Defines the `Validator` trait for pipeline pre-checks and the closure-backed
//! `FnValidator`.

use crate::core::context::Request;
use crate::core::outcome::ValidationOutcome;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;

/// A validator step: a pre-check that either passes (optionally contributing a context
/// fragment) or fails with a value of the pipeline's error type `E`.
///
/// Validators are shared, read-only, across every invocation of the pipeline that owns
/// them, and may be invoked concurrently from several invocations. Any per-request state
/// belongs in the returned fragment, never in `self`.
#[async_trait]
pub trait Validator<P, E>: Send + Sync {
  /// Name used in tracing spans and failure logs.
  fn name(&self) -> &str;

  async fn validate(&self, request: Request<P>) -> ValidationOutcome<E>;
}

pub(crate) type ValidatorFn<P, E> =
  Box<dyn Fn(Request<P>) -> Pin<Box<dyn Future<Output = ValidationOutcome<E>> + Send>> + Send + Sync>;

/// A `Validator` backed by an async closure.
pub struct FnValidator<P, E> {
  name: String,
  func: ValidatorFn<P, E>,
}

impl<P, E> FnValidator<P, E>
where
  P: Send + Sync + 'static,
  E: Send + 'static,
{
  pub fn new<F, Fut>(name: impl Into<String>, validator_fn: F) -> Self
  where
    F: Fn(Request<P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ValidationOutcome<E>> + Send + 'static,
  {
    Self {
      name: name.into(),
      func: Box::new(
        move |request: Request<P>| -> Pin<Box<dyn Future<Output = ValidationOutcome<E>> + Send>> {
          Box::pin(validator_fn(request))
        },
      ),
    }
  }
}

#[async_trait]
impl<P, E> Validator<P, E> for FnValidator<P, E>
where
  P: Send + Sync + 'static,
  E: Send + 'static,
{
  fn name(&self) -> &str {
    &self.name
  }

  async fn validate(&self, request: Request<P>) -> ValidationOutcome<E> {
    (self.func)(request).await
  }
}

impl<P, E> std::fmt::Debug for FnValidator<P, E> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FnValidator").field("name", &self.name).finish()
  }
}
