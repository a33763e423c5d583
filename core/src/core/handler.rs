// vigil/src/core/handler.rs

//! Defines the `TerminalHandler<P, T, E>` type for the step that does the actual work.

use crate::core::context::Request;
use crate::core::outcome::ActionOutcome;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a pipeline's terminal handler.
///
/// The handler receives the invocation's parameters together with the fully accumulated
/// context, and its `ActionOutcome<T, E>` becomes the pipeline's result unmodified.
/// It is only reached once every validator has passed.
///
/// `Arc` rather than `Box` so the handler can be shared by every `Action` finalized
/// from the same builder.
pub type TerminalHandler<P, T, E> =
  Arc<dyn Fn(Request<P>) -> Pin<Box<dyn Future<Output = ActionOutcome<T, E>> + Send>> + Send + Sync>;

pub(crate) fn boxed_handler<P, T, E, F, Fut>(handler_fn: F) -> TerminalHandler<P, T, E>
where
  P: Send + Sync + 'static,
  T: Send + 'static,
  E: Send + 'static,
  F: Fn(Request<P>) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = ActionOutcome<T, E>> + Send + 'static,
{
  Arc::new(
    move |request: Request<P>| -> Pin<Box<dyn Future<Output = ActionOutcome<T, E>> + Send>> {
      Box::pin(handler_fn(request))
    },
  )
}
