// vigil/src/pipeline/execution.rs

//! Contains the `Pipeline::run()` method, responsible for executing the validators
//! in order and then the terminal handler.

use crate::core::context::{Context, Request, INPUT_SCHEMA_KEY};
use crate::core::outcome::{ActionOutcome, ErrorCode, ValidationOutcome};
use crate::error::VigilError;
use crate::pipeline::definition::Pipeline;
use std::sync::Arc;
use tracing::{event, info_span, instrument, Instrument, Level};

impl<P, T, E> Pipeline<P, T, E>
where
  P: Send + Sync + 'static,
  T: Send + 'static,
  E: ErrorCode + Send + 'static,
{
  /// Runs the pipeline once for `params`.
  ///
  /// Returns `Err(VigilError::HandlerMissing)` if no terminal handler was set; this is
  /// a misuse of the pipeline, not a rejected request. Otherwise always returns
  /// `Ok`: the first failing validator's error as `ActionOutcome::Failure`, or the
  /// terminal handler's outcome unmodified.
  ///
  /// Each call builds its own `Context`, so concurrent calls never observe each other's
  /// contributed entries.
  #[instrument(
        name = "Pipeline::run",
        skip_all,
        fields(
            action = %self.name,
            num_validators = self.validators.len(),
        ),
        err(Display)
    )]
  pub async fn run(&self, params: P) -> Result<ActionOutcome<T, E>, VigilError> {
    let handler = match &self.handler {
      Some(handler) => Arc::clone(handler),
      None => {
        event!(Level::ERROR, "Pipeline invoked without a terminal handler.");
        return Err(VigilError::HandlerMissing {
          action: self.name.clone(),
        });
      }
    };

    event!(Level::DEBUG, "Pipeline execution starting.");
    let params = Arc::new(params);
    let mut context = Context::new();
    if let Some(schema) = &self.input_schema {
      context.insert(INPUT_SCHEMA_KEY, schema.to_json());
    }

    for (step_idx, validator) in self.validators.iter().enumerate() {
      let step_name = validator.name();
      let request = Request {
        params: Arc::clone(&params),
        context: context.clone(),
        input_schema: self.input_schema.clone(),
      };

      let step_span = info_span!("validator_step", step_name = step_name, step_index = step_idx);
      match validator.validate(request).instrument(step_span).await {
        ValidationOutcome::Pass { context: Some(fragment) } => {
          let collisions = context.merge(fragment, self.merge_policy);
          if !collisions.is_empty() {
            event!(
              Level::WARN,
              step_name,
              keys = ?collisions,
              policy = ?self.merge_policy,
              "Validator contributed context keys that were already present."
            );
          }
          event!(Level::DEBUG, step_name, context_len = context.len(), "Validator passed.");
        }
        ValidationOutcome::Pass { context: None } => {
          event!(Level::DEBUG, step_name, "Validator passed.");
        }
        ValidationOutcome::Fail { error } => {
          event!(
            Level::INFO,
            step_name,
            step_index = step_idx,
            error_code = error.code(),
            "Validator rejected the request; skipping remaining steps."
          );
          let message = error.message().into_owned();
          return Ok(ActionOutcome::Failure { message, error });
        }
      }
    }

    event!(Level::DEBUG, context_len = context.len(), "All validators passed; running terminal handler.");
    let request = Request {
      params,
      context,
      input_schema: self.input_schema.clone(),
    };
    let outcome = handler(request)
      .instrument(info_span!("terminal_handler"))
      .await;

    match &outcome {
      ActionOutcome::Success { .. } => event!(Level::DEBUG, "Terminal handler succeeded."),
      ActionOutcome::Failure { error, .. } => {
        event!(Level::INFO, error_code = error.code(), "Terminal handler reported a failure.")
      }
    }
    Ok(outcome)
  }
}
