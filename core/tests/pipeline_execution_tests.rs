// tests/pipeline_execution_tests.rs
mod common; // Reference the common module

use common::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use vigil::{ActionBuilder, ActionOutcome, Request, ValidationOutcome};

fn numeric_action() -> vigil::Action<NumParams, PostPayload, TestError> {
  ActionBuilder::<NumParams, PostPayload, TestError>::new()
    .named("numeric")
    .validate(|req: Request<NumParams>| async move {
      if req.params.num == 1 {
        return ValidationOutcome::fail(TestError::FirstInvalid {
          data: "Data 1".to_string(),
        });
      }
      ValidationOutcome::pass()
    })
    .validate(|req: Request<NumParams>| async move {
      if req.params.num == 2 {
        return ValidationOutcome::fail(TestError::SecondInvalid {
          data: "Data 2".to_string(),
        });
      }
      ValidationOutcome::pass()
    })
    .action(|_req: Request<NumParams>| async move {
      ActionOutcome::success_with(
        "Post created",
        PostPayload {
          post: "Post".to_string(),
        },
      )
    })
}

#[tokio::test]
async fn test_two_numeric_validators_end_to_end() {
  setup_tracing();
  let action = numeric_action();

  let ok = action.run(NumParams { num: 3 }).await.unwrap();
  assert!(ok.is_success());
  assert_eq!(
    ok.payload(),
    Some(&PostPayload {
      post: "Post".to_string()
    })
  );

  let first = action.run(NumParams { num: 1 }).await.unwrap();
  assert_eq!(first.code(), Some("firstInvalid"));
  assert_eq!(
    first.error(),
    Some(&TestError::FirstInvalid {
      data: "Data 1".to_string()
    })
  );

  let second = action.run(NumParams { num: 2 }).await.unwrap();
  assert_eq!(second.code(), Some("secondInvalid"));
  assert_eq!(
    second.error(),
    Some(&TestError::SecondInvalid {
      data: "Data 2".to_string()
    })
  );
}

#[tokio::test]
async fn test_zero_validators_returns_handler_outcome_unmodified() {
  setup_tracing();
  let builder = ActionBuilder::<NumParams, PostPayload, TestError>::new();

  let succeeding = builder.action(|_req| async move { ActionOutcome::success("plain success") });
  let outcome = succeeding.run(NumParams::default()).await.unwrap();
  assert_eq!(
    outcome,
    ActionOutcome::Success {
      message: "plain success".to_string(),
      payload: None
    }
  );

  let failing = builder.action(|_req| async move {
    ActionOutcome::failure("handler refused", TestError::Handler("no quota".to_string()))
  });
  let outcome = failing.run(NumParams::default()).await.unwrap();
  assert_eq!(
    outcome,
    ActionOutcome::Failure {
      message: "handler refused".to_string(),
      error: TestError::Handler("no quota".to_string())
    }
  );
}

#[tokio::test]
async fn test_validators_run_in_append_order() {
  setup_tracing();
  let log = CallLog::default();
  let handler_log = log.clone();

  let action = ActionBuilder::<NumParams, PostPayload, TestError>::new()
    .validate_with(contributing_validator(log.clone(), "v1", "a", json!(1)))
    .validate_with(contributing_validator(log.clone(), "v2", "b", json!(2)))
    .validate_with(contributing_validator(log.clone(), "v3", "c", json!(3)))
    .action(move |_req| {
      let handler_log = handler_log.clone();
      async move {
        handler_log.record("handler");
        ActionOutcome::success("done")
      }
    });

  let outcome = action.run(NumParams::default()).await.unwrap();
  assert!(outcome.is_success());
  assert_eq!(log.entries(), vec!["v1", "v2", "v3", "handler"]);
}

#[tokio::test]
async fn test_first_failure_short_circuits_remaining_steps() {
  setup_tracing();
  let log = CallLog::default();
  let handler_calls = Arc::new(AtomicUsize::new(0));
  let handler_calls_clone = handler_calls.clone();

  let action = ActionBuilder::<NumParams, PostPayload, TestError>::new()
    .validate_with(contributing_validator(log.clone(), "v1", "a", json!(1)))
    .validate_with(failing_validator(
      log.clone(),
      "v2",
      TestError::Unauthorized {
        reason: "no session".to_string(),
      },
    ))
    .validate_with(failing_validator(
      log.clone(),
      "v3",
      TestError::FirstInvalid {
        data: "never reported".to_string(),
      },
    ))
    .validate_with(contributing_validator(log.clone(), "v4", "d", json!(4)))
    .action(move |_req| {
      let handler_calls = handler_calls_clone.clone();
      async move {
        handler_calls.fetch_add(1, Ordering::SeqCst);
        ActionOutcome::success("unreachable")
      }
    });

  let outcome = action.run(NumParams::default()).await.unwrap();

  assert_eq!(log.entries(), vec!["v1", "v2"]);
  assert_eq!(handler_calls.load(Ordering::SeqCst), 0);
  match outcome {
    ActionOutcome::Failure { message, error } => {
      assert_eq!(
        error,
        TestError::Unauthorized {
          reason: "no session".to_string()
        }
      );
      assert!(message.contains("unauthorized"));
    }
    other => panic!("Expected a failure outcome, got {:?}", other),
  }
}

#[tokio::test]
async fn test_builder_stays_usable_after_finalizing() {
  setup_tracing();
  let base = ActionBuilder::<NumParams, PostPayload, TestError>::new().validate(|req: Request<NumParams>| async move {
    if req.params.num < 0 {
      return ValidationOutcome::fail(TestError::FirstInvalid {
        data: "negative".to_string(),
      });
    }
    ValidationOutcome::pass()
  });

  let lenient = base.action(|_req| async move { ActionOutcome::success("lenient") });
  let strict = base
    .clone()
    .validate(|req: Request<NumParams>| async move {
      if req.params.num > 10 {
        return ValidationOutcome::fail(TestError::SecondInvalid {
          data: "too big".to_string(),
        });
      }
      ValidationOutcome::pass()
    })
    .action(|_req| async move { ActionOutcome::success("strict") });

  assert_eq!(lenient.pipeline().validator_count(), 1);
  assert_eq!(strict.pipeline().validator_count(), 2);

  assert!(lenient.run(NumParams { num: 20 }).await.unwrap().is_success());
  assert_eq!(strict.run(NumParams { num: 20 }).await.unwrap().code(), Some("secondInvalid"));
  assert_eq!(lenient.run(NumParams { num: -1 }).await.unwrap().code(), Some("firstInvalid"));
}

#[tokio::test]
async fn test_named_validators_are_reported_in_order() {
  setup_tracing();
  let action = ActionBuilder::<NumParams, PostPayload, TestError>::new()
    .named("named_steps")
    .validate_named("session", |_req| async move { ValidationOutcome::pass() })
    .validate(|_req| async move { ValidationOutcome::pass() })
    .action(|_req| async move { ActionOutcome::success("ok") });

  assert_eq!(action.name(), "named_steps");
  assert_eq!(action.pipeline().validator_names(), vec!["session", "validator_1"]);
}
