// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tracing::Level;
use vigil::{Context, ErrorCode, FnValidator, Request, SchemaError, SchemaIssue, ValidationOutcome, SCHEMA_ERROR_CODE};

// --- Common Params ---
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NumParams {
  pub num: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NameParams {
  pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostPayload {
  pub post: String,
}

// --- Common Error Type for Tests ---
// One variant per error code; the variant's fields are that code's payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TestError {
  FirstInvalid { data: String },
  SecondInvalid { data: String },
  Unauthorized { reason: String },
  Schema(Vec<SchemaIssue>),
  Handler(String),
}

impl ErrorCode for TestError {
  fn code(&self) -> &str {
    match self {
      TestError::FirstInvalid { .. } => "firstInvalid",
      TestError::SecondInvalid { .. } => "secondInvalid",
      TestError::Unauthorized { .. } => "unauthorized",
      TestError::Schema(_) => SCHEMA_ERROR_CODE,
      TestError::Handler(_) => "handlerFailed",
    }
  }
}

impl From<SchemaError> for TestError {
  fn from(err: SchemaError) -> Self {
    TestError::Schema(err.issues)
  }
}

// --- Call log shared between steps of one test ---
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
  pub fn record(&self, entry: impl Into<String>) {
    self.0.lock().unwrap().push(entry.into());
  }

  pub fn entries(&self) -> Vec<String> {
    self.0.lock().unwrap().clone()
  }
}

// --- Common Validator Creators ---

/// Passes and contributes `key = value`, recording its name in `log`.
pub fn contributing_validator<P>(log: CallLog, name: &'static str, key: &'static str, value: Value) -> FnValidator<P, TestError>
where
  P: Send + Sync + 'static,
{
  FnValidator::new(name, move |_req: Request<P>| {
    let log = log.clone();
    let value = value.clone();
    async move {
      log.record(name);
      tracing::debug!(target: "test_validators", step = name, "contributing {}", key);
      ValidationOutcome::pass_with(Context::new().with(key, value))
    }
  })
}

/// Fails with `error`, recording its name in `log`.
pub fn failing_validator<P>(log: CallLog, name: &'static str, error: TestError) -> FnValidator<P, TestError>
where
  P: Send + Sync + 'static,
{
  FnValidator::new(name, move |_req: Request<P>| {
    let log = log.clone();
    let error = error.clone();
    async move {
      log.record(name);
      tracing::warn!(target: "test_validators", step = name, "failing with {:?}", error);
      ValidationOutcome::fail(error)
    }
  })
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// Collects formatted log lines written by a scoped subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
  /// Installs a WARN-level subscriber for the current thread only.
  pub fn install(&self) -> tracing::subscriber::DefaultGuard {
    let sink = self.clone();
    let subscriber = tracing_subscriber::fmt()
      .with_max_level(Level::WARN)
      .with_ansi(false)
      .with_writer(move || sink.clone())
      .finish();
    tracing::subscriber::set_default(subscriber)
  }

  pub fn contents(&self) -> String {
    String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
  }
}

impl std::io::Write for CapturedLogs {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.0.lock().unwrap().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}
