// vigil/examples/error_handling.rs

use tracing::{error, info, warn};
use vigil::{ActionOutcome, ErrorCode, Pipeline, Request, ValidationOutcome, VigilError};

#[derive(Debug, Clone)]
struct TransferParams {
  amount: u64,
}

#[derive(Debug, Clone, thiserror::Error)]
enum TransferError {
  #[error("amount must be positive")]
  ZeroAmount,
  #[error("amount {requested} exceeds limit {limit}")]
  OverLimit { requested: u64, limit: u64 },
}

impl ErrorCode for TransferError {
  fn code(&self) -> &str {
    match self {
      TransferError::ZeroAmount => "zeroAmount",
      TransferError::OverLimit { .. } => "overLimit",
    }
  }

  fn message(&self) -> std::borrow::Cow<'_, str> {
    std::borrow::Cow::Owned(self.to_string())
  }
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  // A pipeline composed step by step, without the fluent builder.
  let mut pipeline = Pipeline::<TransferParams, u64, TransferError>::new("transfer");
  pipeline.push_validator_fn(|req: Request<TransferParams>| async move {
    if req.params.amount == 0 {
      ValidationOutcome::fail(TransferError::ZeroAmount)
    } else {
      ValidationOutcome::pass()
    }
  });
  pipeline.push_validator_fn(|req: Request<TransferParams>| async move {
    let limit = 1_000;
    if req.params.amount > limit {
      ValidationOutcome::fail(TransferError::OverLimit {
        requested: req.params.amount,
        limit,
      })
    } else {
      ValidationOutcome::pass()
    }
  });

  // 1. Programmer error: no terminal handler yet. This is an Err, not a Failure outcome.
  match pipeline.run(TransferParams { amount: 10 }).await {
    Err(VigilError::HandlerMissing { action }) => warn!("Forgot the handler for '{}'.", action),
    Err(other) => error!("Unexpected framework error: {}", other),
    Ok(outcome) => info!("Unexpected outcome: {:?}", outcome.message()),
  }

  pipeline.set_handler(|req: Request<TransferParams>| async move {
    ActionOutcome::success_with("Transferred", req.params.amount)
  });

  // 2. Domain failures come back as structured outcomes.
  for amount in [0, 5_000, 250] {
    match pipeline.run(TransferParams { amount }).await {
      Ok(ActionOutcome::Success { payload, .. }) => info!("Transferred {:?}", payload),
      Ok(ActionOutcome::Failure { message, error }) => info!("Rejected [{}]: {}", error.code(), message),
      Err(e) => error!("Framework error: {}", e),
    }
  }
}
