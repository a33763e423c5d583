// vigil/examples/schema_validation.rs

use serde::Serialize;
use serde_json::json;
use tracing::info;
use vigil::{ActionBuilder, ActionOutcome, DynamicError, JsonSchema, Request, VigilError};

#[derive(Debug, Serialize)]
struct SignupParams {
  name: String,
  email: String,
}

#[tokio::main]
async fn main() -> Result<(), VigilError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Schema Validation Example ---");

  let schema = JsonSchema::compile(json!({
    "type": "object",
    "properties": {
      "name": { "type": "string", "minLength": 2 },
      "email": { "type": "string", "pattern": "^[^@]+@[^@]+$" }
    },
    "required": ["name", "email"]
  }))?;

  // DynamicError carries open-ended codes; the schema adapter reports "schemaError".
  let signup = ActionBuilder::<SignupParams, String, DynamicError>::new()
    .named("signup")
    .input_schema(schema)
    .validate_input()
    .action(|req: Request<SignupParams>| async move {
      ActionOutcome::success_with("Signed up", format!("welcome, {}", req.params.name))
    });

  let attempts = [
    SignupParams {
      name: "Dave".to_string(),
      email: "dave@example.com".to_string(),
    },
    SignupParams {
      name: "D".to_string(),
      email: "not-an-email".to_string(),
    },
  ];

  for params in attempts {
    match signup.run(params).await? {
      ActionOutcome::Success { payload, .. } => info!("Success: {:?}", payload),
      ActionOutcome::Failure { message, error } => {
        info!("{} [{}]", message, error.code);
        info!("Issues: {}", error.payload);
      }
    }
  }

  Ok(())
}
