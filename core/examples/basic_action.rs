// vigil/examples/basic_action.rs

use vigil::{ActionBuilder, ActionOutcome, Context, ErrorCode, Request, ValidationOutcome, VigilError};
use tracing::info;

// 1. Define the params the action is called with
#[derive(Clone, Debug)]
struct CreatePostParams {
  session_token: Option<String>,
  title: String,
}

#[derive(Debug)]
struct Post {
  author: String,
  title: String,
}

// 2. Define the failure codes. Each variant's fields are that code's payload.
#[derive(Debug)]
enum PostError {
  NotSignedIn,
  Forbidden { user: String },
}

impl ErrorCode for PostError {
  fn code(&self) -> &str {
    match self {
      PostError::NotSignedIn => "notSignedIn",
      PostError::Forbidden { .. } => "forbidden",
    }
  }
}

#[tokio::main]
async fn main() -> Result<(), VigilError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

  info!("--- Basic Action Example ---");

  // 3. Compose validators in order, then finalize with the terminal handler
  let create_post = ActionBuilder::<CreatePostParams, Post, PostError>::new()
    .named("create_post")
    .validate_named("session", |req: Request<CreatePostParams>| async move {
      // Pretend lookup of the session's user.
      match req.params.session_token.as_deref() {
        Some(token) => ValidationOutcome::pass_with(Context::new().with("user", token.trim_start_matches("token-"))),
        None => ValidationOutcome::fail(PostError::NotSignedIn),
      }
    })
    .validate_named("role", |req: Request<CreatePostParams>| async move {
      let user = req.context.get_as::<String>("user").ok().flatten().unwrap_or_default();
      if user == "admin" {
        ValidationOutcome::pass_with(Context::new().with("role", "admin"))
      } else {
        ValidationOutcome::fail(PostError::Forbidden { user })
      }
    })
    .action(|req: Request<CreatePostParams>| async move {
      let author = req.context.get_as::<String>("user").ok().flatten().unwrap_or_default();
      ActionOutcome::success_with(
        "Post created",
        Post {
          author,
          title: req.params.title.clone(),
        },
      )
    });

  // 4. Invoke it and branch on the outcome
  for token in [Some("token-admin"), Some("token-guest"), None] {
    let params = CreatePostParams {
      session_token: token.map(str::to_string),
      title: "Hello".to_string(),
    };
    match create_post.run(params).await? {
      ActionOutcome::Success { message, payload } => info!("{}: {:?}", message, payload),
      ActionOutcome::Failure { error: PostError::NotSignedIn, .. } => info!("Please sign in first."),
      ActionOutcome::Failure {
        error: PostError::Forbidden { user },
        message,
      } => info!("{} ({} may not post)", message, user),
    }
  }

  Ok(())
}
