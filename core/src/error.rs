// vigil/src/error.rs
use thiserror::Error;

/// Framework-level errors.
///
/// These never describe a rejected request: a validator or terminal handler that
/// refuses a request reports it as an `ActionOutcome::Failure`. A `VigilError`
/// means the pipeline was misused or misconfigured.
#[derive(Debug, Error)]
pub enum VigilError {
    #[error("No terminal handler set for action '{action}'")]
    HandlerMissing { action: String },

    #[error("Context entry '{key}' could not be decoded. Source: {source}")]
    ContextDecode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Schema failed to compile: {message}")]
    SchemaCompile { message: String },
}

pub type VigilResult<T, E = VigilError> = std::result::Result<T, E>;
