//! HTTP handlers for the server.

pub mod export;
pub mod projects;

use axum::{Json, http::StatusCode};
use serde::Serialize;
use tracing::error;

use crate::error::KnitError;

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

/// Map a library error to its HTTP status and body.
pub fn api_error(err: KnitError) -> ApiError {
    let status = match &err {
        KnitError::NotFound(_) => StatusCode::NOT_FOUND,
        KnitError::EmptyGrid | KnitError::TooLarge(_) => StatusCode::UNPROCESSABLE_ENTITY,
        KnitError::Serialization(_)
        | KnitError::Io(_)
        | KnitError::Image(_)
        | KnitError::Pdf(_)
        | KnitError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(error = %err, "request failed");
    }
    let message = match err {
        KnitError::NotFound(_) => "Not found".to_string(),
        other => other.to_string(),
    };
    (status, Json(ErrorBody { error: message }))
}

/// Run filesystem or CPU-heavy work off the async executor.
pub async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, KnitError> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result.map_err(api_error),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: format!("Task error: {}", e),
            }),
        )),
    }
}
