use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use formdesk_core::{ApiError, StorageError};
use serde_json::json;

/// Error returned by the HTTP handlers.
///
/// Rendered as `{"error": message, "code": CODE}` with a matching status.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The named resource, e.g. `Template 42`, does not exist.
    #[error("{0} not found")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The in-memory upload store is full.
    #[error("Upload store full")]
    StorageFull,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl From<ApiError> for ServerError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound(id) => ServerError::NotFound(format!("Template {id}")),
            ApiError::Validation(msg) => ServerError::BadRequest(msg),
            ApiError::Storage(StorageError::NotFound(id)) => {
                ServerError::NotFound(format!("Template {id}"))
            }
            ApiError::Storage(e) => ServerError::Storage(e),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl ServerError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ServerError::NotFound(what) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", format!("{what} not found"))
            }
            ServerError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            ServerError::StorageFull => (
                StatusCode::INSUFFICIENT_STORAGE,
                "STORAGE_FULL",
                "Upload storage is full".to_string(),
            ),
            ServerError::Storage(StorageError::NotFound(id)) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("Template {id} not found"),
            ),
            ServerError::Storage(e) => {
                tracing::error!(error = %e, "Storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            ServerError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = json!({
            "error": message,
            "code": code,
        });
        (status, Json(body)).into_response()
    }
}
