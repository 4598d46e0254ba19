use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use minutes::errors::StoreError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
pub enum AppError {
    /// Errors from the document store.
    Store(StoreError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Store(err) => {
                error!("StoreError: {:?}", err);
                match err {
                    StoreError::NotFound(id) => {
                        (StatusCode::NOT_FOUND, format!("Document not found: {id}"))
                    }
                    StoreError::Request(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Request to the document store failed: {e}"),
                    ),
                    StoreError::Api { status, body } => (
                        StatusCode::BAD_GATEWAY,
                        format!("Document store returned status {status}: {body}"),
                    ),
                    StoreError::Payload(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Unexpected document store payload: {e}"),
                    ),
                }
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
