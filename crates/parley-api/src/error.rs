use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use parley_engine::TurnError;
use parley_store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Turn processing error: {0}")]
    Turn(TurnError),
}

impl From<TurnError> for ApiError {
    fn from(error: TurnError) -> Self {
        match error {
            TurnError::EmptyMessage => {
                ApiError::BadRequest("Message text is required".to_string())
            }
            TurnError::ThreadNotFound(id) => ApiError::ThreadNotFound(id),
            TurnError::Store(error) => ApiError::Store(error),
            other => ApiError::Turn(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::ThreadNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Store(ref error) => {
                tracing::error!("Storage error: {}", error);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
            ApiError::Turn(ref error) => {
                tracing::error!("Turn processing error: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Processing error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
