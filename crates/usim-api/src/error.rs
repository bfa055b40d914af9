//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use usim_core::UsimError;
use utoipa::ToSchema;

/// JSON error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable description of the failure
    pub detail: String,
}

/// Application error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<UsimError> for ApiError {
    fn from(err: UsimError) -> Self {
        match err {
            UsimError::NotFound(what) => ApiError::NotFound(format!("{what} not found")),
            UsimError::EmbeddingUnavailable(msg) => ApiError::Internal(msg),
            UsimError::Store(msg) => ApiError::Internal(msg),
            UsimError::Config(msg) => ApiError::Internal(msg),
            UsimError::Other(err) => ApiError::Internal(err.to_string()),
        }
    }
}
