use crate::db::StorageError;
use crate::schema::{ValidationError, ValidationErrors};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API-layer error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// 422 - Input failed schema validation
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// 500 - Store unavailable or rejected the operation
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// 404 - Unknown resource
    #[error("{0}")]
    NotFound(String),

    /// 400 - Malformed request outside the body (e.g., query string)
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Storage(_) => "storage_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::BadRequest(_) => "bad_request",
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::Storage(e) => tracing::error!(error = %e, "storage failure"),
            other => tracing::debug!(error = %other, status = status.as_u16(), "request rejected"),
        }

        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
            details: match self {
                ApiError::Validation(errors) => Some(errors.errors),
                _ => None,
            },
        };

        (status, Json(body)).into_response()
    }
}
