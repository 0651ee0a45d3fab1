//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_claims::WorkflowError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized".to_string(),
            ),
            ApiError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone())
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

/// Maps workflow outcomes onto status codes. A claim owned by someone else
/// and a missing claim produce the same 404.
impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::ClaimNotFound(_) => ApiError::NotFound("Claim not found".to_string()),
            WorkflowError::DocumentNotFound(_) => {
                ApiError::NotFound("Document not found".to_string())
            }
            WorkflowError::Validation(msg) => ApiError::Validation(msg),
            WorkflowError::ModelResponse(msg) => ApiError::Internal(msg),
            WorkflowError::Port(e) if e.is_not_found() => {
                ApiError::NotFound("Not found".to_string())
            }
            WorkflowError::Port(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{ClaimId, PortError};

    #[test]
    fn test_not_found_is_uniform_for_missing_and_foreign() {
        let missing: ApiError = WorkflowError::ClaimNotFound(ClaimId::new()).into();
        let foreign: ApiError = WorkflowError::ClaimNotFound(ClaimId::new()).into();
        assert_eq!(missing.to_string(), foreign.to_string());
    }

    #[test]
    fn test_port_not_found_maps_to_not_found() {
        let err: ApiError = WorkflowError::Port(PortError::not_found("Object", "k")).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError =
            WorkflowError::Port(PortError::internal("connection dropped")).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
