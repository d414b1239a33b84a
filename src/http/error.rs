//! HTTP error handling and the uniform response envelope.
//!
//! Every handler returns either `ApiResponse<T>` (success) or an
//! [`AppError`] that renders as the error envelope with the matching HTTP
//! status: 404 for missing entities, 400 for validation, duplicate, and
//! illegal-state failures, 403 for role violations, 500 for everything
//! else.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::services::ServiceError;

/// Success envelope wrapping every 2xx JSON body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// API error payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Error envelope: the failing counterpart of [`ApiResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiError,
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Caller's role does not allow the operation
    Forbidden(String),
    /// Internal server error
    Internal(String),
    /// Business-rule failure from the service layer
    Service(ServiceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, ApiError::new("FORBIDDEN", msg)),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Service(err) => service_error_response(err),
        };

        (
            status,
            Json(ApiErrorResponse {
                success: false,
                error,
            }),
        )
            .into_response()
    }
}

fn service_error_response(err: ServiceError) -> (StatusCode, ApiError) {
    match err {
        ServiceError::Validation(msg) => {
            (StatusCode::BAD_REQUEST, ApiError::new("VALIDATION", msg))
        }
        ServiceError::IllegalState(msg) => {
            (StatusCode::BAD_REQUEST, ApiError::new("ILLEGAL_STATE", msg))
        }
        ServiceError::Repository(err) => repository_error_response(err),
    }
}

fn repository_error_response(err: RepositoryError) -> (StatusCode, ApiError) {
    match &err {
        RepositoryError::NotFound { message, .. } => (
            StatusCode::NOT_FOUND,
            ApiError::new("NOT_FOUND", message.clone()),
        ),
        RepositoryError::DuplicateError { message, .. } => (
            StatusCode::BAD_REQUEST,
            ApiError::new("DUPLICATE", message.clone()),
        ),
        RepositoryError::ValidationError { message, .. } => (
            StatusCode::BAD_REQUEST,
            ApiError::new("VALIDATION", message.clone()),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("REPOSITORY_ERROR", err.to_string()),
        ),
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Service(err)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Service(ServiceError::Repository(err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found: AppError =
            ServiceError::Repository(RepositoryError::not_found("Course 7 not found")).into();
        let response = not_found.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let duplicate: AppError =
            ServiceError::Repository(RepositoryError::duplicate("code taken")).into();
        assert_eq!(
            duplicate.into_response().status(),
            StatusCode::BAD_REQUEST
        );

        let illegal: AppError = ServiceError::illegal_state("already published").into();
        assert_eq!(illegal.into_response().status(), StatusCode::BAD_REQUEST);

        let validation: AppError = ServiceError::validation("bad field").into();
        assert_eq!(
            validation.into_response().status(),
            StatusCode::BAD_REQUEST
        );

        let internal: AppError =
            ServiceError::Repository(RepositoryError::connection("pool gone")).into();
        assert_eq!(
            internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
