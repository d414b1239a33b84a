//! HTTP handlers for the REST API.
//!
//! Each submodule hosts the endpoints for one aggregate and delegates to
//! the service layer for business logic. Handlers only parse the request,
//! check the caller's role, call a service function, and wrap the result in
//! the response envelope.

pub mod assignments;
pub mod certificates;
pub mod courses;
pub mod enrollments;
pub mod lessons;
pub mod programs;
pub mod quizzes;
pub mod rubrics;

use axum::{extract::State, Json};

use super::dto::HealthResponse;
use super::error::{ApiResponse, AppError};
use super::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// GET /health
///
/// Health check endpoint to verify the service is running and the database
/// is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}
