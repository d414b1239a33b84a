//! Enrollment endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::HandlerResult;
use crate::http::auth::{Caller, Role};
use crate::http::dto::{
    EnrollInput, EnrollmentDto, EnrollmentListQuery, ListResponse, ProgressInput,
};
use crate::http::error::{ApiResponse, AppError};
use crate::http::state::AppState;
use crate::models::EnrollmentId;
use crate::services::enrollment;

const ANY_ROLE: &[Role] = &[Role::Learner, Role::Instructor, Role::Admin];
const LEARNERS: &[Role] = &[Role::Learner, Role::Admin];

/// GET /api/v1/enrollments
pub async fn list_enrollments(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<EnrollmentListQuery>,
) -> HandlerResult<ListResponse<EnrollmentDto>> {
    caller.require(ANY_ROLE)?;

    let filter = query.into();
    let enrollments =
        enrollment::list_enrollments(state.repository.as_ref(), &filter).await?;
    let items: Vec<EnrollmentDto> = enrollments.into_iter().map(Into::into).collect();
    Ok(ApiResponse::ok(ListResponse::new(items)))
}

/// POST /api/v1/enrollments
pub async fn enroll(
    State(state): State<AppState>,
    caller: Caller,
    Json(input): Json<EnrollInput>,
) -> Result<(StatusCode, Json<ApiResponse<EnrollmentDto>>), AppError> {
    caller.require(LEARNERS)?;

    let enrollment = enrollment::enroll(state.repository.as_ref(), input).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(enrollment.into())))
}

/// GET /api/v1/enrollments/{id}
pub async fn get_enrollment(
    State(state): State<AppState>,
    caller: Caller,
    Path(enrollment_id): Path<i64>,
) -> HandlerResult<EnrollmentDto> {
    caller.require(ANY_ROLE)?;

    let enrollment = enrollment::get_enrollment(
        state.repository.as_ref(),
        EnrollmentId::new(enrollment_id),
    )
    .await?;
    Ok(ApiResponse::ok(enrollment.into()))
}

/// POST /api/v1/enrollments/{id}/progress
pub async fn update_progress(
    State(state): State<AppState>,
    caller: Caller,
    Path(enrollment_id): Path<i64>,
    Json(input): Json<ProgressInput>,
) -> HandlerResult<EnrollmentDto> {
    caller.require(ANY_ROLE)?;

    let enrollment = enrollment::update_progress(
        state.repository.as_ref(),
        EnrollmentId::new(enrollment_id),
        input,
    )
    .await?;
    Ok(ApiResponse::ok(enrollment.into()))
}

/// POST /api/v1/enrollments/{id}/withdraw
pub async fn withdraw(
    State(state): State<AppState>,
    caller: Caller,
    Path(enrollment_id): Path<i64>,
) -> HandlerResult<EnrollmentDto> {
    caller.require(LEARNERS)?;

    let enrollment = enrollment::withdraw(
        state.repository.as_ref(),
        EnrollmentId::new(enrollment_id),
    )
    .await?;
    Ok(ApiResponse::ok(enrollment.into()))
}
