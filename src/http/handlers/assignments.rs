//! Assignment endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::HandlerResult;
use crate::http::auth::{Caller, Role};
use crate::http::dto::{
    AssignmentDto, CreateAssignmentInput, ListResponse, UpdateAssignmentInput,
};
use crate::http::error::{ApiResponse, AppError};
use crate::http::state::AppState;
use crate::models::{AssignmentId, CourseId};
use crate::services::assessment;

const ANY_ROLE: &[Role] = &[Role::Learner, Role::Instructor, Role::Admin];
const AUTHORS: &[Role] = &[Role::Instructor, Role::Admin];

/// GET /api/v1/courses/{id}/assignments
pub async fn list_assignments(
    State(state): State<AppState>,
    caller: Caller,
    Path(course_id): Path<i64>,
) -> HandlerResult<ListResponse<AssignmentDto>> {
    caller.require(ANY_ROLE)?;

    let assignments =
        assessment::list_assignments(state.repository.as_ref(), CourseId::new(course_id))
            .await?;
    let items: Vec<AssignmentDto> = assignments.into_iter().map(Into::into).collect();
    Ok(ApiResponse::ok(ListResponse::new(items)))
}

/// POST /api/v1/courses/{id}/assignments
pub async fn create_assignment(
    State(state): State<AppState>,
    caller: Caller,
    Path(course_id): Path<i64>,
    Json(input): Json<CreateAssignmentInput>,
) -> Result<(StatusCode, Json<ApiResponse<AssignmentDto>>), AppError> {
    caller.require(AUTHORS)?;

    let assignment = assessment::create_assignment(
        state.repository.as_ref(),
        CourseId::new(course_id),
        input,
        &caller.actor,
    )
    .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(assignment.into())))
}

/// GET /api/v1/assignments/{id}
pub async fn get_assignment(
    State(state): State<AppState>,
    caller: Caller,
    Path(assignment_id): Path<i64>,
) -> HandlerResult<AssignmentDto> {
    caller.require(ANY_ROLE)?;

    let assignment =
        assessment::get_assignment(state.repository.as_ref(), AssignmentId::new(assignment_id))
            .await?;
    Ok(ApiResponse::ok(assignment.into()))
}

/// PATCH /api/v1/assignments/{id}
pub async fn update_assignment(
    State(state): State<AppState>,
    caller: Caller,
    Path(assignment_id): Path<i64>,
    Json(input): Json<UpdateAssignmentInput>,
) -> HandlerResult<AssignmentDto> {
    caller.require(AUTHORS)?;

    let assignment = assessment::update_assignment(
        state.repository.as_ref(),
        AssignmentId::new(assignment_id),
        input,
        &caller.actor,
    )
    .await?;
    Ok(ApiResponse::ok(assignment.into()))
}

/// DELETE /api/v1/assignments/{id}
pub async fn delete_assignment(
    State(state): State<AppState>,
    caller: Caller,
    Path(assignment_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    caller.require(AUTHORS)?;

    assessment::delete_assignment(state.repository.as_ref(), AssignmentId::new(assignment_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
