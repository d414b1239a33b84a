//! Rubric endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::HandlerResult;
use crate::http::auth::{Caller, Role};
use crate::http::dto::{CreateRubricInput, RubricDto, UpdateRubricInput};
use crate::http::error::{ApiResponse, AppError};
use crate::http::state::AppState;
use crate::models::RubricId;
use crate::services::assessment;

const ANY_ROLE: &[Role] = &[Role::Learner, Role::Instructor, Role::Admin];
const AUTHORS: &[Role] = &[Role::Instructor, Role::Admin];

/// POST /api/v1/rubrics
pub async fn create_rubric(
    State(state): State<AppState>,
    caller: Caller,
    Json(input): Json<CreateRubricInput>,
) -> Result<(StatusCode, Json<ApiResponse<RubricDto>>), AppError> {
    caller.require(AUTHORS)?;

    let rubric =
        assessment::create_rubric(state.repository.as_ref(), input, &caller.actor).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(rubric.into())))
}

/// GET /api/v1/rubrics/{id}
pub async fn get_rubric(
    State(state): State<AppState>,
    caller: Caller,
    Path(rubric_id): Path<i64>,
) -> HandlerResult<RubricDto> {
    caller.require(ANY_ROLE)?;

    let rubric =
        assessment::get_rubric(state.repository.as_ref(), RubricId::new(rubric_id)).await?;
    Ok(ApiResponse::ok(rubric.into()))
}

/// PATCH /api/v1/rubrics/{id}
pub async fn update_rubric(
    State(state): State<AppState>,
    caller: Caller,
    Path(rubric_id): Path<i64>,
    Json(input): Json<UpdateRubricInput>,
) -> HandlerResult<RubricDto> {
    caller.require(AUTHORS)?;

    let rubric = assessment::update_rubric(
        state.repository.as_ref(),
        RubricId::new(rubric_id),
        input,
        &caller.actor,
    )
    .await?;
    Ok(ApiResponse::ok(rubric.into()))
}

/// DELETE /api/v1/rubrics/{id}
pub async fn delete_rubric(
    State(state): State<AppState>,
    caller: Caller,
    Path(rubric_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    caller.require(AUTHORS)?;

    assessment::delete_rubric(state.repository.as_ref(), RubricId::new(rubric_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
