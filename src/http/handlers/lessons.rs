//! Lesson endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::HandlerResult;
use crate::http::auth::{Caller, Role};
use crate::http::dto::{CreateLessonInput, LessonDto, ListResponse, UpdateLessonInput};
use crate::http::error::{ApiResponse, AppError};
use crate::http::state::AppState;
use crate::models::{CourseId, LessonId};
use crate::services::catalog;

const ANY_ROLE: &[Role] = &[Role::Learner, Role::Instructor, Role::Admin];
const AUTHORS: &[Role] = &[Role::Instructor, Role::Admin];

/// GET /api/v1/courses/{id}/lessons
pub async fn list_lessons(
    State(state): State<AppState>,
    caller: Caller,
    Path(course_id): Path<i64>,
) -> HandlerResult<ListResponse<LessonDto>> {
    caller.require(ANY_ROLE)?;

    let lessons =
        catalog::list_lessons(state.repository.as_ref(), CourseId::new(course_id)).await?;
    let items: Vec<LessonDto> = lessons.into_iter().map(Into::into).collect();
    Ok(ApiResponse::ok(ListResponse::new(items)))
}

/// POST /api/v1/courses/{id}/lessons
pub async fn create_lesson(
    State(state): State<AppState>,
    caller: Caller,
    Path(course_id): Path<i64>,
    Json(input): Json<CreateLessonInput>,
) -> Result<(StatusCode, Json<ApiResponse<LessonDto>>), AppError> {
    caller.require(AUTHORS)?;

    let lesson = catalog::create_lesson(
        state.repository.as_ref(),
        CourseId::new(course_id),
        input,
        &caller.actor,
    )
    .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(lesson.into())))
}

/// GET /api/v1/lessons/{id}
pub async fn get_lesson(
    State(state): State<AppState>,
    caller: Caller,
    Path(lesson_id): Path<i64>,
) -> HandlerResult<LessonDto> {
    caller.require(ANY_ROLE)?;

    let lesson =
        catalog::get_lesson(state.repository.as_ref(), LessonId::new(lesson_id)).await?;
    Ok(ApiResponse::ok(lesson.into()))
}

/// PATCH /api/v1/lessons/{id}
pub async fn update_lesson(
    State(state): State<AppState>,
    caller: Caller,
    Path(lesson_id): Path<i64>,
    Json(input): Json<UpdateLessonInput>,
) -> HandlerResult<LessonDto> {
    caller.require(AUTHORS)?;

    let lesson = catalog::update_lesson(
        state.repository.as_ref(),
        LessonId::new(lesson_id),
        input,
        &caller.actor,
    )
    .await?;
    Ok(ApiResponse::ok(lesson.into()))
}

/// DELETE /api/v1/lessons/{id}
pub async fn delete_lesson(
    State(state): State<AppState>,
    caller: Caller,
    Path(lesson_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    caller.require(AUTHORS)?;

    catalog::delete_lesson(state.repository.as_ref(), LessonId::new(lesson_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
