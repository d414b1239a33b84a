//! Quiz endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::HandlerResult;
use crate::http::auth::{Caller, Role};
use crate::http::dto::{
    CreateQuizInput, ListResponse, QuizDto, StatusChangeRequest, UpdateQuizInput,
};
use crate::http::error::{ApiResponse, AppError};
use crate::http::state::AppState;
use crate::models::{CourseId, QuizId};
use crate::services::assessment;

const ANY_ROLE: &[Role] = &[Role::Learner, Role::Instructor, Role::Admin];
const AUTHORS: &[Role] = &[Role::Instructor, Role::Admin];

/// GET /api/v1/courses/{id}/quizzes
pub async fn list_quizzes(
    State(state): State<AppState>,
    caller: Caller,
    Path(course_id): Path<i64>,
) -> HandlerResult<ListResponse<QuizDto>> {
    caller.require(ANY_ROLE)?;

    let quizzes =
        assessment::list_quizzes(state.repository.as_ref(), CourseId::new(course_id)).await?;
    let items: Vec<QuizDto> = quizzes.into_iter().map(Into::into).collect();
    Ok(ApiResponse::ok(ListResponse::new(items)))
}

/// POST /api/v1/courses/{id}/quizzes
pub async fn create_quiz(
    State(state): State<AppState>,
    caller: Caller,
    Path(course_id): Path<i64>,
    Json(input): Json<CreateQuizInput>,
) -> Result<(StatusCode, Json<ApiResponse<QuizDto>>), AppError> {
    caller.require(AUTHORS)?;

    let quiz = assessment::create_quiz(
        state.repository.as_ref(),
        CourseId::new(course_id),
        input,
        &caller.actor,
    )
    .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(quiz.into())))
}

/// GET /api/v1/quizzes/{id}
pub async fn get_quiz(
    State(state): State<AppState>,
    caller: Caller,
    Path(quiz_id): Path<i64>,
) -> HandlerResult<QuizDto> {
    caller.require(ANY_ROLE)?;

    let quiz = assessment::get_quiz(state.repository.as_ref(), QuizId::new(quiz_id)).await?;
    Ok(ApiResponse::ok(quiz.into()))
}

/// PATCH /api/v1/quizzes/{id}
pub async fn update_quiz(
    State(state): State<AppState>,
    caller: Caller,
    Path(quiz_id): Path<i64>,
    Json(input): Json<UpdateQuizInput>,
) -> HandlerResult<QuizDto> {
    caller.require(AUTHORS)?;

    let quiz = assessment::update_quiz(
        state.repository.as_ref(),
        QuizId::new(quiz_id),
        input,
        &caller.actor,
    )
    .await?;
    Ok(ApiResponse::ok(quiz.into()))
}

/// DELETE /api/v1/quizzes/{id}
pub async fn delete_quiz(
    State(state): State<AppState>,
    caller: Caller,
    Path(quiz_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    caller.require(AUTHORS)?;

    assessment::delete_quiz(state.repository.as_ref(), QuizId::new(quiz_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/quizzes/{id}/status
pub async fn transition_quiz(
    State(state): State<AppState>,
    caller: Caller,
    Path(quiz_id): Path<i64>,
    Json(request): Json<StatusChangeRequest>,
) -> HandlerResult<QuizDto> {
    caller.require(AUTHORS)?;

    let quiz = assessment::transition_quiz(
        state.repository.as_ref(),
        QuizId::new(quiz_id),
        request.status,
        &caller.actor,
    )
    .await?;
    Ok(ApiResponse::ok(quiz.into()))
}
