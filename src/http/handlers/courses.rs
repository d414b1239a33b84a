//! Course endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::HandlerResult;
use crate::http::auth::{Caller, Role};
use crate::http::dto::{
    CourseDto, CourseListQuery, CreateCourseInput, ListResponse, StatusChangeRequest,
    UpdateCourseInput,
};
use crate::http::error::{ApiResponse, AppError};
use crate::http::state::AppState;
use crate::models::CourseId;
use crate::services::catalog;

const ANY_ROLE: &[Role] = &[Role::Learner, Role::Instructor, Role::Admin];
const AUTHORS: &[Role] = &[Role::Instructor, Role::Admin];

/// GET /api/v1/courses
pub async fn list_courses(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<CourseListQuery>,
) -> HandlerResult<ListResponse<CourseDto>> {
    caller.require(ANY_ROLE)?;

    let filter = query.into();
    let courses = catalog::list_courses(state.repository.as_ref(), &filter).await?;
    let items: Vec<CourseDto> = courses.into_iter().map(Into::into).collect();
    Ok(ApiResponse::ok(ListResponse::new(items)))
}

/// POST /api/v1/courses
pub async fn create_course(
    State(state): State<AppState>,
    caller: Caller,
    Json(input): Json<CreateCourseInput>,
) -> Result<(StatusCode, Json<ApiResponse<CourseDto>>), AppError> {
    caller.require(AUTHORS)?;

    let course =
        catalog::create_course(state.repository.as_ref(), input, &caller.actor).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(course.into())))
}

/// GET /api/v1/courses/{id}
pub async fn get_course(
    State(state): State<AppState>,
    caller: Caller,
    Path(course_id): Path<i64>,
) -> HandlerResult<CourseDto> {
    caller.require(ANY_ROLE)?;

    let course =
        catalog::get_course(state.repository.as_ref(), CourseId::new(course_id)).await?;
    Ok(ApiResponse::ok(course.into()))
}

/// PATCH /api/v1/courses/{id}
pub async fn update_course(
    State(state): State<AppState>,
    caller: Caller,
    Path(course_id): Path<i64>,
    Json(input): Json<UpdateCourseInput>,
) -> HandlerResult<CourseDto> {
    caller.require(AUTHORS)?;

    let course = catalog::update_course(
        state.repository.as_ref(),
        CourseId::new(course_id),
        input,
        &caller.actor,
    )
    .await?;
    Ok(ApiResponse::ok(course.into()))
}

/// DELETE /api/v1/courses/{id}
pub async fn delete_course(
    State(state): State<AppState>,
    caller: Caller,
    Path(course_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    caller.require(AUTHORS)?;

    catalog::delete_course(state.repository.as_ref(), CourseId::new(course_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/courses/{id}/status
pub async fn transition_course(
    State(state): State<AppState>,
    caller: Caller,
    Path(course_id): Path<i64>,
    Json(request): Json<StatusChangeRequest>,
) -> HandlerResult<CourseDto> {
    caller.require(AUTHORS)?;

    let course = catalog::transition_course(
        state.repository.as_ref(),
        CourseId::new(course_id),
        request.status,
        &caller.actor,
    )
    .await?;
    Ok(ApiResponse::ok(course.into()))
}
