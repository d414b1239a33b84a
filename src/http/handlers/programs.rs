//! Training program and application endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::HandlerResult;
use crate::http::auth::{Caller, Role};
use crate::http::dto::{
    ApplicationDto, ApplyInput, CreateProgramInput, DecisionInput, ListResponse, ProgramDto,
    ProgramListQuery, StatusChangeRequest, UpdateProgramInput,
};
use crate::http::error::{ApiResponse, AppError};
use crate::http::state::AppState;
use crate::models::{ApplicationId, ProgramId};
use crate::services::program;

const ANY_ROLE: &[Role] = &[Role::Learner, Role::Instructor, Role::Admin];
const AUTHORS: &[Role] = &[Role::Instructor, Role::Admin];
const APPLICANTS: &[Role] = &[Role::Learner, Role::Admin];

/// GET /api/v1/programs
pub async fn list_programs(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<ProgramListQuery>,
) -> HandlerResult<ListResponse<ProgramDto>> {
    caller.require(ANY_ROLE)?;

    let filter = query.into();
    let programs = program::list_programs(state.repository.as_ref(), &filter).await?;
    let items: Vec<ProgramDto> = programs.into_iter().map(Into::into).collect();
    Ok(ApiResponse::ok(ListResponse::new(items)))
}

/// POST /api/v1/programs
pub async fn create_program(
    State(state): State<AppState>,
    caller: Caller,
    Json(input): Json<CreateProgramInput>,
) -> Result<(StatusCode, Json<ApiResponse<ProgramDto>>), AppError> {
    caller.require(AUTHORS)?;

    let program =
        program::create_program(state.repository.as_ref(), input, &caller.actor).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(program.into())))
}

/// GET /api/v1/programs/{id}
pub async fn get_program(
    State(state): State<AppState>,
    caller: Caller,
    Path(program_id): Path<i64>,
) -> HandlerResult<ProgramDto> {
    caller.require(ANY_ROLE)?;

    let program =
        program::get_program(state.repository.as_ref(), ProgramId::new(program_id)).await?;
    Ok(ApiResponse::ok(program.into()))
}

/// PATCH /api/v1/programs/{id}
pub async fn update_program(
    State(state): State<AppState>,
    caller: Caller,
    Path(program_id): Path<i64>,
    Json(input): Json<UpdateProgramInput>,
) -> HandlerResult<ProgramDto> {
    caller.require(AUTHORS)?;

    let program = program::update_program(
        state.repository.as_ref(),
        ProgramId::new(program_id),
        input,
        &caller.actor,
    )
    .await?;
    Ok(ApiResponse::ok(program.into()))
}

/// DELETE /api/v1/programs/{id}
pub async fn delete_program(
    State(state): State<AppState>,
    caller: Caller,
    Path(program_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    caller.require(AUTHORS)?;

    program::delete_program(state.repository.as_ref(), ProgramId::new(program_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/programs/{id}/status
pub async fn transition_program(
    State(state): State<AppState>,
    caller: Caller,
    Path(program_id): Path<i64>,
    Json(request): Json<StatusChangeRequest>,
) -> HandlerResult<ProgramDto> {
    caller.require(AUTHORS)?;

    let program = program::transition_program(
        state.repository.as_ref(),
        ProgramId::new(program_id),
        request.status,
        &caller.actor,
    )
    .await?;
    Ok(ApiResponse::ok(program.into()))
}

/// GET /api/v1/programs/{id}/applications
pub async fn list_applications(
    State(state): State<AppState>,
    caller: Caller,
    Path(program_id): Path<i64>,
) -> HandlerResult<ListResponse<ApplicationDto>> {
    caller.require(AUTHORS)?;

    let applications =
        program::list_applications(state.repository.as_ref(), ProgramId::new(program_id))
            .await?;
    let items: Vec<ApplicationDto> = applications.into_iter().map(Into::into).collect();
    Ok(ApiResponse::ok(ListResponse::new(items)))
}

/// POST /api/v1/programs/{id}/applications
pub async fn submit_application(
    State(state): State<AppState>,
    caller: Caller,
    Path(program_id): Path<i64>,
    Json(input): Json<ApplyInput>,
) -> Result<(StatusCode, Json<ApiResponse<ApplicationDto>>), AppError> {
    caller.require(APPLICANTS)?;

    let application = program::submit_application(
        state.repository.as_ref(),
        ProgramId::new(program_id),
        input,
    )
    .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(application.into())))
}

/// GET /api/v1/applications/{id}
pub async fn get_application(
    State(state): State<AppState>,
    caller: Caller,
    Path(application_id): Path<i64>,
) -> HandlerResult<ApplicationDto> {
    caller.require(ANY_ROLE)?;

    let application = program::get_application(
        state.repository.as_ref(),
        ApplicationId::new(application_id),
    )
    .await?;
    Ok(ApiResponse::ok(application.into()))
}

/// POST /api/v1/applications/{id}/decision
pub async fn decide_application(
    State(state): State<AppState>,
    caller: Caller,
    Path(application_id): Path<i64>,
    Json(input): Json<DecisionInput>,
) -> HandlerResult<ApplicationDto> {
    caller.require(AUTHORS)?;

    let application = program::decide_application(
        state.repository.as_ref(),
        ApplicationId::new(application_id),
        input,
        &caller.actor,
    )
    .await?;
    Ok(ApiResponse::ok(application.into()))
}
