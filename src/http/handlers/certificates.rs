//! Certificate endpoints.
//!
//! Verification is deliberately unauthenticated: the code printed on a
//! certificate is enough to confirm it, so external parties can check
//! documents without credentials.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::HandlerResult;
use crate::http::auth::{Caller, Role};
use crate::http::dto::{CertificateDto, IssueCertificateRequest, ListResponse};
use crate::http::error::{ApiResponse, AppError};
use crate::http::state::AppState;
use crate::models::{CertificateId, EnrollmentId};
use crate::services::certificate;

const ANY_ROLE: &[Role] = &[Role::Learner, Role::Instructor, Role::Admin];
const ISSUERS: &[Role] = &[Role::Instructor, Role::Admin];

/// POST /api/v1/certificates
pub async fn issue_certificate(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<IssueCertificateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CertificateDto>>), AppError> {
    caller.require(ISSUERS)?;

    let certificate = certificate::issue(
        state.repository.as_ref(),
        EnrollmentId::new(request.enrollment_id),
    )
    .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(certificate.into())))
}

/// GET /api/v1/certificates/{id}
pub async fn get_certificate(
    State(state): State<AppState>,
    caller: Caller,
    Path(certificate_id): Path<i64>,
) -> HandlerResult<CertificateDto> {
    caller.require(ANY_ROLE)?;

    let certificate = certificate::get_certificate(
        state.repository.as_ref(),
        CertificateId::new(certificate_id),
    )
    .await?;
    Ok(ApiResponse::ok(certificate.into()))
}

/// GET /api/v1/certificates/verify/{code}
pub async fn verify_certificate(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> HandlerResult<CertificateDto> {
    let certificate = certificate::verify(state.repository.as_ref(), &code).await?;
    Ok(ApiResponse::ok(certificate.into()))
}

/// GET /api/v1/learners/{id}/certificates
pub async fn list_learner_certificates(
    State(state): State<AppState>,
    caller: Caller,
    Path(learner_id): Path<String>,
) -> HandlerResult<ListResponse<CertificateDto>> {
    caller.require(ANY_ROLE)?;

    let certificates =
        certificate::list_for_learner(state.repository.as_ref(), &learner_id).await?;
    let items: Vec<CertificateDto> = certificates.into_iter().map(Into::into).collect();
    Ok(ApiResponse::ok(ListResponse::new(items)))
}
