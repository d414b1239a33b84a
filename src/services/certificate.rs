//! Certificate issuance and verification.
//!
//! A certificate is only issued for a completed enrollment, exactly once:
//! re-issuing returns the existing document. The verification code is a
//! SHA-256 digest over the canonical issuance string, so the public
//! verification endpoint never needs to expose internal identifiers.

use chrono::{DateTime, Utc};
use log::info;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use crate::db::repository::FullRepository;
use crate::models::{Certificate, CertificateId, CourseId, EnrollmentId, EnrollmentStatus};

/// Compute the verification code for a certificate.
///
/// The canonical string is stable: enrollment, course, learner, serial,
/// and issuance timestamp, joined with `|`.
pub fn verification_code(
    enrollment_id: EnrollmentId,
    course_id: CourseId,
    learner_id: &str,
    serial: Uuid,
    issued_at: DateTime<Utc>,
) -> String {
    let canonical = format!(
        "{}|{}|{}|{}|{}",
        enrollment_id,
        course_id,
        learner_id,
        serial,
        issued_at.timestamp()
    );
    let digest = Sha256::digest(canonical.as_bytes());
    hex::encode(digest)
}

/// Issue a certificate for a completed enrollment.
///
/// Idempotent: issuing twice for the same enrollment returns the
/// certificate created the first time.
pub async fn issue<R: FullRepository + ?Sized>(
    repo: &R,
    enrollment_id: EnrollmentId,
) -> ServiceResult<Certificate> {
    let enrollment = repo.get_enrollment(enrollment_id).await?;
    if enrollment.status != EnrollmentStatus::Completed {
        return Err(ServiceError::illegal_state(format!(
            "Enrollment {} is {}; certificates are only issued for completed enrollments",
            enrollment_id,
            enrollment.status.as_str()
        )));
    }

    if let Some(existing) = repo.find_certificate_for_enrollment(enrollment_id).await? {
        return Ok(existing);
    }

    let serial = Uuid::new_v4();
    let issued_at = Utc::now();
    let certificate = Certificate {
        id: None,
        enrollment_id,
        course_id: enrollment.course_id,
        learner_id: enrollment.learner_id.clone(),
        serial,
        verification_code: verification_code(
            enrollment_id,
            enrollment.course_id,
            &enrollment.learner_id,
            serial,
            issued_at,
        ),
        issued_at,
    };

    let stored = repo.insert_certificate(&certificate).await?;
    info!(
        "Issued certificate {} for enrollment {}",
        stored.serial, enrollment_id
    );
    Ok(stored)
}

/// Retrieve a certificate by ID.
pub async fn get_certificate<R: FullRepository + ?Sized>(
    repo: &R,
    certificate_id: CertificateId,
) -> ServiceResult<Certificate> {
    Ok(repo.get_certificate(certificate_id).await?)
}

/// Resolve a verification code to its certificate.
pub async fn verify<R: FullRepository + ?Sized>(repo: &R, code: &str) -> ServiceResult<Certificate> {
    repo.find_certificate_by_code(code)
        .await?
        .ok_or_else(|| {
            ServiceError::Repository(crate::db::repository::RepositoryError::not_found(
                format!("No certificate matches verification code '{}'", code),
            ))
        })
}

/// All certificates earned by a learner.
pub async fn list_for_learner<R: FullRepository + ?Sized>(
    repo: &R,
    learner_id: &str,
) -> ServiceResult<Vec<Certificate>> {
    Ok(repo.certificates_for_learner(learner_id).await?)
}
