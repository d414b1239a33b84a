//! Certificates of completion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::course::CourseId;
use super::enrollment::EnrollmentId;
use crate::define_id_type;

define_id_type!(i64, CertificateId);

/// A certificate issued for a completed enrollment.
///
/// `serial` is the public identifier printed on the document;
/// `verification_code` is a hex SHA-256 digest derivable only at issuance
/// time, used by the public verification endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: Option<CertificateId>,
    pub enrollment_id: EnrollmentId,
    pub course_id: CourseId,
    pub learner_id: String,
    pub serial: Uuid,
    pub verification_code: String,
    pub issued_at: DateTime<Utc>,
}
