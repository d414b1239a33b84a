//! Training programs (course bundles) and applications to join them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::audit::AuditInfo;
use super::course::CourseId;
use super::status::LifecycleStatus;
use crate::define_id_type;

define_id_type!(i64, ProgramId);
define_id_type!(i64, ApplicationId);

/// A bundle of courses sold and taken as a unit.
///
/// Publishing a program requires every member course to be published; the
/// readiness check lives in the service layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingProgram {
    pub id: Option<ProgramId>,
    pub code: String,
    pub title: String,
    pub description: String,
    /// Member courses, in bundle order. No duplicates.
    pub course_ids: Vec<CourseId>,
    pub status: LifecycleStatus,
    pub audit: AuditInfo,
}

/// Decision state of a training application.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Approved => "APPROVED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }
}

/// An applicant's request to join a training program.
///
/// Decisions are only taken from `Pending`; `decided_by` and
/// `decision_note` are filled when the application is approved or rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingApplication {
    pub id: Option<ApplicationId>,
    pub program_id: ProgramId,
    pub applicant_id: String,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub decided_by: Option<String>,
    pub decision_note: Option<String>,
}
