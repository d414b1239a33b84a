//! Enrollment of a learner in a course.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::course::CourseId;
use crate::define_id_type;

define_id_type!(i64, EnrollmentId);

/// Participation state of an enrollment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Withdrawn,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "ACTIVE",
            EnrollmentStatus::Completed => "COMPLETED",
            EnrollmentStatus::Withdrawn => "WITHDRAWN",
        }
    }
}

/// A learner's enrollment in a single course.
///
/// The (`course_id`, `learner_id`) pair is unique; enrolling twice is a
/// duplicate error at the repository level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Option<EnrollmentId>,
    pub course_id: CourseId,
    pub learner_id: String,
    pub status: EnrollmentStatus,
    /// Completion progress, 0-100. Reaching 100 marks the enrollment
    /// completed.
    pub progress_pct: i32,
    pub enrolled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
