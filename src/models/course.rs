//! Course and lesson entities.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::audit::AuditInfo;
use super::status::LifecycleStatus;
use crate::define_id_type;

define_id_type!(i64, CourseId);
define_id_type!(i64, LessonId);

/// A course in the catalog. Parent of lessons, quizzes, and assignments.
///
/// `id` is `None` until the repository assigns one. `code` is unique across
/// the catalog and immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Option<CourseId>,
    pub code: String,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Non-negative list price.
    pub price: Decimal,
    /// Minimum overall score (0-100) a learner needs to complete the course.
    pub passing_score_pct: i32,
    pub status: LifecycleStatus,
    pub audit: AuditInfo,
}

/// A single lesson within a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Option<LessonId>,
    pub course_id: CourseId,
    pub title: String,
    pub content: String,
    /// 1-based ordering within the course.
    pub position: i32,
    pub duration_minutes: i32,
    pub audit: AuditInfo,
}
