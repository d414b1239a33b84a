//! Quiz and assignment entities.

use serde::{Deserialize, Serialize};

use super::audit::AuditInfo;
use super::course::CourseId;
use super::rubric::RubricId;
use super::status::LifecycleStatus;
use crate::define_id_type;

define_id_type!(i64, QuizId);
define_id_type!(i64, AssignmentId);

/// A graded multiple-choice quiz attached to a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: Option<QuizId>,
    pub course_id: CourseId,
    pub title: String,
    /// Percentage (0-100) required to pass.
    pub pass_mark_pct: i32,
    pub questions: Vec<QuizQuestion>,
    pub status: LifecycleStatus,
    pub audit: AuditInfo,
}

/// One multiple-choice question. `correct_option` indexes into `options`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: usize,
    pub points: i32,
}

/// A free-form assignment, optionally graded against a rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Option<AssignmentId>,
    pub course_id: CourseId,
    pub title: String,
    pub instructions: String,
    pub max_points: i32,
    /// Contribution (0-100) to the final course score.
    pub weight_pct: i32,
    pub rubric_id: Option<RubricId>,
    pub status: LifecycleStatus,
    pub audit: AuditInfo,
}
