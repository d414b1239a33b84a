//! Data Transfer Objects for the HTTP API.
//!
//! Request DTOs are re-exported from the service layer (they already derive
//! Deserialize). Response DTOs are defined here, with `From` conversions
//! from the domain entities - the factory layer of the application: pure,
//! stateless mappings with the audit block flattened into plain fields.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    ApplicationStatus, Assignment, Certificate, Course, CourseId, Enrollment, EnrollmentStatus,
    Lesson, LifecycleStatus, Quiz, QuizQuestion, Rubric, RubricCell, RubricCriterion,
    ScoringLevel, TrainingApplication, TrainingProgram,
};

// Re-export service inputs used as request bodies.
pub use crate::services::assessment::{
    CreateAssignmentInput, CreateQuizInput, CreateRubricInput, UpdateAssignmentInput,
    UpdateQuizInput, UpdateRubricInput,
};
pub use crate::services::catalog::{
    CreateCourseInput, CreateLessonInput, UpdateCourseInput, UpdateLessonInput,
};
pub use crate::services::enrollment::{EnrollInput, ProgressInput};
pub use crate::services::program::{
    ApplyInput, CreateProgramInput, DecisionInput, UpdateProgramInput,
};

fn raw_id<T: Into<i64>>(id: Option<T>) -> i64 {
    id.map(Into::into).unwrap_or_default()
}

/// Request body for a lifecycle status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangeRequest {
    pub status: LifecycleStatus,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Generic list payload with a total count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

// ==================== Catalog ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDto {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub passing_score_pct: i32,
    pub status: LifecycleStatus,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl From<Course> for CourseDto {
    fn from(course: Course) -> Self {
        Self {
            id: raw_id(course.id),
            code: course.code,
            title: course.title,
            description: course.description,
            category: course.category,
            price: course.price,
            passing_score_pct: course.passing_score_pct,
            status: course.status,
            created_at: course.audit.created_at,
            created_by: course.audit.created_by,
            updated_at: course.audit.updated_at,
            updated_by: course.audit.updated_by,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonDto {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub content: String,
    pub position: i32,
    pub duration_minutes: i32,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl From<Lesson> for LessonDto {
    fn from(lesson: Lesson) -> Self {
        Self {
            id: raw_id(lesson.id),
            course_id: lesson.course_id.value(),
            title: lesson.title,
            content: lesson.content,
            position: lesson.position,
            duration_minutes: lesson.duration_minutes,
            updated_at: lesson.audit.updated_at,
            updated_by: lesson.audit.updated_by,
        }
    }
}

// ==================== Assessments ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizDto {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub pass_mark_pct: i32,
    pub questions: Vec<QuizQuestion>,
    pub status: LifecycleStatus,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl From<Quiz> for QuizDto {
    fn from(quiz: Quiz) -> Self {
        Self {
            id: raw_id(quiz.id),
            course_id: quiz.course_id.value(),
            title: quiz.title,
            pass_mark_pct: quiz.pass_mark_pct,
            questions: quiz.questions,
            status: quiz.status,
            updated_at: quiz.audit.updated_at,
            updated_by: quiz.audit.updated_by,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentDto {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub instructions: String,
    pub max_points: i32,
    pub weight_pct: i32,
    pub rubric_id: Option<i64>,
    pub status: LifecycleStatus,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl From<Assignment> for AssignmentDto {
    fn from(assignment: Assignment) -> Self {
        Self {
            id: raw_id(assignment.id),
            course_id: assignment.course_id.value(),
            title: assignment.title,
            instructions: assignment.instructions,
            max_points: assignment.max_points,
            weight_pct: assignment.weight_pct,
            rubric_id: assignment.rubric_id.map(|r| r.value()),
            status: assignment.status,
            updated_at: assignment.audit.updated_at,
            updated_by: assignment.audit.updated_by,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricDto {
    pub id: i64,
    pub title: String,
    pub criteria: Vec<RubricCriterion>,
    pub levels: Vec<ScoringLevel>,
    pub cells: Vec<RubricCell>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl From<Rubric> for RubricDto {
    fn from(rubric: Rubric) -> Self {
        Self {
            id: raw_id(rubric.id),
            title: rubric.title,
            criteria: rubric.criteria,
            levels: rubric.levels,
            cells: rubric.cells,
            updated_at: rubric.audit.updated_at,
            updated_by: rubric.audit.updated_by,
        }
    }
}

// ==================== Enrollments ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentDto {
    pub id: i64,
    pub course_id: i64,
    pub learner_id: String,
    pub status: EnrollmentStatus,
    pub progress_pct: i32,
    pub enrolled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Enrollment> for EnrollmentDto {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            id: raw_id(enrollment.id),
            course_id: enrollment.course_id.value(),
            learner_id: enrollment.learner_id,
            status: enrollment.status,
            progress_pct: enrollment.progress_pct,
            enrolled_at: enrollment.enrolled_at,
            completed_at: enrollment.completed_at,
        }
    }
}

// ==================== Programs ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramDto {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub description: String,
    pub course_ids: Vec<i64>,
    pub status: LifecycleStatus,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl From<TrainingProgram> for ProgramDto {
    fn from(program: TrainingProgram) -> Self {
        Self {
            id: raw_id(program.id),
            code: program.code,
            title: program.title,
            description: program.description,
            course_ids: program.course_ids.iter().map(CourseId::value).collect(),
            status: program.status,
            created_at: program.audit.created_at,
            created_by: program.audit.created_by,
            updated_at: program.audit.updated_at,
            updated_by: program.audit.updated_by,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDto {
    pub id: i64,
    pub program_id: i64,
    pub applicant_id: String,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub decided_by: Option<String>,
    pub decision_note: Option<String>,
}

impl From<TrainingApplication> for ApplicationDto {
    fn from(application: TrainingApplication) -> Self {
        Self {
            id: raw_id(application.id),
            program_id: application.program_id.value(),
            applicant_id: application.applicant_id,
            status: application.status,
            submitted_at: application.submitted_at,
            decided_by: application.decided_by,
            decision_note: application.decision_note,
        }
    }
}

// ==================== Certificates ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateDto {
    pub id: i64,
    pub enrollment_id: i64,
    pub course_id: i64,
    pub learner_id: String,
    pub serial: Uuid,
    pub verification_code: String,
    pub issued_at: DateTime<Utc>,
}

impl From<Certificate> for CertificateDto {
    fn from(certificate: Certificate) -> Self {
        Self {
            id: raw_id(certificate.id),
            enrollment_id: certificate.enrollment_id.value(),
            course_id: certificate.course_id.value(),
            learner_id: certificate.learner_id,
            serial: certificate.serial,
            verification_code: certificate.verification_code,
            issued_at: certificate.issued_at,
        }
    }
}

/// Request body for issuing a certificate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueCertificateRequest {
    pub enrollment_id: i64,
}

// ==================== List Queries ====================

/// Query parameters for the course list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CourseListQuery {
    #[serde(default)]
    pub status: Option<LifecycleStatus>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub min_price: Option<Decimal>,
    #[serde(default)]
    pub max_price: Option<Decimal>,
}

impl From<CourseListQuery> for crate::db::filter::CourseFilter {
    fn from(query: CourseListQuery) -> Self {
        Self {
            status: query.status,
            category: query.category,
            q: query.q,
            min_price: query.min_price,
            max_price: query.max_price,
        }
    }
}

/// Query parameters for the enrollment list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EnrollmentListQuery {
    #[serde(default)]
    pub course_id: Option<i64>,
    #[serde(default)]
    pub learner_id: Option<String>,
    #[serde(default)]
    pub status: Option<EnrollmentStatus>,
}

impl From<EnrollmentListQuery> for crate::db::filter::EnrollmentFilter {
    fn from(query: EnrollmentListQuery) -> Self {
        Self {
            course_id: query.course_id.map(CourseId::new),
            learner_id: query.learner_id,
            status: query.status,
        }
    }
}

/// Query parameters for the program list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProgramListQuery {
    #[serde(default)]
    pub status: Option<LifecycleStatus>,
    #[serde(default)]
    pub q: Option<String>,
}

impl From<ProgramListQuery> for crate::db::filter::ProgramFilter {
    fn from(query: ProgramListQuery) -> Self {
        Self {
            status: query.status,
            q: query.q,
        }
    }
}
