use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use super::schema::{
    assignments, certificates, courses, enrollments, lessons, program_courses, quizzes, rubrics,
    training_applications, training_programs,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CourseRow {
    pub course_id: i64,
    pub code: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub passing_score_pct: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = courses)]
pub struct NewCourseRow {
    pub code: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub passing_score_pct: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = lessons)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LessonRow {
    pub lesson_id: i64,
    pub course_id: i64,
    pub title: String,
    pub content: String,
    pub position: i32,
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = lessons)]
pub struct NewLessonRow {
    pub course_id: i64,
    pub title: String,
    pub content: String,
    pub position: i32,
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = quizzes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QuizRow {
    pub quiz_id: i64,
    pub course_id: i64,
    pub title: String,
    pub pass_mark_pct: i32,
    pub questions_json: Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = quizzes)]
pub struct NewQuizRow {
    pub course_id: i64,
    pub title: String,
    pub pass_mark_pct: i32,
    pub questions_json: Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = assignments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AssignmentRow {
    pub assignment_id: i64,
    pub course_id: i64,
    pub title: String,
    pub instructions: String,
    pub max_points: i32,
    pub weight_pct: i32,
    pub rubric_id: Option<i64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = assignments)]
pub struct NewAssignmentRow {
    pub course_id: i64,
    pub title: String,
    pub instructions: String,
    pub max_points: i32,
    pub weight_pct: i32,
    pub rubric_id: Option<i64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rubrics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RubricRow {
    pub rubric_id: i64,
    pub title: String,
    pub criteria_json: Value,
    pub levels_json: Value,
    pub cells_json: Value,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rubrics)]
pub struct NewRubricRow {
    pub title: String,
    pub criteria_json: Value,
    pub levels_json: Value,
    pub cells_json: Value,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EnrollmentRow {
    pub enrollment_id: i64,
    pub course_id: i64,
    pub learner_id: String,
    pub status: String,
    pub progress_pct: i32,
    pub enrolled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = enrollments)]
pub struct NewEnrollmentRow {
    pub course_id: i64,
    pub learner_id: String,
    pub status: String,
    pub progress_pct: i32,
    pub enrolled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = training_programs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProgramRow {
    pub program_id: i64,
    pub code: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = training_programs)]
pub struct NewProgramRow {
    pub code: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = program_courses)]
pub struct ProgramCourseRow {
    pub program_id: i64,
    pub course_id: i64,
    pub position: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = training_applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApplicationRow {
    pub application_id: i64,
    pub program_id: i64,
    pub applicant_id: String,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
    pub decided_by: Option<String>,
    pub decision_note: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = training_applications)]
pub struct NewApplicationRow {
    pub program_id: i64,
    pub applicant_id: String,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
    pub decided_by: Option<String>,
    pub decision_note: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = certificates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CertificateRow {
    pub certificate_id: i64,
    pub enrollment_id: i64,
    pub course_id: i64,
    pub learner_id: String,
    pub serial: Uuid,
    pub verification_code: String,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = certificates)]
pub struct NewCertificateRow {
    pub enrollment_id: i64,
    pub course_id: i64,
    pub learner_id: String,
    pub serial: Uuid,
    pub verification_code: String,
    pub issued_at: DateTime<Utc>,
}
