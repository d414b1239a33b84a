//! Postgres repository implementation using Diesel.
//!
//! This module implements the repository traits against a Postgres database.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::task;

use crate::db::filter::{CourseFilter, EnrollmentFilter, ProgramFilter};
use crate::db::repository::{
    AssessmentRepository, CatalogRepository, CertificateRepository, EnrollmentRepository,
    ErrorContext, ProgramRepository, RepositoryError, RepositoryResult,
};
use crate::models::{
    ApplicationId, ApplicationStatus, Assignment, AssignmentId, AuditInfo, Certificate,
    CertificateId, Course, CourseId, Enrollment, EnrollmentId, EnrollmentStatus, Lesson, LessonId,
    LifecycleStatus, ProgramId, Quiz, QuizId, QuizQuestion, Rubric, RubricCell, RubricCriterion,
    RubricId, ScoringLevel, TrainingApplication, TrainingProgram,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// See the module documentation for the variables consulted.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        let max_retries = std::env::var("PG_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let retry_delay_ms = std::env::var("PG_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(100);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
///
/// This repository implementation provides:
/// - Connection pooling with configurable limits
/// - Automatic retry for transient failures
/// - Health monitoring and statistics
/// - Automatic schema migrations
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    // Metrics counters
    total_queries: std::sync::Arc<AtomicU64>,
    failed_queries: std::sync::Arc<AtomicU64>,
    retried_operations: std::sync::Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true) // Validate connections before use
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: std::sync::Arc::new(AtomicU64::new(0)),
            failed_queries: std::sync::Arc::new(AtomicU64::new(0)),
            retried_operations: std::sync::Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// The operation is retried up to `max_retries` times when a retryable
    /// error occurs (connection errors, timeouts, serialization failures).
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2; // Exponential backoff
                }

                // Get connection
                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1))
                                .retryable(),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                // Execute the operation
                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Get pool health statistics for monitoring.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Check if the database connection is healthy.
    pub async fn is_healthy(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }

    /// Detailed health information: (is_healthy, latency_ms, error_message).
    pub async fn health_check_detailed(&self) -> (bool, Option<u64>, Option<String>) {
        let start = Instant::now();
        match self.health_check().await {
            Ok(true) => (true, Some(start.elapsed().as_millis() as u64), None),
            Ok(false) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some("Health check returned false".to_string()),
            ),
            Err(e) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some(e.to_string()),
            ),
        }
    }
}

// ==================== Conversion helpers ====================

fn parse_lifecycle_status(s: &str) -> RepositoryResult<LifecycleStatus> {
    s.parse::<LifecycleStatus>()
        .map_err(|e| RepositoryError::internal(format!("Corrupt status column: {}", e)))
}

fn parse_enrollment_status(s: &str) -> RepositoryResult<EnrollmentStatus> {
    match s {
        "ACTIVE" => Ok(EnrollmentStatus::Active),
        "COMPLETED" => Ok(EnrollmentStatus::Completed),
        "WITHDRAWN" => Ok(EnrollmentStatus::Withdrawn),
        other => Err(RepositoryError::internal(format!(
            "Corrupt enrollment status column: {}",
            other
        ))),
    }
}

fn parse_application_status(s: &str) -> RepositoryResult<ApplicationStatus> {
    match s {
        "PENDING" => Ok(ApplicationStatus::Pending),
        "APPROVED" => Ok(ApplicationStatus::Approved),
        "REJECTED" => Ok(ApplicationStatus::Rejected),
        other => Err(RepositoryError::internal(format!(
            "Corrupt application status column: {}",
            other
        ))),
    }
}

fn json_to<T: serde::de::DeserializeOwned>(value: &Value, what: &str) -> RepositoryResult<T> {
    serde_json::from_value(value.clone())
        .map_err(|e| RepositoryError::internal(format!("Failed to parse {} JSON: {}", what, e)))
}

fn to_json<T: serde::Serialize>(value: &T, what: &str) -> RepositoryResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| RepositoryError::internal(format!("Failed to encode {} JSON: {}", what, e)))
}

fn row_audit(
    created_at: chrono::DateTime<chrono::Utc>,
    created_by: String,
    updated_at: chrono::DateTime<chrono::Utc>,
    updated_by: String,
) -> AuditInfo {
    AuditInfo {
        created_at,
        created_by,
        updated_at,
        updated_by,
    }
}

fn row_to_course(row: CourseRow) -> RepositoryResult<Course> {
    Ok(Course {
        id: Some(CourseId::new(row.course_id)),
        code: row.code,
        title: row.title,
        description: row.description,
        category: row.category,
        price: row.price,
        passing_score_pct: row.passing_score_pct,
        status: parse_lifecycle_status(&row.status)?,
        audit: row_audit(row.created_at, row.created_by, row.updated_at, row.updated_by),
    })
}

fn course_to_new_row(course: &Course) -> NewCourseRow {
    NewCourseRow {
        code: course.code.clone(),
        title: course.title.clone(),
        description: course.description.clone(),
        category: course.category.clone(),
        price: course.price,
        passing_score_pct: course.passing_score_pct,
        status: course.status.as_str().to_string(),
        created_at: course.audit.created_at,
        created_by: course.audit.created_by.clone(),
        updated_at: course.audit.updated_at,
        updated_by: course.audit.updated_by.clone(),
    }
}

fn row_to_lesson(row: LessonRow) -> Lesson {
    Lesson {
        id: Some(LessonId::new(row.lesson_id)),
        course_id: CourseId::new(row.course_id),
        title: row.title,
        content: row.content,
        position: row.position,
        duration_minutes: row.duration_minutes,
        audit: row_audit(row.created_at, row.created_by, row.updated_at, row.updated_by),
    }
}

fn lesson_to_new_row(lesson: &Lesson) -> NewLessonRow {
    NewLessonRow {
        course_id: lesson.course_id.value(),
        title: lesson.title.clone(),
        content: lesson.content.clone(),
        position: lesson.position,
        duration_minutes: lesson.duration_minutes,
        created_at: lesson.audit.created_at,
        created_by: lesson.audit.created_by.clone(),
        updated_at: lesson.audit.updated_at,
        updated_by: lesson.audit.updated_by.clone(),
    }
}

fn row_to_quiz(row: QuizRow) -> RepositoryResult<Quiz> {
    let questions: Vec<QuizQuestion> = json_to(&row.questions_json, "quiz questions")?;
    Ok(Quiz {
        id: Some(QuizId::new(row.quiz_id)),
        course_id: CourseId::new(row.course_id),
        title: row.title,
        pass_mark_pct: row.pass_mark_pct,
        questions,
        status: parse_lifecycle_status(&row.status)?,
        audit: row_audit(row.created_at, row.created_by, row.updated_at, row.updated_by),
    })
}

fn quiz_to_new_row(quiz: &Quiz) -> RepositoryResult<NewQuizRow> {
    Ok(NewQuizRow {
        course_id: quiz.course_id.value(),
        title: quiz.title.clone(),
        pass_mark_pct: quiz.pass_mark_pct,
        questions_json: to_json(&quiz.questions, "quiz questions")?,
        status: quiz.status.as_str().to_string(),
        created_at: quiz.audit.created_at,
        created_by: quiz.audit.created_by.clone(),
        updated_at: quiz.audit.updated_at,
        updated_by: quiz.audit.updated_by.clone(),
    })
}

fn row_to_assignment(row: AssignmentRow) -> RepositoryResult<Assignment> {
    Ok(Assignment {
        id: Some(AssignmentId::new(row.assignment_id)),
        course_id: CourseId::new(row.course_id),
        title: row.title,
        instructions: row.instructions,
        max_points: row.max_points,
        weight_pct: row.weight_pct,
        rubric_id: row.rubric_id.map(RubricId::new),
        status: parse_lifecycle_status(&row.status)?,
        audit: row_audit(row.created_at, row.created_by, row.updated_at, row.updated_by),
    })
}

fn assignment_to_new_row(assignment: &Assignment) -> NewAssignmentRow {
    NewAssignmentRow {
        course_id: assignment.course_id.value(),
        title: assignment.title.clone(),
        instructions: assignment.instructions.clone(),
        max_points: assignment.max_points,
        weight_pct: assignment.weight_pct,
        rubric_id: assignment.rubric_id.map(|r| r.value()),
        status: assignment.status.as_str().to_string(),
        created_at: assignment.audit.created_at,
        created_by: assignment.audit.created_by.clone(),
        updated_at: assignment.audit.updated_at,
        updated_by: assignment.audit.updated_by.clone(),
    }
}

fn row_to_rubric(row: RubricRow) -> RepositoryResult<Rubric> {
    let criteria: Vec<RubricCriterion> = json_to(&row.criteria_json, "rubric criteria")?;
    let levels: Vec<ScoringLevel> = json_to(&row.levels_json, "rubric levels")?;
    let cells: Vec<RubricCell> = json_to(&row.cells_json, "rubric cells")?;
    Ok(Rubric {
        id: Some(RubricId::new(row.rubric_id)),
        title: row.title,
        criteria,
        levels,
        cells,
        audit: row_audit(row.created_at, row.created_by, row.updated_at, row.updated_by),
    })
}

fn rubric_to_new_row(rubric: &Rubric) -> RepositoryResult<NewRubricRow> {
    Ok(NewRubricRow {
        title: rubric.title.clone(),
        criteria_json: to_json(&rubric.criteria, "rubric criteria")?,
        levels_json: to_json(&rubric.levels, "rubric levels")?,
        cells_json: to_json(&rubric.cells, "rubric cells")?,
        created_at: rubric.audit.created_at,
        created_by: rubric.audit.created_by.clone(),
        updated_at: rubric.audit.updated_at,
        updated_by: rubric.audit.updated_by.clone(),
    })
}

fn row_to_enrollment(row: EnrollmentRow) -> RepositoryResult<Enrollment> {
    Ok(Enrollment {
        id: Some(EnrollmentId::new(row.enrollment_id)),
        course_id: CourseId::new(row.course_id),
        learner_id: row.learner_id,
        status: parse_enrollment_status(&row.status)?,
        progress_pct: row.progress_pct,
        enrolled_at: row.enrolled_at,
        completed_at: row.completed_at,
    })
}

fn enrollment_to_new_row(enrollment: &Enrollment) -> NewEnrollmentRow {
    NewEnrollmentRow {
        course_id: enrollment.course_id.value(),
        learner_id: enrollment.learner_id.clone(),
        status: enrollment.status.as_str().to_string(),
        progress_pct: enrollment.progress_pct,
        enrolled_at: enrollment.enrolled_at,
        completed_at: enrollment.completed_at,
    }
}

fn rows_to_program(
    row: ProgramRow,
    member_rows: Vec<ProgramCourseRow>,
) -> RepositoryResult<TrainingProgram> {
    let mut members = member_rows;
    members.sort_by_key(|m| m.position);
    Ok(TrainingProgram {
        id: Some(ProgramId::new(row.program_id)),
        code: row.code,
        title: row.title,
        description: row.description,
        course_ids: members.iter().map(|m| CourseId::new(m.course_id)).collect(),
        status: parse_lifecycle_status(&row.status)?,
        audit: row_audit(row.created_at, row.created_by, row.updated_at, row.updated_by),
    })
}

fn program_to_new_row(program: &TrainingProgram) -> NewProgramRow {
    NewProgramRow {
        code: program.code.clone(),
        title: program.title.clone(),
        description: program.description.clone(),
        status: program.status.as_str().to_string(),
        created_at: program.audit.created_at,
        created_by: program.audit.created_by.clone(),
        updated_at: program.audit.updated_at,
        updated_by: program.audit.updated_by.clone(),
    }
}

fn program_member_rows(program_id: i64, course_ids: &[CourseId]) -> Vec<ProgramCourseRow> {
    course_ids
        .iter()
        .enumerate()
        .map(|(i, course_id)| ProgramCourseRow {
            program_id,
            course_id: course_id.value(),
            position: i as i32,
        })
        .collect()
}

fn row_to_application(row: ApplicationRow) -> RepositoryResult<TrainingApplication> {
    Ok(TrainingApplication {
        id: Some(ApplicationId::new(row.application_id)),
        program_id: ProgramId::new(row.program_id),
        applicant_id: row.applicant_id,
        status: parse_application_status(&row.status)?,
        submitted_at: row.submitted_at,
        decided_by: row.decided_by,
        decision_note: row.decision_note,
    })
}

fn application_to_new_row(application: &TrainingApplication) -> NewApplicationRow {
    NewApplicationRow {
        program_id: application.program_id.value(),
        applicant_id: application.applicant_id.clone(),
        status: application.status.as_str().to_string(),
        submitted_at: application.submitted_at,
        decided_by: application.decided_by.clone(),
        decision_note: application.decision_note.clone(),
    }
}

fn row_to_certificate(row: CertificateRow) -> Certificate {
    Certificate {
        id: Some(CertificateId::new(row.certificate_id)),
        enrollment_id: EnrollmentId::new(row.enrollment_id),
        course_id: CourseId::new(row.course_id),
        learner_id: row.learner_id,
        serial: row.serial,
        verification_code: row.verification_code,
        issued_at: row.issued_at,
    }
}

fn certificate_to_new_row(certificate: &Certificate) -> NewCertificateRow {
    NewCertificateRow {
        enrollment_id: certificate.enrollment_id.value(),
        course_id: certificate.course_id.value(),
        learner_id: certificate.learner_id.clone(),
        serial: certificate.serial,
        verification_code: certificate.verification_code.clone(),
        issued_at: certificate.issued_at,
    }
}

fn load_program(conn: &mut PgConnection, id: i64) -> RepositoryResult<TrainingProgram> {
    let row: ProgramRow = training_programs::table
        .find(id)
        .select(ProgramRow::as_select())
        .first(conn)
        .optional()
        .map_err(RepositoryError::from)?
        .ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Program {} not found", id),
                ErrorContext::new("get_program").with_entity("program").with_entity_id(id),
            )
        })?;

    let members: Vec<ProgramCourseRow> = program_courses::table
        .filter(program_courses::program_id.eq(id))
        .load(conn)
        .map_err(RepositoryError::from)?;

    rows_to_program(row, members)
}

// ==================== Catalog Repository ====================

#[async_trait]
impl CatalogRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(RepositoryError::from)
        })
        .await
    }

    async fn create_course(&self, course: &Course) -> RepositoryResult<Course> {
        let new_row = course_to_new_row(course);
        self.with_conn(move |conn| {
            let row: CourseRow = diesel::insert_into(courses::table)
                .values(&new_row)
                .returning(CourseRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("create_course"))?;
            row_to_course(row)
        })
        .await
    }

    async fn get_course(&self, course_id: CourseId) -> RepositoryResult<Course> {
        let id = course_id.value();
        self.with_conn(move |conn| {
            let row: CourseRow = courses::table
                .find(id)
                .select(CourseRow::as_select())
                .first(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .ok_or_else(|| {
                    RepositoryError::not_found_with_context(
                        format!("Course {} not found", id),
                        ErrorContext::new("get_course")
                            .with_entity("course")
                            .with_entity_id(id),
                    )
                })?;
            row_to_course(row)
        })
        .await
    }

    async fn list_courses(&self, filter: &CourseFilter) -> RepositoryResult<Vec<Course>> {
        let filter = filter.clone();
        self.with_conn(move |conn| {
            // Select clause is fixed before boxing; predicates attach dynamically.
            let mut query = courses::table
                .select(CourseRow::as_select())
                .into_boxed();

            if let Some(status) = filter.status {
                query = query.filter(courses::status.eq(status.as_str()));
            }
            if let Some(ref category) = filter.category {
                query = query.filter(courses::category.ilike(category.clone()));
            }
            if let Some(ref q) = filter.q {
                let pattern = format!("%{}%", q);
                query = query.filter(
                    courses::title
                        .ilike(pattern.clone())
                        .or(courses::code.ilike(pattern)),
                );
            }
            if let Some(min) = filter.min_price {
                query = query.filter(courses::price.ge(min));
            }
            if let Some(max) = filter.max_price {
                query = query.filter(courses::price.le(max));
            }

            let rows: Vec<CourseRow> = query
                .order(courses::course_id.asc())
                .load(conn)
                .map_err(RepositoryError::from)?;

            rows.into_iter().map(row_to_course).collect()
        })
        .await
    }

    async fn update_course(&self, course: &Course) -> RepositoryResult<Course> {
        let id = course
            .id
            .ok_or_else(|| RepositoryError::validation("Cannot update a course without an id"))?
            .value();
        let course = course.clone();

        self.with_conn(move |conn| {
            let row: CourseRow = diesel::update(courses::table.find(id))
                .set((
                    courses::title.eq(&course.title),
                    courses::description.eq(&course.description),
                    courses::category.eq(&course.category),
                    courses::price.eq(course.price),
                    courses::passing_score_pct.eq(course.passing_score_pct),
                    courses::status.eq(course.status.as_str()),
                    courses::updated_at.eq(course.audit.updated_at),
                    courses::updated_by.eq(&course.audit.updated_by),
                ))
                .returning(CourseRow::as_returning())
                .get_result(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .ok_or_else(|| {
                    RepositoryError::not_found(format!("Course {} not found", id))
                })?;
            row_to_course(row)
        })
        .await
    }

    async fn delete_course(&self, course_id: CourseId) -> RepositoryResult<()> {
        let id = course_id.value();
        self.with_conn(move |conn| {
            conn.transaction::<_, RepositoryError, _>(|conn| {
                diesel::delete(lessons::table.filter(lessons::course_id.eq(id)))
                    .execute(conn)?;
                diesel::delete(quizzes::table.filter(quizzes::course_id.eq(id)))
                    .execute(conn)?;
                diesel::delete(assignments::table.filter(assignments::course_id.eq(id)))
                    .execute(conn)?;

                let deleted = diesel::delete(courses::table.find(id)).execute(conn)?;
                if deleted == 0 {
                    return Err(RepositoryError::not_found(format!(
                        "Course {} not found",
                        id
                    )));
                }
                Ok(())
            })
        })
        .await
    }

    async fn create_lesson(&self, lesson: &Lesson) -> RepositoryResult<Lesson> {
        let new_row = lesson_to_new_row(lesson);
        self.with_conn(move |conn| {
            let row: LessonRow = diesel::insert_into(lessons::table)
                .values(&new_row)
                .returning(LessonRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("create_lesson"))?;
            Ok(row_to_lesson(row))
        })
        .await
    }

    async fn get_lesson(&self, lesson_id: LessonId) -> RepositoryResult<Lesson> {
        let id = lesson_id.value();
        self.with_conn(move |conn| {
            let row: LessonRow = lessons::table
                .find(id)
                .select(LessonRow::as_select())
                .first(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .ok_or_else(|| {
                    RepositoryError::not_found(format!("Lesson {} not found", id))
                })?;
            Ok(row_to_lesson(row))
        })
        .await
    }

    async fn lessons_for_course(&self, course_id: CourseId) -> RepositoryResult<Vec<Lesson>> {
        let id = course_id.value();
        self.with_conn(move |conn| {
            // Listing for a missing course is a not-found, same as the local backend.
            let exists: i64 = courses::table
                .filter(courses::course_id.eq(id))
                .count()
                .get_result(conn)
                .map_err(RepositoryError::from)?;
            if exists == 0 {
                return Err(RepositoryError::not_found(format!(
                    "Course {} not found",
                    id
                )));
            }

            let rows: Vec<LessonRow> = lessons::table
                .filter(lessons::course_id.eq(id))
                .order((lessons::position.asc(), lessons::lesson_id.asc()))
                .select(LessonRow::as_select())
                .load(conn)
                .map_err(RepositoryError::from)?;
            Ok(rows.into_iter().map(row_to_lesson).collect())
        })
        .await
    }

    async fn update_lesson(&self, lesson: &Lesson) -> RepositoryResult<Lesson> {
        let id = lesson
            .id
            .ok_or_else(|| RepositoryError::validation("Cannot update a lesson without an id"))?
            .value();
        let lesson = lesson.clone();

        self.with_conn(move |conn| {
            let row: LessonRow = diesel::update(lessons::table.find(id))
                .set((
                    lessons::title.eq(&lesson.title),
                    lessons::content.eq(&lesson.content),
                    lessons::position.eq(lesson.position),
                    lessons::duration_minutes.eq(lesson.duration_minutes),
                    lessons::updated_at.eq(lesson.audit.updated_at),
                    lessons::updated_by.eq(&lesson.audit.updated_by),
                ))
                .returning(LessonRow::as_returning())
                .get_result(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .ok_or_else(|| {
                    RepositoryError::not_found(format!("Lesson {} not found", id))
                })?;
            Ok(row_to_lesson(row))
        })
        .await
    }

    async fn delete_lesson(&self, lesson_id: LessonId) -> RepositoryResult<()> {
        let id = lesson_id.value();
        self.with_conn(move |conn| {
            let deleted = diesel::delete(lessons::table.find(id))
                .execute(conn)
                .map_err(RepositoryError::from)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found(format!(
                    "Lesson {} not found",
                    id
                )));
            }
            Ok(())
        })
        .await
    }
}

// ==================== Assessment Repository ====================

#[async_trait]
impl AssessmentRepository for PostgresRepository {
    async fn create_quiz(&self, quiz: &Quiz) -> RepositoryResult<Quiz> {
        let new_row = quiz_to_new_row(quiz)?;
        self.with_conn(move |conn| {
            let row: QuizRow = diesel::insert_into(quizzes::table)
                .values(&new_row)
                .returning(QuizRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("create_quiz"))?;
            row_to_quiz(row)
        })
        .await
    }

    async fn get_quiz(&self, quiz_id: QuizId) -> RepositoryResult<Quiz> {
        let id = quiz_id.value();
        self.with_conn(move |conn| {
            let row: QuizRow = quizzes::table
                .find(id)
                .select(QuizRow::as_select())
                .first(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .ok_or_else(|| RepositoryError::not_found(format!("Quiz {} not found", id)))?;
            row_to_quiz(row)
        })
        .await
    }

    async fn quizzes_for_course(&self, course_id: CourseId) -> RepositoryResult<Vec<Quiz>> {
        let id = course_id.value();
        self.with_conn(move |conn| {
            let rows: Vec<QuizRow> = quizzes::table
                .filter(quizzes::course_id.eq(id))
                .order(quizzes::quiz_id.asc())
                .select(QuizRow::as_select())
                .load(conn)
                .map_err(RepositoryError::from)?;
            rows.into_iter().map(row_to_quiz).collect()
        })
        .await
    }

    async fn update_quiz(&self, quiz: &Quiz) -> RepositoryResult<Quiz> {
        let id = quiz
            .id
            .ok_or_else(|| RepositoryError::validation("Cannot update a quiz without an id"))?
            .value();
        let questions_json = to_json(&quiz.questions, "quiz questions")?;
        let quiz = quiz.clone();

        self.with_conn(move |conn| {
            let row: QuizRow = diesel::update(quizzes::table.find(id))
                .set((
                    quizzes::title.eq(&quiz.title),
                    quizzes::pass_mark_pct.eq(quiz.pass_mark_pct),
                    quizzes::questions_json.eq(&questions_json),
                    quizzes::status.eq(quiz.status.as_str()),
                    quizzes::updated_at.eq(quiz.audit.updated_at),
                    quizzes::updated_by.eq(&quiz.audit.updated_by),
                ))
                .returning(QuizRow::as_returning())
                .get_result(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .ok_or_else(|| RepositoryError::not_found(format!("Quiz {} not found", id)))?;
            row_to_quiz(row)
        })
        .await
    }

    async fn delete_quiz(&self, quiz_id: QuizId) -> RepositoryResult<()> {
        let id = quiz_id.value();
        self.with_conn(move |conn| {
            let deleted = diesel::delete(quizzes::table.find(id))
                .execute(conn)
                .map_err(RepositoryError::from)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found(format!("Quiz {} not found", id)));
            }
            Ok(())
        })
        .await
    }

    async fn create_assignment(&self, assignment: &Assignment) -> RepositoryResult<Assignment> {
        let new_row = assignment_to_new_row(assignment);
        self.with_conn(move |conn| {
            let row: AssignmentRow = diesel::insert_into(assignments::table)
                .values(&new_row)
                .returning(AssignmentRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("create_assignment"))?;
            row_to_assignment(row)
        })
        .await
    }

    async fn get_assignment(&self, assignment_id: AssignmentId) -> RepositoryResult<Assignment> {
        let id = assignment_id.value();
        self.with_conn(move |conn| {
            let row: AssignmentRow = assignments::table
                .find(id)
                .select(AssignmentRow::as_select())
                .first(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .ok_or_else(|| {
                    RepositoryError::not_found(format!("Assignment {} not found", id))
                })?;
            row_to_assignment(row)
        })
        .await
    }

    async fn assignments_for_course(
        &self,
        course_id: CourseId,
    ) -> RepositoryResult<Vec<Assignment>> {
        let id = course_id.value();
        self.with_conn(move |conn| {
            let rows: Vec<AssignmentRow> = assignments::table
                .filter(assignments::course_id.eq(id))
                .order(assignments::assignment_id.asc())
                .select(AssignmentRow::as_select())
                .load(conn)
                .map_err(RepositoryError::from)?;
            rows.into_iter().map(row_to_assignment).collect()
        })
        .await
    }

    async fn update_assignment(&self, assignment: &Assignment) -> RepositoryResult<Assignment> {
        let id = assignment
            .id
            .ok_or_else(|| {
                RepositoryError::validation("Cannot update an assignment without an id")
            })?
            .value();
        let assignment = assignment.clone();

        self.with_conn(move |conn| {
            let row: AssignmentRow = diesel::update(assignments::table.find(id))
                .set((
                    assignments::title.eq(&assignment.title),
                    assignments::instructions.eq(&assignment.instructions),
                    assignments::max_points.eq(assignment.max_points),
                    assignments::weight_pct.eq(assignment.weight_pct),
                    assignments::rubric_id.eq(assignment.rubric_id.map(|r| r.value())),
                    assignments::status.eq(assignment.status.as_str()),
                    assignments::updated_at.eq(assignment.audit.updated_at),
                    assignments::updated_by.eq(&assignment.audit.updated_by),
                ))
                .returning(AssignmentRow::as_returning())
                .get_result(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .ok_or_else(|| {
                    RepositoryError::not_found(format!("Assignment {} not found", id))
                })?;
            row_to_assignment(row)
        })
        .await
    }

    async fn delete_assignment(&self, assignment_id: AssignmentId) -> RepositoryResult<()> {
        let id = assignment_id.value();
        self.with_conn(move |conn| {
            let deleted = diesel::delete(assignments::table.find(id))
                .execute(conn)
                .map_err(RepositoryError::from)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found(format!(
                    "Assignment {} not found",
                    id
                )));
            }
            Ok(())
        })
        .await
    }

    async fn create_rubric(&self, rubric: &Rubric) -> RepositoryResult<Rubric> {
        let new_row = rubric_to_new_row(rubric)?;
        self.with_conn(move |conn| {
            let row: RubricRow = diesel::insert_into(rubrics::table)
                .values(&new_row)
                .returning(RubricRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("create_rubric"))?;
            row_to_rubric(row)
        })
        .await
    }

    async fn get_rubric(&self, rubric_id: RubricId) -> RepositoryResult<Rubric> {
        let id = rubric_id.value();
        self.with_conn(move |conn| {
            let row: RubricRow = rubrics::table
                .find(id)
                .select(RubricRow::as_select())
                .first(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .ok_or_else(|| RepositoryError::not_found(format!("Rubric {} not found", id)))?;
            row_to_rubric(row)
        })
        .await
    }

    async fn update_rubric(&self, rubric: &Rubric) -> RepositoryResult<Rubric> {
        let id = rubric
            .id
            .ok_or_else(|| RepositoryError::validation("Cannot update a rubric without an id"))?
            .value();
        let criteria_json = to_json(&rubric.criteria, "rubric criteria")?;
        let levels_json = to_json(&rubric.levels, "rubric levels")?;
        let cells_json = to_json(&rubric.cells, "rubric cells")?;
        let rubric = rubric.clone();

        self.with_conn(move |conn| {
            let row: RubricRow = diesel::update(rubrics::table.find(id))
                .set((
                    rubrics::title.eq(&rubric.title),
                    rubrics::criteria_json.eq(&criteria_json),
                    rubrics::levels_json.eq(&levels_json),
                    rubrics::cells_json.eq(&cells_json),
                    rubrics::updated_at.eq(rubric.audit.updated_at),
                    rubrics::updated_by.eq(&rubric.audit.updated_by),
                ))
                .returning(RubricRow::as_returning())
                .get_result(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .ok_or_else(|| RepositoryError::not_found(format!("Rubric {} not found", id)))?;
            row_to_rubric(row)
        })
        .await
    }

    async fn delete_rubric(&self, rubric_id: RubricId) -> RepositoryResult<()> {
        let id = rubric_id.value();
        self.with_conn(move |conn| {
            let deleted = diesel::delete(rubrics::table.find(id))
                .execute(conn)
                .map_err(RepositoryError::from)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found(format!(
                    "Rubric {} not found",
                    id
                )));
            }
            Ok(())
        })
        .await
    }
}

// ==================== Enrollment Repository ====================

#[async_trait]
impl EnrollmentRepository for PostgresRepository {
    async fn create_enrollment(&self, enrollment: &Enrollment) -> RepositoryResult<Enrollment> {
        let new_row = enrollment_to_new_row(enrollment);
        self.with_conn(move |conn| {
            // The (course_id, learner_id) unique index turns double
            // enrollments into DuplicateError via the From impl.
            let row: EnrollmentRow = diesel::insert_into(enrollments::table)
                .values(&new_row)
                .returning(EnrollmentRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("create_enrollment"))?;
            row_to_enrollment(row)
        })
        .await
    }

    async fn get_enrollment(&self, enrollment_id: EnrollmentId) -> RepositoryResult<Enrollment> {
        let id = enrollment_id.value();
        self.with_conn(move |conn| {
            let row: EnrollmentRow = enrollments::table
                .find(id)
                .select(EnrollmentRow::as_select())
                .first(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .ok_or_else(|| {
                    RepositoryError::not_found(format!("Enrollment {} not found", id))
                })?;
            row_to_enrollment(row)
        })
        .await
    }

    async fn list_enrollments(
        &self,
        filter: &EnrollmentFilter,
    ) -> RepositoryResult<Vec<Enrollment>> {
        let filter = filter.clone();
        self.with_conn(move |conn| {
            let mut query = enrollments::table
                .select(EnrollmentRow::as_select())
                .into_boxed();

            if let Some(course_id) = filter.course_id {
                query = query.filter(enrollments::course_id.eq(course_id.value()));
            }
            if let Some(ref learner_id) = filter.learner_id {
                query = query.filter(enrollments::learner_id.eq(learner_id.clone()));
            }
            if let Some(status) = filter.status {
                query = query.filter(enrollments::status.eq(status.as_str()));
            }

            let rows: Vec<EnrollmentRow> = query
                .order(enrollments::enrollment_id.asc())
                .load(conn)
                .map_err(RepositoryError::from)?;
            rows.into_iter().map(row_to_enrollment).collect()
        })
        .await
    }

    async fn update_enrollment(&self, enrollment: &Enrollment) -> RepositoryResult<Enrollment> {
        let id = enrollment
            .id
            .ok_or_else(|| {
                RepositoryError::validation("Cannot update an enrollment without an id")
            })?
            .value();
        let enrollment = enrollment.clone();

        self.with_conn(move |conn| {
            let row: EnrollmentRow = diesel::update(enrollments::table.find(id))
                .set((
                    enrollments::status.eq(enrollment.status.as_str()),
                    enrollments::progress_pct.eq(enrollment.progress_pct),
                    enrollments::completed_at.eq(enrollment.completed_at),
                ))
                .returning(EnrollmentRow::as_returning())
                .get_result(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .ok_or_else(|| {
                    RepositoryError::not_found(format!("Enrollment {} not found", id))
                })?;
            row_to_enrollment(row)
        })
        .await
    }
}

// ==================== Program Repository ====================

#[async_trait]
impl ProgramRepository for PostgresRepository {
    async fn create_program(
        &self,
        program: &TrainingProgram,
    ) -> RepositoryResult<TrainingProgram> {
        let new_row = program_to_new_row(program);
        let course_ids = program.course_ids.clone();

        self.with_conn(move |conn| {
            conn.transaction::<_, RepositoryError, _>(|conn| {
                let row: ProgramRow = diesel::insert_into(training_programs::table)
                    .values(&new_row)
                    .returning(ProgramRow::as_returning())
                    .get_result(conn)
                    .map_err(|e| RepositoryError::from(e).with_operation("create_program"))?;

                let members = program_member_rows(row.program_id, &course_ids);
                diesel::insert_into(program_courses::table)
                    .values(&members)
                    .execute(conn)?;

                rows_to_program(row, members)
            })
        })
        .await
    }

    async fn get_program(&self, program_id: ProgramId) -> RepositoryResult<TrainingProgram> {
        let id = program_id.value();
        self.with_conn(move |conn| load_program(conn, id)).await
    }

    async fn list_programs(
        &self,
        filter: &ProgramFilter,
    ) -> RepositoryResult<Vec<TrainingProgram>> {
        let filter = filter.clone();
        self.with_conn(move |conn| {
            let mut query = training_programs::table
                .select(ProgramRow::as_select())
                .into_boxed();

            if let Some(status) = filter.status {
                query = query.filter(training_programs::status.eq(status.as_str()));
            }
            if let Some(ref q) = filter.q {
                let pattern = format!("%{}%", q);
                query = query.filter(
                    training_programs::title
                        .ilike(pattern.clone())
                        .or(training_programs::code.ilike(pattern)),
                );
            }

            let rows: Vec<ProgramRow> = query
                .order(training_programs::program_id.asc())
                .load(conn)
                .map_err(RepositoryError::from)?;

            let mut programs = Vec::with_capacity(rows.len());
            for row in rows {
                let members: Vec<ProgramCourseRow> = program_courses::table
                    .filter(program_courses::program_id.eq(row.program_id))
                    .load(conn)
                    .map_err(RepositoryError::from)?;
                programs.push(rows_to_program(row, members)?);
            }
            Ok(programs)
        })
        .await
    }

    async fn update_program(
        &self,
        program: &TrainingProgram,
    ) -> RepositoryResult<TrainingProgram> {
        let id = program
            .id
            .ok_or_else(|| RepositoryError::validation("Cannot update a program without an id"))?
            .value();
        let program = program.clone();

        self.with_conn(move |conn| {
            conn.transaction::<_, RepositoryError, _>(|conn| {
                let row: ProgramRow = diesel::update(training_programs::table.find(id))
                    .set((
                        training_programs::title.eq(&program.title),
                        training_programs::description.eq(&program.description),
                        training_programs::status.eq(program.status.as_str()),
                        training_programs::updated_at.eq(program.audit.updated_at),
                        training_programs::updated_by.eq(&program.audit.updated_by),
                    ))
                    .returning(ProgramRow::as_returning())
                    .get_result(conn)
                    .optional()
                    .map_err(RepositoryError::from)?
                    .ok_or_else(|| {
                        RepositoryError::not_found(format!("Program {} not found", id))
                    })?;

                // Membership is replaced wholesale; ordering comes from the
                // position column.
                diesel::delete(
                    program_courses::table.filter(program_courses::program_id.eq(id)),
                )
                .execute(conn)?;
                let members = program_member_rows(id, &program.course_ids);
                diesel::insert_into(program_courses::table)
                    .values(&members)
                    .execute(conn)?;

                rows_to_program(row, members)
            })
        })
        .await
    }

    async fn delete_program(&self, program_id: ProgramId) -> RepositoryResult<()> {
        let id = program_id.value();
        self.with_conn(move |conn| {
            conn.transaction::<_, RepositoryError, _>(|conn| {
                diesel::delete(
                    program_courses::table.filter(program_courses::program_id.eq(id)),
                )
                .execute(conn)?;
                diesel::delete(
                    training_applications::table
                        .filter(training_applications::program_id.eq(id)),
                )
                .execute(conn)?;

                let deleted =
                    diesel::delete(training_programs::table.find(id)).execute(conn)?;
                if deleted == 0 {
                    return Err(RepositoryError::not_found(format!(
                        "Program {} not found",
                        id
                    )));
                }
                Ok(())
            })
        })
        .await
    }

    async fn create_application(
        &self,
        application: &TrainingApplication,
    ) -> RepositoryResult<TrainingApplication> {
        let new_row = application_to_new_row(application);
        self.with_conn(move |conn| {
            let row: ApplicationRow = diesel::insert_into(training_applications::table)
                .values(&new_row)
                .returning(ApplicationRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("create_application"))?;
            row_to_application(row)
        })
        .await
    }

    async fn get_application(
        &self,
        application_id: ApplicationId,
    ) -> RepositoryResult<TrainingApplication> {
        let id = application_id.value();
        self.with_conn(move |conn| {
            let row: ApplicationRow = training_applications::table
                .find(id)
                .select(ApplicationRow::as_select())
                .first(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .ok_or_else(|| {
                    RepositoryError::not_found(format!("Application {} not found", id))
                })?;
            row_to_application(row)
        })
        .await
    }

    async fn applications_for_program(
        &self,
        program_id: ProgramId,
    ) -> RepositoryResult<Vec<TrainingApplication>> {
        let id = program_id.value();
        self.with_conn(move |conn| {
            let rows: Vec<ApplicationRow> = training_applications::table
                .filter(training_applications::program_id.eq(id))
                .order(training_applications::application_id.asc())
                .select(ApplicationRow::as_select())
                .load(conn)
                .map_err(RepositoryError::from)?;
            rows.into_iter().map(row_to_application).collect()
        })
        .await
    }

    async fn update_application(
        &self,
        application: &TrainingApplication,
    ) -> RepositoryResult<TrainingApplication> {
        let id = application
            .id
            .ok_or_else(|| {
                RepositoryError::validation("Cannot update an application without an id")
            })?
            .value();
        let application = application.clone();

        self.with_conn(move |conn| {
            let row: ApplicationRow = diesel::update(training_applications::table.find(id))
                .set((
                    training_applications::status.eq(application.status.as_str()),
                    training_applications::decided_by.eq(&application.decided_by),
                    training_applications::decision_note.eq(&application.decision_note),
                ))
                .returning(ApplicationRow::as_returning())
                .get_result(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .ok_or_else(|| {
                    RepositoryError::not_found(format!("Application {} not found", id))
                })?;
            row_to_application(row)
        })
        .await
    }
}

// ==================== Certificate Repository ====================

#[async_trait]
impl CertificateRepository for PostgresRepository {
    async fn insert_certificate(
        &self,
        certificate: &Certificate,
    ) -> RepositoryResult<Certificate> {
        let new_row = certificate_to_new_row(certificate);
        self.with_conn(move |conn| {
            let row: CertificateRow = diesel::insert_into(certificates::table)
                .values(&new_row)
                .returning(CertificateRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("insert_certificate"))?;
            Ok(row_to_certificate(row))
        })
        .await
    }

    async fn get_certificate(
        &self,
        certificate_id: CertificateId,
    ) -> RepositoryResult<Certificate> {
        let id = certificate_id.value();
        self.with_conn(move |conn| {
            let row: CertificateRow = certificates::table
                .find(id)
                .select(CertificateRow::as_select())
                .first(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .ok_or_else(|| {
                    RepositoryError::not_found(format!("Certificate {} not found", id))
                })?;
            Ok(row_to_certificate(row))
        })
        .await
    }

    async fn find_certificate_by_code(
        &self,
        code: &str,
    ) -> RepositoryResult<Option<Certificate>> {
        let code = code.to_string();
        self.with_conn(move |conn| {
            let row: Option<CertificateRow> = certificates::table
                .filter(certificates::verification_code.eq(&code))
                .select(CertificateRow::as_select())
                .first(conn)
                .optional()
                .map_err(RepositoryError::from)?;
            Ok(row.map(row_to_certificate))
        })
        .await
    }

    async fn find_certificate_for_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> RepositoryResult<Option<Certificate>> {
        let id = enrollment_id.value();
        self.with_conn(move |conn| {
            let row: Option<CertificateRow> = certificates::table
                .filter(certificates::enrollment_id.eq(id))
                .select(CertificateRow::as_select())
                .first(conn)
                .optional()
                .map_err(RepositoryError::from)?;
            Ok(row.map(row_to_certificate))
        })
        .await
    }

    async fn certificates_for_learner(
        &self,
        learner_id: &str,
    ) -> RepositoryResult<Vec<Certificate>> {
        let learner_id = learner_id.to_string();
        self.with_conn(move |conn| {
            let rows: Vec<CertificateRow> = certificates::table
                .filter(certificates::learner_id.eq(&learner_id))
                .order(certificates::issued_at.asc())
                .select(CertificateRow::as_select())
                .load(conn)
                .map_err(RepositoryError::from)?;
            Ok(rows.into_iter().map(row_to_certificate).collect())
        })
        .await
    }
}
