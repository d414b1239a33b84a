//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    self, assignments, certificates, courses, enrollments, lessons, programs, quizzes, rubrics,
};
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Course catalog
        .route("/courses", get(courses::list_courses))
        .route("/courses", post(courses::create_course))
        .route("/courses/{course_id}", get(courses::get_course))
        .route("/courses/{course_id}", patch(courses::update_course))
        .route("/courses/{course_id}", delete(courses::delete_course))
        .route("/courses/{course_id}/status", post(courses::transition_course))
        // Lessons
        .route("/courses/{course_id}/lessons", get(lessons::list_lessons))
        .route("/courses/{course_id}/lessons", post(lessons::create_lesson))
        .route("/lessons/{lesson_id}", get(lessons::get_lesson))
        .route("/lessons/{lesson_id}", patch(lessons::update_lesson))
        .route("/lessons/{lesson_id}", delete(lessons::delete_lesson))
        // Quizzes
        .route("/courses/{course_id}/quizzes", get(quizzes::list_quizzes))
        .route("/courses/{course_id}/quizzes", post(quizzes::create_quiz))
        .route("/quizzes/{quiz_id}", get(quizzes::get_quiz))
        .route("/quizzes/{quiz_id}", patch(quizzes::update_quiz))
        .route("/quizzes/{quiz_id}", delete(quizzes::delete_quiz))
        .route("/quizzes/{quiz_id}/status", post(quizzes::transition_quiz))
        // Assignments
        .route("/courses/{course_id}/assignments", get(assignments::list_assignments))
        .route("/courses/{course_id}/assignments", post(assignments::create_assignment))
        .route("/assignments/{assignment_id}", get(assignments::get_assignment))
        .route("/assignments/{assignment_id}", patch(assignments::update_assignment))
        .route("/assignments/{assignment_id}", delete(assignments::delete_assignment))
        // Rubrics
        .route("/rubrics", post(rubrics::create_rubric))
        .route("/rubrics/{rubric_id}", get(rubrics::get_rubric))
        .route("/rubrics/{rubric_id}", patch(rubrics::update_rubric))
        .route("/rubrics/{rubric_id}", delete(rubrics::delete_rubric))
        // Enrollments
        .route("/enrollments", get(enrollments::list_enrollments))
        .route("/enrollments", post(enrollments::enroll))
        .route("/enrollments/{enrollment_id}", get(enrollments::get_enrollment))
        .route("/enrollments/{enrollment_id}/progress", post(enrollments::update_progress))
        .route("/enrollments/{enrollment_id}/withdraw", post(enrollments::withdraw))
        // Training programs
        .route("/programs", get(programs::list_programs))
        .route("/programs", post(programs::create_program))
        .route("/programs/{program_id}", get(programs::get_program))
        .route("/programs/{program_id}", patch(programs::update_program))
        .route("/programs/{program_id}", delete(programs::delete_program))
        .route("/programs/{program_id}/status", post(programs::transition_program))
        .route("/programs/{program_id}/applications", get(programs::list_applications))
        .route("/programs/{program_id}/applications", post(programs::submit_application))
        .route("/applications/{application_id}", get(programs::get_application))
        .route("/applications/{application_id}/decision", post(programs::decide_application))
        // Certificates
        .route("/certificates", post(certificates::issue_certificate))
        .route("/certificates/{certificate_id}", get(certificates::get_certificate))
        .route("/certificates/verify/{code}", get(certificates::verify_certificate))
        .route("/learners/{learner_id}/certificates", get(certificates::list_learner_certificates));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_v1)
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new())
            as Arc<dyn crate::db::repository::FullRepository>;
        let state = AppState::new(repo);
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
