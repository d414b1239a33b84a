//! Assessment repository trait: quizzes, assignments, and rubrics.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{
    Assignment, AssignmentId, CourseId, Quiz, QuizId, Rubric, RubricId,
};

/// Repository trait for assessment artifacts.
///
/// Same conventions as the catalog trait: create assigns IDs, update
/// overwrites whole rows, get fails with `NotFound`.
#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    // ==================== Quiz Operations ====================

    async fn create_quiz(&self, quiz: &Quiz) -> RepositoryResult<Quiz>;

    async fn get_quiz(&self, quiz_id: QuizId) -> RepositoryResult<Quiz>;

    /// All quizzes attached to a course, ordered by ID.
    async fn quizzes_for_course(&self, course_id: CourseId) -> RepositoryResult<Vec<Quiz>>;

    async fn update_quiz(&self, quiz: &Quiz) -> RepositoryResult<Quiz>;

    async fn delete_quiz(&self, quiz_id: QuizId) -> RepositoryResult<()>;

    // ==================== Assignment Operations ====================

    async fn create_assignment(&self, assignment: &Assignment) -> RepositoryResult<Assignment>;

    async fn get_assignment(&self, assignment_id: AssignmentId) -> RepositoryResult<Assignment>;

    /// All assignments attached to a course, ordered by ID.
    async fn assignments_for_course(
        &self,
        course_id: CourseId,
    ) -> RepositoryResult<Vec<Assignment>>;

    async fn update_assignment(&self, assignment: &Assignment) -> RepositoryResult<Assignment>;

    async fn delete_assignment(&self, assignment_id: AssignmentId) -> RepositoryResult<()>;

    // ==================== Rubric Operations ====================

    async fn create_rubric(&self, rubric: &Rubric) -> RepositoryResult<Rubric>;

    async fn get_rubric(&self, rubric_id: RubricId) -> RepositoryResult<Rubric>;

    async fn update_rubric(&self, rubric: &Rubric) -> RepositoryResult<Rubric>;

    async fn delete_rubric(&self, rubric_id: RubricId) -> RepositoryResult<()>;
}
