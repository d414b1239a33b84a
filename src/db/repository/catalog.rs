//! Core catalog repository trait: courses and their lessons.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::filter::CourseFilter;
use crate::models::{Course, CourseId, Lesson, LessonId};

/// Repository trait for course catalog CRUD operations.
///
/// Creation methods receive an entity with `id: None` and return the
/// persisted copy with its generated identifier. Update methods receive a
/// fully populated entity (partial-field merging is a service-layer
/// concern) and fail with `NotFound` if the row no longer exists.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the connection is healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Course Operations ====================

    /// Persist a new course.
    ///
    /// # Returns
    /// * `Ok(Course)` - The stored course with its assigned ID
    /// * `Err(RepositoryError::DuplicateError)` - If the code is taken
    async fn create_course(&self, course: &Course) -> RepositoryResult<Course>;

    /// Retrieve a course by ID.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the course doesn't exist
    async fn get_course(&self, course_id: CourseId) -> RepositoryResult<Course>;

    /// List courses matching `filter`, ordered by ID.
    async fn list_courses(&self, filter: &CourseFilter) -> RepositoryResult<Vec<Course>>;

    /// Overwrite an existing course row.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the course doesn't exist
    async fn update_course(&self, course: &Course) -> RepositoryResult<Course>;

    /// Hard-delete a course and its dependent lessons.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the course doesn't exist
    async fn delete_course(&self, course_id: CourseId) -> RepositoryResult<()>;

    // ==================== Lesson Operations ====================

    /// Persist a new lesson under an existing course.
    async fn create_lesson(&self, lesson: &Lesson) -> RepositoryResult<Lesson>;

    /// Retrieve a lesson by ID.
    async fn get_lesson(&self, lesson_id: LessonId) -> RepositoryResult<Lesson>;

    /// All lessons of a course, ordered by position.
    async fn lessons_for_course(&self, course_id: CourseId) -> RepositoryResult<Vec<Lesson>>;

    /// Overwrite an existing lesson row.
    async fn update_lesson(&self, lesson: &Lesson) -> RepositoryResult<Lesson>;

    /// Hard-delete a lesson.
    async fn delete_lesson(&self, lesson_id: LessonId) -> RepositoryResult<()>;
}
