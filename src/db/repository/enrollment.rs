//! Enrollment repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::filter::EnrollmentFilter;
use crate::models::{Enrollment, EnrollmentId};

/// Repository trait for learner enrollments.
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Persist a new enrollment.
    ///
    /// # Returns
    /// * `Err(RepositoryError::DuplicateError)` - If the learner is already
    ///   enrolled in the course
    async fn create_enrollment(&self, enrollment: &Enrollment) -> RepositoryResult<Enrollment>;

    /// Retrieve an enrollment by ID.
    async fn get_enrollment(&self, enrollment_id: EnrollmentId) -> RepositoryResult<Enrollment>;

    /// List enrollments matching `filter`, ordered by ID.
    async fn list_enrollments(
        &self,
        filter: &EnrollmentFilter,
    ) -> RepositoryResult<Vec<Enrollment>>;

    /// Overwrite an existing enrollment row.
    async fn update_enrollment(&self, enrollment: &Enrollment) -> RepositoryResult<Enrollment>;
}
