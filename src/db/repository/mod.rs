//! Repository trait definitions for database operations.
//!
//! This module provides a collection of focused repository traits that
//! abstract database operations. By splitting responsibilities per
//! aggregate, implementations can be more focused and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`catalog`]: Courses and lessons
//! - [`assessment`]: Quizzes, assignments, and rubrics
//! - [`enrollment`]: Learner enrollments
//! - [`program`]: Training programs and applications
//! - [`certificate`]: Certificates of completion
//!
//! # Convenience Trait Bound
//!
//! For functions that need the whole surface, use the [`FullRepository`]
//! bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository>(repo: &R) -> RepositoryResult<()> {
//!     let course = repo.get_course(course_id).await?;
//!     repo.create_enrollment(&enrollment).await?;
//!     Ok(())
//! }
//! ```

pub mod assessment;
pub mod catalog;
pub mod certificate;
pub mod enrollment;
pub mod error;
pub mod program;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use assessment::AssessmentRepository;
pub use catalog::CatalogRepository;
pub use certificate::CertificateRepository;
pub use enrollment::EnrollmentRepository;
pub use program::ProgramRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements all five
/// aggregate traits. Use this as the bound when a service needs access to
/// the full repository surface.
pub trait FullRepository:
    CatalogRepository
    + AssessmentRepository
    + EnrollmentRepository
    + ProgramRepository
    + CertificateRepository
{
}

// Blanket implementation: implementing the five aggregate traits yields FullRepository
impl<T> FullRepository for T where
    T: CatalogRepository
        + AssessmentRepository
        + EnrollmentRepository
        + ProgramRepository
        + CertificateRepository
{
}
