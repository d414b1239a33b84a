//! Training program repository trait: bundles and applications.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::filter::ProgramFilter;
use crate::models::{
    ApplicationId, ProgramId, TrainingApplication, TrainingProgram,
};

/// Repository trait for training programs and their applications.
#[async_trait]
pub trait ProgramRepository: Send + Sync {
    // ==================== Program Operations ====================

    /// Persist a new program.
    ///
    /// # Returns
    /// * `Err(RepositoryError::DuplicateError)` - If the code is taken
    async fn create_program(&self, program: &TrainingProgram)
        -> RepositoryResult<TrainingProgram>;

    async fn get_program(&self, program_id: ProgramId) -> RepositoryResult<TrainingProgram>;

    /// List programs matching `filter`, ordered by ID.
    async fn list_programs(
        &self,
        filter: &ProgramFilter,
    ) -> RepositoryResult<Vec<TrainingProgram>>;

    async fn update_program(&self, program: &TrainingProgram)
        -> RepositoryResult<TrainingProgram>;

    /// Hard-delete a program and its applications.
    async fn delete_program(&self, program_id: ProgramId) -> RepositoryResult<()>;

    // ==================== Application Operations ====================

    async fn create_application(
        &self,
        application: &TrainingApplication,
    ) -> RepositoryResult<TrainingApplication>;

    async fn get_application(
        &self,
        application_id: ApplicationId,
    ) -> RepositoryResult<TrainingApplication>;

    /// All applications submitted against a program, ordered by ID.
    async fn applications_for_program(
        &self,
        program_id: ProgramId,
    ) -> RepositoryResult<Vec<TrainingApplication>>;

    async fn update_application(
        &self,
        application: &TrainingApplication,
    ) -> RepositoryResult<TrainingApplication>;
}
