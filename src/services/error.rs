//! Error type for the service layer.

use crate::db::repository::RepositoryError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the business-logic layer.
///
/// Storage failures pass through as [`RepositoryError`] (including
/// `NotFound` and `DuplicateError`); the two extra variants carry
/// business-rule violations that never reach the repository.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Input failed a field-presence or bounds check.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation is not allowed in the entity's current state.
    #[error("Illegal state: {0}")]
    IllegalState(String),
}

impl ServiceError {
    /// Validation helper mirroring the repository constructors.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Illegal-state helper.
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }
}
