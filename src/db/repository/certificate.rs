//! Certificate repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Certificate, CertificateId, EnrollmentId};

/// Repository trait for certificates of completion.
#[async_trait]
pub trait CertificateRepository: Send + Sync {
    /// Persist a freshly issued certificate.
    async fn insert_certificate(&self, certificate: &Certificate)
        -> RepositoryResult<Certificate>;

    /// Retrieve a certificate by ID.
    async fn get_certificate(
        &self,
        certificate_id: CertificateId,
    ) -> RepositoryResult<Certificate>;

    /// Look up a certificate by its public verification code.
    async fn find_certificate_by_code(
        &self,
        code: &str,
    ) -> RepositoryResult<Option<Certificate>>;

    /// The certificate issued for an enrollment, if any. Used to keep
    /// issuance idempotent.
    async fn find_certificate_for_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> RepositoryResult<Option<Certificate>>;

    /// All certificates earned by a learner, ordered by issue date.
    async fn certificates_for_learner(
        &self,
        learner_id: &str,
    ) -> RepositoryResult<Vec<Certificate>>;
}
