//! Enrollment business logic.
//!
//! Learners enroll in published courses only. Progress moves between 0 and
//! 100; hitting 100 completes the enrollment and stamps the completion
//! time. Withdrawn and completed enrollments are frozen.

use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};

use super::error::{ServiceError, ServiceResult};
use crate::db::filter::EnrollmentFilter;
use crate::db::repository::FullRepository;
use crate::models::{CourseId, Enrollment, EnrollmentId, EnrollmentStatus, LifecycleStatus};

/// Input for enrolling a learner in a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollInput {
    pub course_id: CourseId,
    pub learner_id: String,
}

/// Input for a progress update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressInput {
    pub progress_pct: i32,
}

/// Enroll a learner in a published course.
pub async fn enroll<R: FullRepository + ?Sized>(
    repo: &R,
    input: EnrollInput,
) -> ServiceResult<Enrollment> {
    if input.learner_id.trim().is_empty() {
        return Err(ServiceError::validation("learner_id must not be empty"));
    }

    let course = repo.get_course(input.course_id).await?;
    if course.status != LifecycleStatus::Published {
        return Err(ServiceError::illegal_state(format!(
            "Course {} is {}; learners can only enroll in published courses",
            input.course_id, course.status
        )));
    }

    let enrollment = Enrollment {
        id: None,
        course_id: input.course_id,
        learner_id: input.learner_id.trim().to_string(),
        status: EnrollmentStatus::Active,
        progress_pct: 0,
        enrolled_at: Utc::now(),
        completed_at: None,
    };

    let stored = repo.create_enrollment(&enrollment).await?;
    info!(
        "Enrolled learner '{}' in course {} as enrollment {}",
        stored.learner_id,
        stored.course_id,
        stored.id.map(|id| id.value()).unwrap_or_default()
    );
    Ok(stored)
}

/// Retrieve an enrollment by ID.
pub async fn get_enrollment<R: FullRepository + ?Sized>(
    repo: &R,
    enrollment_id: EnrollmentId,
) -> ServiceResult<Enrollment> {
    Ok(repo.get_enrollment(enrollment_id).await?)
}

/// List enrollments matching the filter.
pub async fn list_enrollments<R: FullRepository + ?Sized>(
    repo: &R,
    filter: &EnrollmentFilter,
) -> ServiceResult<Vec<Enrollment>> {
    Ok(repo.list_enrollments(filter).await?)
}

/// Record progress on an active enrollment. Reaching 100 completes it.
pub async fn update_progress<R: FullRepository + ?Sized>(
    repo: &R,
    enrollment_id: EnrollmentId,
    input: ProgressInput,
) -> ServiceResult<Enrollment> {
    if !(0..=100).contains(&input.progress_pct) {
        return Err(ServiceError::validation(format!(
            "progress_pct must be between 0 and 100, got {}",
            input.progress_pct
        )));
    }

    let mut enrollment = repo.get_enrollment(enrollment_id).await?;
    if enrollment.status != EnrollmentStatus::Active {
        return Err(ServiceError::illegal_state(format!(
            "Enrollment {} is {}; progress can only move on active enrollments",
            enrollment_id,
            enrollment.status.as_str()
        )));
    }

    enrollment.progress_pct = input.progress_pct;
    if input.progress_pct == 100 {
        enrollment.status = EnrollmentStatus::Completed;
        enrollment.completed_at = Some(Utc::now());
        info!("Enrollment {} completed", enrollment_id);
    }

    Ok(repo.update_enrollment(&enrollment).await?)
}

/// Withdraw an active enrollment.
pub async fn withdraw<R: FullRepository + ?Sized>(
    repo: &R,
    enrollment_id: EnrollmentId,
) -> ServiceResult<Enrollment> {
    let mut enrollment = repo.get_enrollment(enrollment_id).await?;
    if enrollment.status != EnrollmentStatus::Active {
        return Err(ServiceError::illegal_state(format!(
            "Enrollment {} is {}; only active enrollments can be withdrawn",
            enrollment_id,
            enrollment.status.as_str()
        )));
    }

    enrollment.status = EnrollmentStatus::Withdrawn;
    Ok(repo.update_enrollment(&enrollment).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::RepositoryError;
    use crate::services::catalog::{create_course, transition_course, CreateCourseInput};

    async fn published_course(repo: &LocalRepository) -> CourseId {
        let course = create_course(
            repo,
            CreateCourseInput {
                code: "RS-101".to_string(),
                title: "Intro to Rust".to_string(),
                description: None,
                category: None,
                price: None,
                passing_score_pct: None,
            },
            "alice",
        )
        .await
        .unwrap();
        let id = course.id.unwrap();
        transition_course(repo, id, LifecycleStatus::InReview, "alice")
            .await
            .unwrap();
        transition_course(repo, id, LifecycleStatus::Published, "alice")
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn test_enroll_requires_published_course() {
        let repo = LocalRepository::new();
        let course = create_course(
            &repo,
            CreateCourseInput {
                code: "RS-101".to_string(),
                title: "Intro to Rust".to_string(),
                description: None,
                category: None,
                price: None,
                passing_score_pct: None,
            },
            "alice",
        )
        .await
        .unwrap();

        let result = enroll(
            &repo,
            EnrollInput {
                course_id: course.id.unwrap(),
                learner_id: "learner-1".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(ServiceError::IllegalState(_))));
    }

    #[tokio::test]
    async fn test_double_enrollment_is_duplicate() {
        let repo = LocalRepository::new();
        let course_id = published_course(&repo).await;

        let input = EnrollInput {
            course_id,
            learner_id: "learner-1".to_string(),
        };
        enroll(&repo, input.clone()).await.unwrap();

        let result = enroll(&repo, input).await;
        assert!(matches!(
            result,
            Err(ServiceError::Repository(
                RepositoryError::DuplicateError { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_full_progress_completes_enrollment() {
        let repo = LocalRepository::new();
        let course_id = published_course(&repo).await;

        let enrollment = enroll(
            &repo,
            EnrollInput {
                course_id,
                learner_id: "learner-1".to_string(),
            },
        )
        .await
        .unwrap();
        let id = enrollment.id.unwrap();

        let halfway = update_progress(&repo, id, ProgressInput { progress_pct: 50 })
            .await
            .unwrap();
        assert_eq!(halfway.status, EnrollmentStatus::Active);
        assert!(halfway.completed_at.is_none());

        let done = update_progress(&repo, id, ProgressInput { progress_pct: 100 })
            .await
            .unwrap();
        assert_eq!(done.status, EnrollmentStatus::Completed);
        assert!(done.completed_at.is_some());

        // Completed enrollments are frozen.
        let result = update_progress(&repo, id, ProgressInput { progress_pct: 10 }).await;
        assert!(matches!(result, Err(ServiceError::IllegalState(_))));
    }

    #[tokio::test]
    async fn test_progress_bounds() {
        let repo = LocalRepository::new();
        let course_id = published_course(&repo).await;

        let enrollment = enroll(
            &repo,
            EnrollInput {
                course_id,
                learner_id: "learner-1".to_string(),
            },
        )
        .await
        .unwrap();
        let id = enrollment.id.unwrap();

        let result = update_progress(&repo, id, ProgressInput { progress_pct: 101 }).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
        let result = update_progress(&repo, id, ProgressInput { progress_pct: -1 }).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_withdraw_only_active() {
        let repo = LocalRepository::new();
        let course_id = published_course(&repo).await;

        let enrollment = enroll(
            &repo,
            EnrollInput {
                course_id,
                learner_id: "learner-1".to_string(),
            },
        )
        .await
        .unwrap();
        let id = enrollment.id.unwrap();

        let withdrawn = withdraw(&repo, id).await.unwrap();
        assert_eq!(withdrawn.status, EnrollmentStatus::Withdrawn);

        let result = withdraw(&repo, id).await;
        assert!(matches!(result, Err(ServiceError::IllegalState(_))));
    }
}
