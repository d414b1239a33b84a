//! Course catalog business logic.
//!
//! Creation applies default values and field validation before anything is
//! persisted. Updates are partial: only fields present in the input
//! overwrite the stored entity; the course code is immutable. Deletion is a
//! hard delete and is only allowed while a course is still a draft -
//! anything visible to learners is archived instead.

use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{ServiceError, ServiceResult};
use crate::db::filter::CourseFilter;
use crate::db::repository::FullRepository;
use crate::models::{AuditInfo, Course, CourseId, Lesson, LessonId, LifecycleStatus};

/// Input for creating a course. Optional fields fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseInput {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub passing_score_pct: Option<i32>,
}

/// Partial update for a course. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCourseInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub passing_score_pct: Option<i32>,
}

/// Input for creating a lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLessonInput {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    /// Defaults to the end of the course.
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
}

/// Partial update for a lesson.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLessonInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
}

fn validate_pct(value: i32, field: &str) -> ServiceResult<()> {
    if !(0..=100).contains(&value) {
        return Err(ServiceError::validation(format!(
            "{} must be between 0 and 100, got {}",
            field, value
        )));
    }
    Ok(())
}

fn validate_required(value: &str, field: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

// ==================== Course Operations ====================

/// Create a course in `Draft` state.
pub async fn create_course<R: FullRepository + ?Sized>(
    repo: &R,
    input: CreateCourseInput,
    actor: &str,
) -> ServiceResult<Course> {
    validate_required(&input.code, "code")?;
    validate_required(&input.title, "title")?;
    validate_required(actor, "actor")?;

    let price = input.price.unwrap_or(Decimal::ZERO);
    if price < Decimal::ZERO {
        return Err(ServiceError::validation(format!(
            "price must not be negative, got {}",
            price
        )));
    }

    let passing_score_pct = input.passing_score_pct.unwrap_or(60);
    validate_pct(passing_score_pct, "passing_score_pct")?;

    let category = input
        .category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| "general".to_string());

    let course = Course {
        id: None,
        code: input.code.trim().to_string(),
        title: input.title.trim().to_string(),
        description: input.description.unwrap_or_default(),
        category,
        price,
        passing_score_pct,
        status: LifecycleStatus::Draft,
        audit: AuditInfo::new(actor),
    };

    let stored = repo.create_course(&course).await?;
    info!(
        "Created course '{}' ({}) as {}",
        stored.title,
        stored.code,
        stored.id.map(|id| id.value()).unwrap_or_default()
    );
    Ok(stored)
}

/// Retrieve a course by ID.
pub async fn get_course<R: FullRepository + ?Sized>(
    repo: &R,
    course_id: CourseId,
) -> ServiceResult<Course> {
    Ok(repo.get_course(course_id).await?)
}

/// List courses matching the filter.
pub async fn list_courses<R: FullRepository + ?Sized>(
    repo: &R,
    filter: &CourseFilter,
) -> ServiceResult<Vec<Course>> {
    Ok(repo.list_courses(filter).await?)
}

/// Apply a partial update to a course. Only provided fields overwrite.
pub async fn update_course<R: FullRepository + ?Sized>(
    repo: &R,
    course_id: CourseId,
    input: UpdateCourseInput,
    actor: &str,
) -> ServiceResult<Course> {
    let mut course = repo.get_course(course_id).await?;

    if let Some(title) = input.title {
        validate_required(&title, "title")?;
        course.title = title.trim().to_string();
    }
    if let Some(description) = input.description {
        course.description = description;
    }
    if let Some(category) = input.category {
        validate_required(&category, "category")?;
        course.category = category;
    }
    if let Some(price) = input.price {
        if price < Decimal::ZERO {
            return Err(ServiceError::validation(format!(
                "price must not be negative, got {}",
                price
            )));
        }
        course.price = price;
    }
    if let Some(pct) = input.passing_score_pct {
        validate_pct(pct, "passing_score_pct")?;
        course.passing_score_pct = pct;
    }

    course.audit.touch(actor);
    Ok(repo.update_course(&course).await?)
}

/// Hard-delete a draft course.
///
/// Published material is never hard-deleted; it moves to `Archived` via the
/// status endpoint instead.
pub async fn delete_course<R: FullRepository + ?Sized>(
    repo: &R,
    course_id: CourseId,
) -> ServiceResult<()> {
    let course = repo.get_course(course_id).await?;
    if course.status != LifecycleStatus::Draft {
        return Err(ServiceError::illegal_state(format!(
            "Course {} is {}; only draft courses can be deleted",
            course_id, course.status
        )));
    }

    repo.delete_course(course_id).await?;
    info!("Deleted draft course {}", course_id);
    Ok(())
}

/// Move a course to `target` status, enforcing the lifecycle rules.
pub async fn transition_course<R: FullRepository + ?Sized>(
    repo: &R,
    course_id: CourseId,
    target: LifecycleStatus,
    actor: &str,
) -> ServiceResult<Course> {
    let mut course = repo.get_course(course_id).await?;

    if !course.status.can_transition(target) {
        return Err(ServiceError::illegal_state(format!(
            "Course {} cannot move from {} to {}",
            course_id, course.status, target
        )));
    }

    course.status = target;
    course.audit.touch(actor);
    let stored = repo.update_course(&course).await?;
    info!("Course {} is now {}", course_id, target);
    Ok(stored)
}

// ==================== Lesson Operations ====================

/// Create a lesson. Position defaults to the end of the course.
pub async fn create_lesson<R: FullRepository + ?Sized>(
    repo: &R,
    course_id: CourseId,
    input: CreateLessonInput,
    actor: &str,
) -> ServiceResult<Lesson> {
    validate_required(&input.title, "title")?;
    repo.get_course(course_id).await?;

    let position = match input.position {
        Some(p) => {
            if p < 1 {
                return Err(ServiceError::validation(format!(
                    "position must be at least 1, got {}",
                    p
                )));
            }
            p
        }
        None => {
            let existing = repo.lessons_for_course(course_id).await?;
            existing.iter().map(|l| l.position).max().unwrap_or(0) + 1
        }
    };

    let duration_minutes = input.duration_minutes.unwrap_or(0);
    if duration_minutes < 0 {
        return Err(ServiceError::validation(format!(
            "duration_minutes must not be negative, got {}",
            duration_minutes
        )));
    }

    let lesson = Lesson {
        id: None,
        course_id,
        title: input.title.trim().to_string(),
        content: input.content.unwrap_or_default(),
        position,
        duration_minutes,
        audit: AuditInfo::new(actor),
    };

    Ok(repo.create_lesson(&lesson).await?)
}

/// Retrieve a lesson by ID.
pub async fn get_lesson<R: FullRepository + ?Sized>(
    repo: &R,
    lesson_id: LessonId,
) -> ServiceResult<Lesson> {
    Ok(repo.get_lesson(lesson_id).await?)
}

/// All lessons of a course, ordered by position.
pub async fn list_lessons<R: FullRepository + ?Sized>(
    repo: &R,
    course_id: CourseId,
) -> ServiceResult<Vec<Lesson>> {
    Ok(repo.lessons_for_course(course_id).await?)
}

/// Apply a partial update to a lesson.
pub async fn update_lesson<R: FullRepository + ?Sized>(
    repo: &R,
    lesson_id: LessonId,
    input: UpdateLessonInput,
    actor: &str,
) -> ServiceResult<Lesson> {
    let mut lesson = repo.get_lesson(lesson_id).await?;

    if let Some(title) = input.title {
        validate_required(&title, "title")?;
        lesson.title = title.trim().to_string();
    }
    if let Some(content) = input.content {
        lesson.content = content;
    }
    if let Some(position) = input.position {
        if position < 1 {
            return Err(ServiceError::validation(format!(
                "position must be at least 1, got {}",
                position
            )));
        }
        lesson.position = position;
    }
    if let Some(duration) = input.duration_minutes {
        if duration < 0 {
            return Err(ServiceError::validation(format!(
                "duration_minutes must not be negative, got {}",
                duration
            )));
        }
        lesson.duration_minutes = duration;
    }

    lesson.audit.touch(actor);
    Ok(repo.update_lesson(&lesson).await?)
}

/// Delete a lesson.
pub async fn delete_lesson<R: FullRepository + ?Sized>(
    repo: &R,
    lesson_id: LessonId,
) -> ServiceResult<()> {
    repo.delete_lesson(lesson_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::RepositoryError;

    fn course_input(code: &str) -> CreateCourseInput {
        CreateCourseInput {
            code: code.to_string(),
            title: format!("Course {}", code),
            description: None,
            category: None,
            price: None,
            passing_score_pct: None,
        }
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let repo = LocalRepository::new();
        let course = create_course(&repo, course_input("RS-101"), "alice")
            .await
            .unwrap();

        assert!(course.id.is_some());
        assert_eq!(course.status, LifecycleStatus::Draft);
        assert_eq!(course.category, "general");
        assert_eq!(course.price, Decimal::ZERO);
        assert_eq!(course.passing_score_pct, 60);
        assert_eq!(course.audit.created_by, "alice");
    }

    #[tokio::test]
    async fn test_create_rejects_negative_price() {
        let repo = LocalRepository::new();
        let input = CreateCourseInput {
            price: Some(Decimal::new(-100, 2)),
            ..course_input("RS-101")
        };
        let result = create_course(&repo, input, "alice").await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_code() {
        let repo = LocalRepository::new();
        let input = CreateCourseInput {
            code: "   ".to_string(),
            ..course_input("RS-101")
        };
        let result = create_course(&repo, input, "alice").await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_unset_fields() {
        let repo = LocalRepository::new();
        let course = create_course(&repo, course_input("RS-101"), "alice")
            .await
            .unwrap();
        let id = course.id.unwrap();

        let updated = update_course(
            &repo,
            id,
            UpdateCourseInput {
                title: Some("Advanced Rust".to_string()),
                ..Default::default()
            },
            "bob",
        )
        .await
        .unwrap();

        assert_eq!(updated.title, "Advanced Rust");
        // Untouched fields survive.
        assert_eq!(updated.code, "RS-101");
        assert_eq!(updated.category, "general");
        assert_eq!(updated.audit.created_by, "alice");
        assert_eq!(updated.audit.updated_by, "bob");
    }

    #[tokio::test]
    async fn test_delete_requires_draft() {
        let repo = LocalRepository::new();
        let course = create_course(&repo, course_input("RS-101"), "alice")
            .await
            .unwrap();
        let id = course.id.unwrap();

        transition_course(&repo, id, LifecycleStatus::InReview, "alice")
            .await
            .unwrap();
        transition_course(&repo, id, LifecycleStatus::Published, "alice")
            .await
            .unwrap();

        let result = delete_course(&repo, id).await;
        assert!(matches!(result, Err(ServiceError::IllegalState(_))));
    }

    #[tokio::test]
    async fn test_delete_draft_removes_record() {
        let repo = LocalRepository::new();
        let course = create_course(&repo, course_input("RS-101"), "alice")
            .await
            .unwrap();
        let id = course.id.unwrap();

        delete_course(&repo, id).await.unwrap();
        let result = get_course(&repo, id).await;
        assert!(matches!(
            result,
            Err(ServiceError::Repository(RepositoryError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_illegal_transition_rejected() {
        let repo = LocalRepository::new();
        let course = create_course(&repo, course_input("RS-101"), "alice")
            .await
            .unwrap();
        let id = course.id.unwrap();

        // Draft cannot jump straight to Published.
        let result = transition_course(&repo, id, LifecycleStatus::Published, "alice").await;
        assert!(matches!(result, Err(ServiceError::IllegalState(_))));
    }

    #[tokio::test]
    async fn test_lesson_position_defaults_to_end() {
        let repo = LocalRepository::new();
        let course = create_course(&repo, course_input("RS-101"), "alice")
            .await
            .unwrap();
        let id = course.id.unwrap();

        let first = create_lesson(
            &repo,
            id,
            CreateLessonInput {
                title: "Ownership".to_string(),
                content: None,
                position: None,
                duration_minutes: None,
            },
            "alice",
        )
        .await
        .unwrap();
        assert_eq!(first.position, 1);

        let second = create_lesson(
            &repo,
            id,
            CreateLessonInput {
                title: "Borrowing".to_string(),
                content: None,
                position: None,
                duration_minutes: None,
            },
            "alice",
        )
        .await
        .unwrap();
        assert_eq!(second.position, 2);
    }
}
