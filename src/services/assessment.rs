//! Assessment business logic: quizzes, assignments, and rubrics.
//!
//! Quiz questions are validated structurally (the correct option must
//! address an existing option). Rubric creation materializes the full
//! criteria x levels matrix and requires criterion weights to sum to 100.

use log::info;
use serde::{Deserialize, Serialize};

use super::error::{ServiceError, ServiceResult};
use crate::db::repository::FullRepository;
use crate::models::{
    Assignment, AssignmentId, AuditInfo, CourseId, LifecycleStatus, Quiz, QuizId, QuizQuestion,
    Rubric, RubricCell, RubricCriterion, RubricId, ScoringLevel,
};

/// Input for creating a quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuizInput {
    pub title: String,
    #[serde(default)]
    pub pass_mark_pct: Option<i32>,
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

/// Partial update for a quiz. A provided `questions` list replaces the
/// stored one wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateQuizInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub pass_mark_pct: Option<i32>,
    #[serde(default)]
    pub questions: Option<Vec<QuizQuestion>>,
}

/// Input for creating an assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssignmentInput {
    pub title: String,
    #[serde(default)]
    pub instructions: Option<String>,
    pub max_points: i32,
    #[serde(default)]
    pub weight_pct: Option<i32>,
    #[serde(default)]
    pub rubric_id: Option<RubricId>,
}

/// Partial update for an assignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAssignmentInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub max_points: Option<i32>,
    #[serde(default)]
    pub weight_pct: Option<i32>,
    /// `Some(None)` (an explicit null) clears the rubric reference.
    #[serde(default, deserialize_with = "double_option")]
    pub rubric_id: Option<Option<RubricId>>,
}

// Distinguishes an absent field (no change) from an explicit null (clear).
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<RubricId>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// Input for creating a rubric. Cells not listed get placeholder text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRubricInput {
    pub title: String,
    pub criteria: Vec<RubricCriterion>,
    pub levels: Vec<ScoringLevel>,
    #[serde(default)]
    pub cells: Vec<RubricCell>,
}

/// Partial update for a rubric. Changing either axis rebuilds the matrix,
/// keeping provided cell text where the coordinates still exist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRubricInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub criteria: Option<Vec<RubricCriterion>>,
    #[serde(default)]
    pub levels: Option<Vec<ScoringLevel>>,
    #[serde(default)]
    pub cells: Option<Vec<RubricCell>>,
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

fn validate_title(title: &str) -> ServiceResult<()> {
    if title.trim().is_empty() {
        return Err(ServiceError::validation("title must not be empty"));
    }
    Ok(())
}

fn validate_questions(questions: &[QuizQuestion]) -> ServiceResult<()> {
    for (i, question) in questions.iter().enumerate() {
        if question.prompt.trim().is_empty() {
            return Err(ServiceError::validation(format!(
                "question {} has an empty prompt",
                i + 1
            )));
        }
        if question.options.len() < 2 {
            return Err(ServiceError::validation(format!(
                "question {} needs at least two options",
                i + 1
            )));
        }
        if question.correct_option >= question.options.len() {
            return Err(ServiceError::validation(format!(
                "question {} marks option {} correct but only has {} options",
                i + 1,
                question.correct_option,
                question.options.len()
            )));
        }
        if question.points <= 0 {
            return Err(ServiceError::validation(format!(
                "question {} must be worth a positive number of points",
                i + 1
            )));
        }
    }
    Ok(())
}

fn validate_rubric_axes(
    criteria: &[RubricCriterion],
    levels: &[ScoringLevel],
) -> ServiceResult<()> {
    if criteria.is_empty() {
        return Err(ServiceError::validation("rubric needs at least one criterion"));
    }
    if levels.is_empty() {
        return Err(ServiceError::validation(
            "rubric needs at least one scoring level",
        ));
    }

    let total_weight: i32 = criteria.iter().map(|c| c.weight_pct).sum();
    if total_weight != 100 {
        return Err(ServiceError::validation(format!(
            "criterion weights must sum to 100, got {}",
            total_weight
        )));
    }
    for criterion in criteria {
        if criterion.name.trim().is_empty() {
            return Err(ServiceError::validation("criterion name must not be empty"));
        }
        if criterion.weight_pct <= 0 {
            return Err(ServiceError::validation(format!(
                "criterion '{}' must carry a positive weight",
                criterion.name
            )));
        }
    }
    for level in levels {
        if level.name.trim().is_empty() {
            return Err(ServiceError::validation("level name must not be empty"));
        }
        if level.points < 0 {
            return Err(ServiceError::validation(format!(
                "level '{}' must not have negative points",
                level.name
            )));
        }
    }
    Ok(())
}

// ==================== Quiz Operations ====================

/// Create a quiz in `Draft` state.
pub async fn create_quiz<R: FullRepository + ?Sized>(
    repo: &R,
    course_id: CourseId,
    input: CreateQuizInput,
    actor: &str,
) -> ServiceResult<Quiz> {
    validate_title(&input.title)?;
    let pass_mark_pct = input.pass_mark_pct.unwrap_or(50);
    validate_pct(pass_mark_pct, "pass_mark_pct")?;
    validate_questions(&input.questions)?;
    repo.get_course(course_id).await?;

    let quiz = Quiz {
        id: None,
        course_id,
        title: input.title.trim().to_string(),
        pass_mark_pct,
        questions: input.questions,
        status: LifecycleStatus::Draft,
        audit: AuditInfo::new(actor),
    };

    let stored = repo.create_quiz(&quiz).await?;
    info!(
        "Created quiz '{}' with {} questions for course {}",
        stored.title,
        stored.questions.len(),
        course_id
    );
    Ok(stored)
}

/// Retrieve a quiz by ID.
pub async fn get_quiz<R: FullRepository + ?Sized>(repo: &R, quiz_id: QuizId) -> ServiceResult<Quiz> {
    Ok(repo.get_quiz(quiz_id).await?)
}

/// All quizzes of a course.
pub async fn list_quizzes<R: FullRepository + ?Sized>(
    repo: &R,
    course_id: CourseId,
) -> ServiceResult<Vec<Quiz>> {
    repo.get_course(course_id).await?;
    Ok(repo.quizzes_for_course(course_id).await?)
}

/// Apply a partial update to a quiz.
pub async fn update_quiz<R: FullRepository + ?Sized>(
    repo: &R,
    quiz_id: QuizId,
    input: UpdateQuizInput,
    actor: &str,
) -> ServiceResult<Quiz> {
    let mut quiz = repo.get_quiz(quiz_id).await?;

    if let Some(title) = input.title {
        validate_title(&title)?;
        quiz.title = title.trim().to_string();
    }
    if let Some(pct) = input.pass_mark_pct {
        validate_pct(pct, "pass_mark_pct")?;
        quiz.pass_mark_pct = pct;
    }
    if let Some(questions) = input.questions {
        validate_questions(&questions)?;
        quiz.questions = questions;
    }

    quiz.audit.touch(actor);
    Ok(repo.update_quiz(&quiz).await?)
}

/// Delete a quiz.
pub async fn delete_quiz<R: FullRepository + ?Sized>(repo: &R, quiz_id: QuizId) -> ServiceResult<()> {
    repo.delete_quiz(quiz_id).await?;
    Ok(())
}

/// Move a quiz to `target` status.
pub async fn transition_quiz<R: FullRepository + ?Sized>(
    repo: &R,
    quiz_id: QuizId,
    target: LifecycleStatus,
    actor: &str,
) -> ServiceResult<Quiz> {
    let mut quiz = repo.get_quiz(quiz_id).await?;

    if !quiz.status.can_transition(target) {
        return Err(ServiceError::illegal_state(format!(
            "Quiz {} cannot move from {} to {}",
            quiz_id, quiz.status, target
        )));
    }
    // A quiz with no questions has nothing to grade.
    if target == LifecycleStatus::Published && quiz.questions.is_empty() {
        return Err(ServiceError::illegal_state(format!(
            "Quiz {} has no questions and cannot be published",
            quiz_id
        )));
    }

    quiz.status = target;
    quiz.audit.touch(actor);
    Ok(repo.update_quiz(&quiz).await?)
}

// ==================== Assignment Operations ====================

/// Create an assignment in `Draft` state.
pub async fn create_assignment<R: FullRepository + ?Sized>(
    repo: &R,
    course_id: CourseId,
    input: CreateAssignmentInput,
    actor: &str,
) -> ServiceResult<Assignment> {
    validate_title(&input.title)?;
    if input.max_points <= 0 {
        return Err(ServiceError::validation(format!(
            "max_points must be positive, got {}",
            input.max_points
        )));
    }
    let weight_pct = input.weight_pct.unwrap_or(0);
    validate_pct(weight_pct, "weight_pct")?;
    repo.get_course(course_id).await?;

    // A dangling rubric reference fails up front.
    if let Some(rubric_id) = input.rubric_id {
        repo.get_rubric(rubric_id).await?;
    }

    let assignment = Assignment {
        id: None,
        course_id,
        title: input.title.trim().to_string(),
        instructions: input.instructions.unwrap_or_default(),
        max_points: input.max_points,
        weight_pct,
        rubric_id: input.rubric_id,
        status: LifecycleStatus::Draft,
        audit: AuditInfo::new(actor),
    };

    Ok(repo.create_assignment(&assignment).await?)
}

/// Retrieve an assignment by ID.
pub async fn get_assignment<R: FullRepository + ?Sized>(
    repo: &R,
    assignment_id: AssignmentId,
) -> ServiceResult<Assignment> {
    Ok(repo.get_assignment(assignment_id).await?)
}

/// All assignments of a course.
pub async fn list_assignments<R: FullRepository + ?Sized>(
    repo: &R,
    course_id: CourseId,
) -> ServiceResult<Vec<Assignment>> {
    repo.get_course(course_id).await?;
    Ok(repo.assignments_for_course(course_id).await?)
}

/// Apply a partial update to an assignment.
pub async fn update_assignment<R: FullRepository + ?Sized>(
    repo: &R,
    assignment_id: AssignmentId,
    input: UpdateAssignmentInput,
    actor: &str,
) -> ServiceResult<Assignment> {
    let mut assignment = repo.get_assignment(assignment_id).await?;

    if let Some(title) = input.title {
        validate_title(&title)?;
        assignment.title = title.trim().to_string();
    }
    if let Some(instructions) = input.instructions {
        assignment.instructions = instructions;
    }
    if let Some(max_points) = input.max_points {
        if max_points <= 0 {
            return Err(ServiceError::validation(format!(
                "max_points must be positive, got {}",
                max_points
            )));
        }
        assignment.max_points = max_points;
    }
    if let Some(weight_pct) = input.weight_pct {
        validate_pct(weight_pct, "weight_pct")?;
        assignment.weight_pct = weight_pct;
    }
    if let Some(rubric_id) = input.rubric_id {
        if let Some(rubric_id) = rubric_id {
            repo.get_rubric(rubric_id).await?;
        }
        assignment.rubric_id = rubric_id;
    }

    assignment.audit.touch(actor);
    Ok(repo.update_assignment(&assignment).await?)
}

/// Delete an assignment.
pub async fn delete_assignment<R: FullRepository + ?Sized>(
    repo: &R,
    assignment_id: AssignmentId,
) -> ServiceResult<()> {
    repo.delete_assignment(assignment_id).await?;
    Ok(())
}

// ==================== Rubric Operations ====================

/// Create a rubric, materializing the full criteria x levels matrix.
pub async fn create_rubric<R: FullRepository + ?Sized>(
    repo: &R,
    input: CreateRubricInput,
    actor: &str,
) -> ServiceResult<Rubric> {
    validate_title(&input.title)?;
    validate_rubric_axes(&input.criteria, &input.levels)?;

    let cells = Rubric::build_cells(&input.criteria, &input.levels, &input.cells);

    let rubric = Rubric {
        id: None,
        title: input.title.trim().to_string(),
        criteria: input.criteria,
        levels: input.levels,
        cells,
        audit: AuditInfo::new(actor),
    };

    let stored = repo.create_rubric(&rubric).await?;
    info!(
        "Created rubric '{}' ({}x{} grid)",
        stored.title,
        stored.criteria.len(),
        stored.levels.len()
    );
    Ok(stored)
}

/// Retrieve a rubric by ID.
pub async fn get_rubric<R: FullRepository + ?Sized>(
    repo: &R,
    rubric_id: RubricId,
) -> ServiceResult<Rubric> {
    Ok(repo.get_rubric(rubric_id).await?)
}

/// Apply a partial update to a rubric, rebuilding the matrix when an axis
/// changes.
pub async fn update_rubric<R: FullRepository + ?Sized>(
    repo: &R,
    rubric_id: RubricId,
    input: UpdateRubricInput,
    actor: &str,
) -> ServiceResult<Rubric> {
    let mut rubric = repo.get_rubric(rubric_id).await?;

    if let Some(title) = input.title {
        validate_title(&title)?;
        rubric.title = title.trim().to_string();
    }

    let axes_changed = input.criteria.is_some() || input.levels.is_some();
    if let Some(criteria) = input.criteria {
        rubric.criteria = criteria;
    }
    if let Some(levels) = input.levels {
        rubric.levels = levels;
    }
    validate_rubric_axes(&rubric.criteria, &rubric.levels)?;

    if axes_changed || input.cells.is_some() {
        // Existing cell text survives where the coordinates still exist.
        let provided = input.cells.unwrap_or_else(|| rubric.cells.clone());
        rubric.cells = Rubric::build_cells(&rubric.criteria, &rubric.levels, &provided);
    }

    rubric.audit.touch(actor);
    Ok(repo.update_rubric(&rubric).await?)
}

/// Delete a rubric.
pub async fn delete_rubric<R: FullRepository + ?Sized>(
    repo: &R,
    rubric_id: RubricId,
) -> ServiceResult<()> {
    repo.delete_rubric(rubric_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::services::catalog::{create_course, CreateCourseInput};

    async fn seeded_course(repo: &LocalRepository) -> CourseId {
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
        course.id.unwrap()
    }

    fn question(prompt: &str) -> QuizQuestion {
        QuizQuestion {
            prompt: prompt.to_string(),
            options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            correct_option: 1,
            points: 5,
        }
    }

    #[tokio::test]
    async fn test_quiz_question_index_validation() {
        let repo = LocalRepository::new();
        let course_id = seeded_course(&repo).await;

        let bad = QuizQuestion {
            correct_option: 3,
            ..question("Which keyword moves ownership?")
        };
        let result = create_quiz(
            &repo,
            course_id,
            CreateQuizInput {
                title: "Ownership quiz".to_string(),
                pass_mark_pct: None,
                questions: vec![bad],
            },
            "alice",
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_empty_quiz_cannot_publish() {
        let repo = LocalRepository::new();
        let course_id = seeded_course(&repo).await;

        let quiz = create_quiz(
            &repo,
            course_id,
            CreateQuizInput {
                title: "Empty quiz".to_string(),
                pass_mark_pct: None,
                questions: vec![],
            },
            "alice",
        )
        .await
        .unwrap();
        let quiz_id = quiz.id.unwrap();

        transition_quiz(&repo, quiz_id, LifecycleStatus::InReview, "alice")
            .await
            .unwrap();
        let result =
            transition_quiz(&repo, quiz_id, LifecycleStatus::Published, "alice").await;
        assert!(matches!(result, Err(ServiceError::IllegalState(_))));
    }

    #[tokio::test]
    async fn test_assignment_requires_existing_rubric() {
        let repo = LocalRepository::new();
        let course_id = seeded_course(&repo).await;

        let result = create_assignment(
            &repo,
            course_id,
            CreateAssignmentInput {
                title: "Essay".to_string(),
                instructions: None,
                max_points: 100,
                weight_pct: Some(30),
                rubric_id: Some(RubricId::new(999)),
            },
            "alice",
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_rubric_weights_must_sum_to_100() {
        let repo = LocalRepository::new();

        let result = create_rubric(
            &repo,
            CreateRubricInput {
                title: "Essay rubric".to_string(),
                criteria: vec![
                    RubricCriterion {
                        name: "Clarity".to_string(),
                        weight_pct: 50,
                    },
                    RubricCriterion {
                        name: "Accuracy".to_string(),
                        weight_pct: 30,
                    },
                ],
                levels: vec![ScoringLevel {
                    name: "Pass".to_string(),
                    points: 1,
                }],
                cells: vec![],
            },
            "alice",
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_rubric_matrix_built_on_create() {
        let repo = LocalRepository::new();

        let rubric = create_rubric(
            &repo,
            CreateRubricInput {
                title: "Essay rubric".to_string(),
                criteria: vec![
                    RubricCriterion {
                        name: "Clarity".to_string(),
                        weight_pct: 40,
                    },
                    RubricCriterion {
                        name: "Accuracy".to_string(),
                        weight_pct: 60,
                    },
                ],
                levels: vec![
                    ScoringLevel {
                        name: "Exemplary".to_string(),
                        points: 4,
                    },
                    ScoringLevel {
                        name: "Developing".to_string(),
                        points: 1,
                    },
                ],
                cells: vec![RubricCell {
                    criterion_index: 0,
                    level_index: 0,
                    description: "Crystal clear.".to_string(),
                }],
            },
            "alice",
        )
        .await
        .unwrap();

        assert_eq!(rubric.cells.len(), 4);
        assert!(rubric
            .cells
            .iter()
            .any(|c| c.description == "Crystal clear."));
    }

    #[tokio::test]
    async fn test_quiz_partial_update_replaces_questions() {
        let repo = LocalRepository::new();
        let course_id = seeded_course(&repo).await;

        let quiz = create_quiz(
            &repo,
            course_id,
            CreateQuizInput {
                title: "Ownership quiz".to_string(),
                pass_mark_pct: Some(70),
                questions: vec![question("q1")],
            },
            "alice",
        )
        .await
        .unwrap();
        let quiz_id = quiz.id.unwrap();

        let updated = update_quiz(
            &repo,
            quiz_id,
            UpdateQuizInput {
                questions: Some(vec![question("q1"), question("q2")]),
                ..Default::default()
            },
            "bob",
        )
        .await
        .unwrap();

        assert_eq!(updated.questions.len(), 2);
        assert_eq!(updated.pass_mark_pct, 70);
        assert_eq!(updated.audit.updated_by, "bob");
    }
}
