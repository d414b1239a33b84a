//! Integration tests for the full content workflows: authoring, review,
//! publication, enrollment, completion, and certification.

use lms_rust::db::repositories::LocalRepository;
use lms_rust::models::*;
use lms_rust::services::{
    assessment, catalog, certificate, enrollment, program, ServiceError,
};

async fn author_course(repo: &LocalRepository, code: &str) -> CourseId {
    let course = catalog::create_course(
        repo,
        catalog::CreateCourseInput {
            code: code.to_string(),
            title: format!("Course {}", code),
            description: Some("A worked example.".to_string()),
            category: Some("programming".to_string()),
            price: None,
            passing_score_pct: Some(70),
        },
        "ina",
    )
    .await
    .unwrap();
    course.id.unwrap()
}

async fn publish_course(repo: &LocalRepository, course_id: CourseId) {
    catalog::transition_course(repo, course_id, LifecycleStatus::InReview, "ina")
        .await
        .unwrap();
    catalog::transition_course(repo, course_id, LifecycleStatus::Published, "rhea")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_full_course_lifecycle() {
    let repo = LocalRepository::new();
    let course_id = author_course(&repo, "RS-101").await;

    // Author content while in draft.
    catalog::create_lesson(
        &repo,
        course_id,
        catalog::CreateLessonInput {
            title: "Ownership".to_string(),
            content: Some("Moves and borrows.".to_string()),
            position: None,
            duration_minutes: Some(25),
        },
        "ina",
    )
    .await
    .unwrap();

    // Review round-trip: reviewer sends it back, author resubmits.
    catalog::transition_course(&repo, course_id, LifecycleStatus::InReview, "ina")
        .await
        .unwrap();
    catalog::transition_course(&repo, course_id, LifecycleStatus::Draft, "rhea")
        .await
        .unwrap();
    catalog::transition_course(&repo, course_id, LifecycleStatus::InReview, "ina")
        .await
        .unwrap();
    let published =
        catalog::transition_course(&repo, course_id, LifecycleStatus::Published, "rhea")
            .await
            .unwrap();
    assert_eq!(published.status, LifecycleStatus::Published);
    assert_eq!(published.audit.updated_by, "rhea");
    assert_eq!(published.audit.created_by, "ina");

    // Retire it.
    let archived =
        catalog::transition_course(&repo, course_id, LifecycleStatus::Archived, "rhea")
            .await
            .unwrap();
    assert_eq!(archived.status, LifecycleStatus::Archived);
}

#[tokio::test]
async fn test_enrollment_to_certificate_flow() {
    let repo = LocalRepository::new();
    let course_id = author_course(&repo, "RS-101").await;
    publish_course(&repo, course_id).await;

    let enrolled = enrollment::enroll(
        &repo,
        enrollment::EnrollInput {
            course_id,
            learner_id: "lena".to_string(),
        },
    )
    .await
    .unwrap();
    let enrollment_id = enrolled.id.unwrap();

    // No certificate before completion.
    let early = certificate::issue(&repo, enrollment_id).await;
    assert!(matches!(early, Err(ServiceError::IllegalState(_))));

    enrollment::update_progress(
        &repo,
        enrollment_id,
        enrollment::ProgressInput { progress_pct: 100 },
    )
    .await
    .unwrap();

    let issued = certificate::issue(&repo, enrollment_id).await.unwrap();
    assert_eq!(issued.learner_id, "lena");
    assert_eq!(issued.course_id, course_id);

    // Verification round trip and learner listing.
    let verified = certificate::verify(&repo, &issued.verification_code)
        .await
        .unwrap();
    assert_eq!(verified.serial, issued.serial);

    let mine = certificate::list_for_learner(&repo, "lena").await.unwrap();
    assert_eq!(mine.len(), 1);
}

#[tokio::test]
async fn test_program_bundle_workflow() {
    let repo = LocalRepository::new();
    let first = author_course(&repo, "RS-101").await;
    let second = author_course(&repo, "RS-201").await;
    publish_course(&repo, first).await;

    let program = program::create_program(
        &repo,
        program::CreateProgramInput {
            code: "TP-RUST".to_string(),
            title: "Rust track".to_string(),
            description: None,
            course_ids: vec![first, second],
        },
        "ina",
    )
    .await
    .unwrap();
    let program_id = program.id.unwrap();

    program::transition_program(&repo, program_id, LifecycleStatus::InReview, "ina")
        .await
        .unwrap();

    // Blocked: RS-201 is still a draft.
    let blocked =
        program::transition_program(&repo, program_id, LifecycleStatus::Published, "rhea")
            .await;
    assert!(matches!(blocked, Err(ServiceError::IllegalState(_))));

    publish_course(&repo, second).await;
    program::transition_program(&repo, program_id, LifecycleStatus::Published, "rhea")
        .await
        .unwrap();

    // Applications now flow.
    let application = program::submit_application(
        &repo,
        program_id,
        program::ApplyInput {
            applicant_id: "marco".to_string(),
        },
    )
    .await
    .unwrap();

    let decided = program::decide_application(
        &repo,
        application.id.unwrap(),
        program::DecisionInput {
            approve: true,
            note: None,
        },
        "rhea",
    )
    .await
    .unwrap();
    assert_eq!(decided.status, ApplicationStatus::Approved);

    let listed = program::list_applications(&repo, program_id).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_assessment_workflow() {
    let repo = LocalRepository::new();
    let course_id = author_course(&repo, "RS-101").await;

    let rubric = assessment::create_rubric(
        &repo,
        assessment::CreateRubricInput {
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
                    name: "Proficient".to_string(),
                    points: 3,
                },
                ScoringLevel {
                    name: "Developing".to_string(),
                    points: 1,
                },
            ],
            cells: vec![],
        },
        "ina",
    )
    .await
    .unwrap();
    assert_eq!(rubric.cells.len(), 6);

    let assignment = assessment::create_assignment(
        &repo,
        course_id,
        assessment::CreateAssignmentInput {
            title: "Final essay".to_string(),
            instructions: Some("Write about lifetimes.".to_string()),
            max_points: 100,
            weight_pct: Some(40),
            rubric_id: rubric.id,
        },
        "ina",
    )
    .await
    .unwrap();
    assert_eq!(assignment.rubric_id, rubric.id);

    let quiz = assessment::create_quiz(
        &repo,
        course_id,
        assessment::CreateQuizInput {
            title: "Ownership check".to_string(),
            pass_mark_pct: Some(70),
            questions: vec![QuizQuestion {
                prompt: "Which call moves its argument?".to_string(),
                options: vec!["foo(&x)".to_string(), "foo(x)".to_string()],
                correct_option: 1,
                points: 10,
            }],
        },
        "ina",
    )
    .await
    .unwrap();
    let quiz_id = quiz.id.unwrap();

    assessment::transition_quiz(&repo, quiz_id, LifecycleStatus::InReview, "ina")
        .await
        .unwrap();
    let published =
        assessment::transition_quiz(&repo, quiz_id, LifecycleStatus::Published, "rhea")
            .await
            .unwrap();
    assert_eq!(published.status, LifecycleStatus::Published);

    let quizzes = assessment::list_quizzes(&repo, course_id).await.unwrap();
    let assignments = assessment::list_assignments(&repo, course_id).await.unwrap();
    assert_eq!(quizzes.len(), 1);
    assert_eq!(assignments.len(), 1);
}
