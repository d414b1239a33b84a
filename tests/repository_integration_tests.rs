//! Integration tests exercising the repository traits end to end against
//! the in-memory backend.

use lms_rust::db::filter::{CourseFilter, EnrollmentFilter, ProgramFilter};
use lms_rust::db::repositories::LocalRepository;
use lms_rust::db::repository::*;
use lms_rust::models::*;
use rust_decimal::Decimal;

fn course(code: &str, category: &str, price: i64, status: LifecycleStatus) -> Course {
    Course {
        id: None,
        code: code.to_string(),
        title: format!("Course {}", code),
        description: String::new(),
        category: category.to_string(),
        price: Decimal::new(price, 2),
        passing_score_pct: 60,
        status,
        audit: AuditInfo::new("seed"),
    }
}

#[tokio::test]
async fn test_course_filter_combinations() {
    let repo = LocalRepository::new();

    repo.create_course(&course("RS-101", "programming", 0, LifecycleStatus::Published))
        .await
        .unwrap();
    repo.create_course(&course("RS-201", "programming", 9900, LifecycleStatus::Draft))
        .await
        .unwrap();
    repo.create_course(&course("ML-101", "data", 4900, LifecycleStatus::Published))
        .await
        .unwrap();

    // No filter returns everything in id order.
    let all = repo.list_courses(&CourseFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    let codes: Vec<&str> = all.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["RS-101", "RS-201", "ML-101"]);

    // Status + category combine conjunctively.
    let published_programming = repo
        .list_courses(&CourseFilter {
            status: Some(LifecycleStatus::Published),
            category: Some("programming".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(published_programming.len(), 1);
    assert_eq!(published_programming[0].code, "RS-101");

    // Price window.
    let priced = repo
        .list_courses(&CourseFilter {
            min_price: Some(Decimal::new(1000, 2)),
            max_price: Some(Decimal::new(5000, 2)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(priced.len(), 1);
    assert_eq!(priced[0].code, "ML-101");

    // Text search matches codes case-insensitively.
    let text = repo
        .list_courses(&CourseFilter {
            q: Some("rs-".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(text.len(), 2);
}

#[tokio::test]
async fn test_update_overwrites_row() {
    let repo = LocalRepository::new();
    let mut stored = repo
        .create_course(&course("RS-101", "programming", 0, LifecycleStatus::Draft))
        .await
        .unwrap();

    stored.title = "Renamed".to_string();
    stored.status = LifecycleStatus::InReview;
    let updated = repo.update_course(&stored).await.unwrap();
    assert_eq!(updated.title, "Renamed");

    let fetched = repo.get_course(stored.id.unwrap()).await.unwrap();
    assert_eq!(fetched.title, "Renamed");
    assert_eq!(fetched.status, LifecycleStatus::InReview);
}

#[tokio::test]
async fn test_update_missing_course_is_not_found() {
    let repo = LocalRepository::new();
    let mut ghost = course("RS-404", "programming", 0, LifecycleStatus::Draft);
    ghost.id = Some(CourseId::new(999));

    let result = repo.update_course(&ghost).await;
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
}

#[tokio::test]
async fn test_enrollment_filtering() {
    let repo = LocalRepository::new();
    let a = repo
        .create_course(&course("RS-101", "programming", 0, LifecycleStatus::Published))
        .await
        .unwrap()
        .id
        .unwrap();
    let b = repo
        .create_course(&course("ML-101", "data", 0, LifecycleStatus::Published))
        .await
        .unwrap()
        .id
        .unwrap();

    for (course_id, learner) in [(a, "lena"), (a, "marco"), (b, "lena")] {
        let enrollment = Enrollment {
            id: None,
            course_id,
            learner_id: learner.to_string(),
            status: EnrollmentStatus::Active,
            progress_pct: 0,
            enrolled_at: chrono::Utc::now(),
            completed_at: None,
        };
        repo.create_enrollment(&enrollment).await.unwrap();
    }

    let lenas = repo
        .list_enrollments(&EnrollmentFilter {
            learner_id: Some("lena".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(lenas.len(), 2);

    let course_a = repo
        .list_enrollments(&EnrollmentFilter {
            course_id: Some(a),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(course_a.len(), 2);

    let both = repo
        .list_enrollments(&EnrollmentFilter {
            course_id: Some(a),
            learner_id: Some("lena".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(both.len(), 1);
}

#[tokio::test]
async fn test_program_membership_round_trip() {
    let repo = LocalRepository::new();
    let a = repo
        .create_course(&course("RS-101", "programming", 0, LifecycleStatus::Published))
        .await
        .unwrap()
        .id
        .unwrap();
    let b = repo
        .create_course(&course("ML-101", "data", 0, LifecycleStatus::Published))
        .await
        .unwrap()
        .id
        .unwrap();

    let program = TrainingProgram {
        id: None,
        code: "TP-1".to_string(),
        title: "Full stack data".to_string(),
        description: String::new(),
        course_ids: vec![b, a],
        status: LifecycleStatus::Draft,
        audit: AuditInfo::new("seed"),
    };
    let stored = repo.create_program(&program).await.unwrap();

    let fetched = repo.get_program(stored.id.unwrap()).await.unwrap();
    // Bundle order is preserved.
    assert_eq!(fetched.course_ids, vec![b, a]);

    let filtered = repo
        .list_programs(&ProgramFilter {
            q: Some("full".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
}

#[tokio::test]
async fn test_program_delete_cascades_applications() {
    let repo = LocalRepository::new();

    let program = TrainingProgram {
        id: None,
        code: "TP-1".to_string(),
        title: "Bundle".to_string(),
        description: String::new(),
        course_ids: vec![],
        status: LifecycleStatus::Published,
        audit: AuditInfo::new("seed"),
    };
    let program_id = repo.create_program(&program).await.unwrap().id.unwrap();

    let application = TrainingApplication {
        id: None,
        program_id,
        applicant_id: "lena".to_string(),
        status: ApplicationStatus::Pending,
        submitted_at: chrono::Utc::now(),
        decided_by: None,
        decision_note: None,
    };
    let application_id = repo
        .create_application(&application)
        .await
        .unwrap()
        .id
        .unwrap();

    repo.delete_program(program_id).await.unwrap();
    let result = repo.get_application(application_id).await;
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
}
