//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMap structures, providing fast, deterministic, and
//! isolated execution.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::db::filter::{CourseFilter, EnrollmentFilter, ProgramFilter};
use crate::db::repository::*;
use crate::models::{
    ApplicationId, Assignment, AssignmentId, Certificate, CertificateId, Course, CourseId,
    Enrollment, EnrollmentId, Lesson, LessonId, ProgramId, Quiz, QuizId, Rubric, RubricId,
    TrainingApplication, TrainingProgram,
};

/// In-memory local repository.
///
/// Stores every aggregate in a HashMap behind one RwLock, making it ideal
/// for unit tests and local development that need isolation and speed.
///
/// # Example
/// ```ignore
/// let repo = LocalRepository::new();
/// let stored = repo.create_course(&course).await?;
/// assert!(stored.id.is_some());
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    courses: HashMap<CourseId, Course>,
    lessons: HashMap<LessonId, Lesson>,
    quizzes: HashMap<QuizId, Quiz>,
    assignments: HashMap<AssignmentId, Assignment>,
    rubrics: HashMap<RubricId, Rubric>,
    enrollments: HashMap<EnrollmentId, Enrollment>,
    programs: HashMap<ProgramId, TrainingProgram>,
    applications: HashMap<ApplicationId, TrainingApplication>,
    certificates: HashMap<CertificateId, Certificate>,

    // One sequence for every entity; ids stay unambiguous in test fixtures.
    next_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            courses: HashMap::new(),
            lessons: HashMap::new(),
            quizzes: HashMap::new(),
            assignments: HashMap::new(),
            rubrics: HashMap::new(),
            enrollments: HashMap::new(),
            programs: HashMap::new(),
            applications: HashMap::new(),
            certificates: HashMap::new(),
            next_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn alloc_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        let mut data = self.data.write().unwrap();
        data.is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };
    }

    /// Number of courses stored.
    pub fn course_count(&self) -> usize {
        self.data.read().unwrap().courses.len()
    }

    /// Helper to check health and return an error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        let data = self.data.read().unwrap();
        if !data.is_healthy {
            return Err(RepositoryError::connection(
                "Database is not healthy".to_string(),
            ));
        }
        Ok(())
    }

    fn get_course_impl(&self, course_id: CourseId) -> RepositoryResult<Course> {
        let data = self.data.read().unwrap();
        data.courses.get(&course_id).cloned().ok_or_else(|| {
            RepositoryError::not_found(format!("Course {} not found", course_id))
        })
    }

    fn get_program_impl(&self, program_id: ProgramId) -> RepositoryResult<TrainingProgram> {
        let data = self.data.read().unwrap();
        data.programs.get(&program_id).cloned().ok_or_else(|| {
            RepositoryError::not_found(format!("Program {} not found", program_id))
        })
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read().unwrap();
        Ok(data.is_healthy)
    }

    async fn create_course(&self, course: &Course) -> RepositoryResult<Course> {
        self.check_health()?;

        let mut data = self.data.write().unwrap();
        if data
            .courses
            .values()
            .any(|c| c.code.eq_ignore_ascii_case(&course.code))
        {
            return Err(RepositoryError::duplicate(format!(
                "Course code '{}' already exists",
                course.code
            )));
        }

        let id = CourseId::new(data.alloc_id());
        let mut stored = course.clone();
        stored.id = Some(id);
        data.courses.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_course(&self, course_id: CourseId) -> RepositoryResult<Course> {
        self.get_course_impl(course_id)
    }

    async fn list_courses(&self, filter: &CourseFilter) -> RepositoryResult<Vec<Course>> {
        let data = self.data.read().unwrap();

        let mut courses: Vec<Course> = data
            .courses
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();

        courses.sort_by_key(|c| c.id);
        Ok(courses)
    }

    async fn update_course(&self, course: &Course) -> RepositoryResult<Course> {
        let id = course.id.ok_or_else(|| {
            RepositoryError::validation("Cannot update a course without an id")
        })?;

        let mut data = self.data.write().unwrap();
        if !data.courses.contains_key(&id) {
            return Err(RepositoryError::not_found(format!(
                "Course {} not found",
                id
            )));
        }
        data.courses.insert(id, course.clone());
        Ok(course.clone())
    }

    async fn delete_course(&self, course_id: CourseId) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();
        if data.courses.remove(&course_id).is_none() {
            return Err(RepositoryError::not_found(format!(
                "Course {} not found",
                course_id
            )));
        }

        // Dependent rows go with the course.
        data.lessons.retain(|_, l| l.course_id != course_id);
        data.quizzes.retain(|_, q| q.course_id != course_id);
        data.assignments.retain(|_, a| a.course_id != course_id);
        Ok(())
    }

    async fn create_lesson(&self, lesson: &Lesson) -> RepositoryResult<Lesson> {
        self.check_health()?;
        self.get_course_impl(lesson.course_id)?;

        let mut data = self.data.write().unwrap();
        let id = LessonId::new(data.alloc_id());
        let mut stored = lesson.clone();
        stored.id = Some(id);
        data.lessons.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_lesson(&self, lesson_id: LessonId) -> RepositoryResult<Lesson> {
        let data = self.data.read().unwrap();
        data.lessons.get(&lesson_id).cloned().ok_or_else(|| {
            RepositoryError::not_found(format!("Lesson {} not found", lesson_id))
        })
    }

    async fn lessons_for_course(&self, course_id: CourseId) -> RepositoryResult<Vec<Lesson>> {
        self.get_course_impl(course_id)?;

        let data = self.data.read().unwrap();
        let mut lessons: Vec<Lesson> = data
            .lessons
            .values()
            .filter(|l| l.course_id == course_id)
            .cloned()
            .collect();
        lessons.sort_by_key(|l| (l.position, l.id));
        Ok(lessons)
    }

    async fn update_lesson(&self, lesson: &Lesson) -> RepositoryResult<Lesson> {
        let id = lesson.id.ok_or_else(|| {
            RepositoryError::validation("Cannot update a lesson without an id")
        })?;

        let mut data = self.data.write().unwrap();
        if !data.lessons.contains_key(&id) {
            return Err(RepositoryError::not_found(format!(
                "Lesson {} not found",
                id
            )));
        }
        data.lessons.insert(id, lesson.clone());
        Ok(lesson.clone())
    }

    async fn delete_lesson(&self, lesson_id: LessonId) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();
        if data.lessons.remove(&lesson_id).is_none() {
            return Err(RepositoryError::not_found(format!(
                "Lesson {} not found",
                lesson_id
            )));
        }
        Ok(())
    }
}

// ==================== Assessment Repository ====================

#[async_trait]
impl AssessmentRepository for LocalRepository {
    async fn create_quiz(&self, quiz: &Quiz) -> RepositoryResult<Quiz> {
        self.check_health()?;
        self.get_course_impl(quiz.course_id)?;

        let mut data = self.data.write().unwrap();
        let id = QuizId::new(data.alloc_id());
        let mut stored = quiz.clone();
        stored.id = Some(id);
        data.quizzes.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_quiz(&self, quiz_id: QuizId) -> RepositoryResult<Quiz> {
        let data = self.data.read().unwrap();
        data.quizzes
            .get(&quiz_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Quiz {} not found", quiz_id)))
    }

    async fn quizzes_for_course(&self, course_id: CourseId) -> RepositoryResult<Vec<Quiz>> {
        self.get_course_impl(course_id)?;

        let data = self.data.read().unwrap();
        let mut quizzes: Vec<Quiz> = data
            .quizzes
            .values()
            .filter(|q| q.course_id == course_id)
            .cloned()
            .collect();
        quizzes.sort_by_key(|q| q.id);
        Ok(quizzes)
    }

    async fn update_quiz(&self, quiz: &Quiz) -> RepositoryResult<Quiz> {
        let id = quiz
            .id
            .ok_or_else(|| RepositoryError::validation("Cannot update a quiz without an id"))?;

        let mut data = self.data.write().unwrap();
        if !data.quizzes.contains_key(&id) {
            return Err(RepositoryError::not_found(format!("Quiz {} not found", id)));
        }
        data.quizzes.insert(id, quiz.clone());
        Ok(quiz.clone())
    }

    async fn delete_quiz(&self, quiz_id: QuizId) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();
        if data.quizzes.remove(&quiz_id).is_none() {
            return Err(RepositoryError::not_found(format!(
                "Quiz {} not found",
                quiz_id
            )));
        }
        Ok(())
    }

    async fn create_assignment(&self, assignment: &Assignment) -> RepositoryResult<Assignment> {
        self.check_health()?;
        self.get_course_impl(assignment.course_id)?;

        let mut data = self.data.write().unwrap();
        let id = AssignmentId::new(data.alloc_id());
        let mut stored = assignment.clone();
        stored.id = Some(id);
        data.assignments.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_assignment(&self, assignment_id: AssignmentId) -> RepositoryResult<Assignment> {
        let data = self.data.read().unwrap();
        data.assignments.get(&assignment_id).cloned().ok_or_else(|| {
            RepositoryError::not_found(format!("Assignment {} not found", assignment_id))
        })
    }

    async fn assignments_for_course(
        &self,
        course_id: CourseId,
    ) -> RepositoryResult<Vec<Assignment>> {
        self.get_course_impl(course_id)?;

        let data = self.data.read().unwrap();
        let mut assignments: Vec<Assignment> = data
            .assignments
            .values()
            .filter(|a| a.course_id == course_id)
            .cloned()
            .collect();
        assignments.sort_by_key(|a| a.id);
        Ok(assignments)
    }

    async fn update_assignment(&self, assignment: &Assignment) -> RepositoryResult<Assignment> {
        let id = assignment.id.ok_or_else(|| {
            RepositoryError::validation("Cannot update an assignment without an id")
        })?;

        let mut data = self.data.write().unwrap();
        if !data.assignments.contains_key(&id) {
            return Err(RepositoryError::not_found(format!(
                "Assignment {} not found",
                id
            )));
        }
        data.assignments.insert(id, assignment.clone());
        Ok(assignment.clone())
    }

    async fn delete_assignment(&self, assignment_id: AssignmentId) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();
        if data.assignments.remove(&assignment_id).is_none() {
            return Err(RepositoryError::not_found(format!(
                "Assignment {} not found",
                assignment_id
            )));
        }
        Ok(())
    }

    async fn create_rubric(&self, rubric: &Rubric) -> RepositoryResult<Rubric> {
        self.check_health()?;

        let mut data = self.data.write().unwrap();
        let id = RubricId::new(data.alloc_id());
        let mut stored = rubric.clone();
        stored.id = Some(id);
        data.rubrics.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_rubric(&self, rubric_id: RubricId) -> RepositoryResult<Rubric> {
        let data = self.data.read().unwrap();
        data.rubrics.get(&rubric_id).cloned().ok_or_else(|| {
            RepositoryError::not_found(format!("Rubric {} not found", rubric_id))
        })
    }

    async fn update_rubric(&self, rubric: &Rubric) -> RepositoryResult<Rubric> {
        let id = rubric
            .id
            .ok_or_else(|| RepositoryError::validation("Cannot update a rubric without an id"))?;

        let mut data = self.data.write().unwrap();
        if !data.rubrics.contains_key(&id) {
            return Err(RepositoryError::not_found(format!(
                "Rubric {} not found",
                id
            )));
        }
        data.rubrics.insert(id, rubric.clone());
        Ok(rubric.clone())
    }

    async fn delete_rubric(&self, rubric_id: RubricId) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();
        if data.rubrics.remove(&rubric_id).is_none() {
            return Err(RepositoryError::not_found(format!(
                "Rubric {} not found",
                rubric_id
            )));
        }
        Ok(())
    }
}

// ==================== Enrollment Repository ====================

#[async_trait]
impl EnrollmentRepository for LocalRepository {
    async fn create_enrollment(&self, enrollment: &Enrollment) -> RepositoryResult<Enrollment> {
        self.check_health()?;
        self.get_course_impl(enrollment.course_id)?;

        let mut data = self.data.write().unwrap();
        if data
            .enrollments
            .values()
            .any(|e| e.course_id == enrollment.course_id && e.learner_id == enrollment.learner_id)
        {
            return Err(RepositoryError::duplicate(format!(
                "Learner '{}' is already enrolled in course {}",
                enrollment.learner_id, enrollment.course_id
            )));
        }

        let id = EnrollmentId::new(data.alloc_id());
        let mut stored = enrollment.clone();
        stored.id = Some(id);
        data.enrollments.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_enrollment(&self, enrollment_id: EnrollmentId) -> RepositoryResult<Enrollment> {
        let data = self.data.read().unwrap();
        data.enrollments.get(&enrollment_id).cloned().ok_or_else(|| {
            RepositoryError::not_found(format!("Enrollment {} not found", enrollment_id))
        })
    }

    async fn list_enrollments(
        &self,
        filter: &EnrollmentFilter,
    ) -> RepositoryResult<Vec<Enrollment>> {
        let data = self.data.read().unwrap();

        let mut enrollments: Vec<Enrollment> = data
            .enrollments
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        enrollments.sort_by_key(|e| e.id);
        Ok(enrollments)
    }

    async fn update_enrollment(&self, enrollment: &Enrollment) -> RepositoryResult<Enrollment> {
        let id = enrollment.id.ok_or_else(|| {
            RepositoryError::validation("Cannot update an enrollment without an id")
        })?;

        let mut data = self.data.write().unwrap();
        if !data.enrollments.contains_key(&id) {
            return Err(RepositoryError::not_found(format!(
                "Enrollment {} not found",
                id
            )));
        }
        data.enrollments.insert(id, enrollment.clone());
        Ok(enrollment.clone())
    }
}

// ==================== Program Repository ====================

#[async_trait]
impl ProgramRepository for LocalRepository {
    async fn create_program(
        &self,
        program: &TrainingProgram,
    ) -> RepositoryResult<TrainingProgram> {
        self.check_health()?;

        let mut data = self.data.write().unwrap();
        if data
            .programs
            .values()
            .any(|p| p.code.eq_ignore_ascii_case(&program.code))
        {
            return Err(RepositoryError::duplicate(format!(
                "Program code '{}' already exists",
                program.code
            )));
        }

        let id = ProgramId::new(data.alloc_id());
        let mut stored = program.clone();
        stored.id = Some(id);
        data.programs.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_program(&self, program_id: ProgramId) -> RepositoryResult<TrainingProgram> {
        self.get_program_impl(program_id)
    }

    async fn list_programs(
        &self,
        filter: &ProgramFilter,
    ) -> RepositoryResult<Vec<TrainingProgram>> {
        let data = self.data.read().unwrap();

        let mut programs: Vec<TrainingProgram> = data
            .programs
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        programs.sort_by_key(|p| p.id);
        Ok(programs)
    }

    async fn update_program(
        &self,
        program: &TrainingProgram,
    ) -> RepositoryResult<TrainingProgram> {
        let id = program.id.ok_or_else(|| {
            RepositoryError::validation("Cannot update a program without an id")
        })?;

        let mut data = self.data.write().unwrap();
        if !data.programs.contains_key(&id) {
            return Err(RepositoryError::not_found(format!(
                "Program {} not found",
                id
            )));
        }
        data.programs.insert(id, program.clone());
        Ok(program.clone())
    }

    async fn delete_program(&self, program_id: ProgramId) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();
        if data.programs.remove(&program_id).is_none() {
            return Err(RepositoryError::not_found(format!(
                "Program {} not found",
                program_id
            )));
        }
        data.applications.retain(|_, a| a.program_id != program_id);
        Ok(())
    }

    async fn create_application(
        &self,
        application: &TrainingApplication,
    ) -> RepositoryResult<TrainingApplication> {
        self.check_health()?;
        self.get_program_impl(application.program_id)?;

        let mut data = self.data.write().unwrap();
        let id = ApplicationId::new(data.alloc_id());
        let mut stored = application.clone();
        stored.id = Some(id);
        data.applications.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_application(
        &self,
        application_id: ApplicationId,
    ) -> RepositoryResult<TrainingApplication> {
        let data = self.data.read().unwrap();
        data.applications.get(&application_id).cloned().ok_or_else(|| {
            RepositoryError::not_found(format!("Application {} not found", application_id))
        })
    }

    async fn applications_for_program(
        &self,
        program_id: ProgramId,
    ) -> RepositoryResult<Vec<TrainingApplication>> {
        self.get_program_impl(program_id)?;

        let data = self.data.read().unwrap();
        let mut applications: Vec<TrainingApplication> = data
            .applications
            .values()
            .filter(|a| a.program_id == program_id)
            .cloned()
            .collect();
        applications.sort_by_key(|a| a.id);
        Ok(applications)
    }

    async fn update_application(
        &self,
        application: &TrainingApplication,
    ) -> RepositoryResult<TrainingApplication> {
        let id = application.id.ok_or_else(|| {
            RepositoryError::validation("Cannot update an application without an id")
        })?;

        let mut data = self.data.write().unwrap();
        if !data.applications.contains_key(&id) {
            return Err(RepositoryError::not_found(format!(
                "Application {} not found",
                id
            )));
        }
        data.applications.insert(id, application.clone());
        Ok(application.clone())
    }
}

// ==================== Certificate Repository ====================

#[async_trait]
impl CertificateRepository for LocalRepository {
    async fn insert_certificate(
        &self,
        certificate: &Certificate,
    ) -> RepositoryResult<Certificate> {
        self.check_health()?;

        let mut data = self.data.write().unwrap();
        let id = CertificateId::new(data.alloc_id());
        let mut stored = certificate.clone();
        stored.id = Some(id);
        data.certificates.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_certificate(
        &self,
        certificate_id: CertificateId,
    ) -> RepositoryResult<Certificate> {
        let data = self.data.read().unwrap();
        data.certificates.get(&certificate_id).cloned().ok_or_else(|| {
            RepositoryError::not_found(format!("Certificate {} not found", certificate_id))
        })
    }

    async fn find_certificate_by_code(
        &self,
        code: &str,
    ) -> RepositoryResult<Option<Certificate>> {
        let data = self.data.read().unwrap();
        Ok(data
            .certificates
            .values()
            .find(|c| c.verification_code == code)
            .cloned())
    }

    async fn find_certificate_for_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> RepositoryResult<Option<Certificate>> {
        let data = self.data.read().unwrap();
        Ok(data
            .certificates
            .values()
            .find(|c| c.enrollment_id == enrollment_id)
            .cloned())
    }

    async fn certificates_for_learner(
        &self,
        learner_id: &str,
    ) -> RepositoryResult<Vec<Certificate>> {
        let data = self.data.read().unwrap();
        let mut certificates: Vec<Certificate> = data
            .certificates
            .values()
            .filter(|c| c.learner_id == learner_id)
            .cloned()
            .collect();
        certificates.sort_by_key(|c| c.issued_at);
        Ok(certificates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuditInfo, EnrollmentStatus, LifecycleStatus};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn course(code: &str) -> Course {
        Course {
            id: None,
            code: code.to_string(),
            title: format!("Course {}", code),
            description: String::new(),
            category: "general".to_string(),
            price: Decimal::ZERO,
            passing_score_pct: 60,
            status: LifecycleStatus::Draft,
            audit: AuditInfo::new("tester"),
        }
    }

    fn enrollment(course_id: CourseId, learner: &str) -> Enrollment {
        Enrollment {
            id: None,
            course_id,
            learner_id: learner.to_string(),
            status: EnrollmentStatus::Active,
            progress_pct: 0,
            enrolled_at: Utc::now(),
            completed_at: None,
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());

        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_create_and_get_course() {
        let repo = LocalRepository::new();

        let stored = repo.create_course(&course("RS-101")).await.unwrap();
        let id = stored.id.unwrap();

        let retrieved = repo.get_course(id).await.unwrap();
        assert_eq!(retrieved.code, "RS-101");
        assert_eq!(retrieved.id, Some(id));
    }

    #[tokio::test]
    async fn test_duplicate_course_code() {
        let repo = LocalRepository::new();
        repo.create_course(&course("RS-101")).await.unwrap();

        let result = repo.create_course(&course("rs-101")).await;
        assert!(matches!(
            result,
            Err(RepositoryError::DuplicateError { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_missing_course_is_not_found() {
        let repo = LocalRepository::new();
        let result = repo.get_course(CourseId::new(999)).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_course_cascades_lessons() {
        let repo = LocalRepository::new();
        let stored = repo.create_course(&course("RS-101")).await.unwrap();
        let course_id = stored.id.unwrap();

        let lesson = Lesson {
            id: None,
            course_id,
            title: "Ownership".to_string(),
            content: String::new(),
            position: 1,
            duration_minutes: 30,
            audit: AuditInfo::new("tester"),
        };
        let stored_lesson = repo.create_lesson(&lesson).await.unwrap();

        repo.delete_course(course_id).await.unwrap();
        let result = repo.get_lesson(stored_lesson.id.unwrap()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_lessons_ordered_by_position() {
        let repo = LocalRepository::new();
        let stored = repo.create_course(&course("RS-101")).await.unwrap();
        let course_id = stored.id.unwrap();

        for (title, position) in [("Third", 3), ("First", 1), ("Second", 2)] {
            let lesson = Lesson {
                id: None,
                course_id,
                title: title.to_string(),
                content: String::new(),
                position,
                duration_minutes: 10,
                audit: AuditInfo::new("tester"),
            };
            repo.create_lesson(&lesson).await.unwrap();
        }

        let lessons = repo.lessons_for_course(course_id).await.unwrap();
        let titles: Vec<&str> = lessons.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_duplicate_enrollment_rejected() {
        let repo = LocalRepository::new();
        let stored = repo.create_course(&course("RS-101")).await.unwrap();
        let course_id = stored.id.unwrap();

        repo.create_enrollment(&enrollment(course_id, "learner-1"))
            .await
            .unwrap();
        let result = repo
            .create_enrollment(&enrollment(course_id, "learner-1"))
            .await;
        assert!(matches!(
            result,
            Err(RepositoryError::DuplicateError { .. })
        ));

        // A different learner is fine.
        repo.create_enrollment(&enrollment(course_id, "learner-2"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_certificate_lookup_by_code() {
        let repo = LocalRepository::new();

        let certificate = Certificate {
            id: None,
            enrollment_id: EnrollmentId::new(7),
            course_id: CourseId::new(1),
            learner_id: "learner-1".to_string(),
            serial: uuid::Uuid::new_v4(),
            verification_code: "abc123".to_string(),
            issued_at: Utc::now(),
        };
        repo.insert_certificate(&certificate).await.unwrap();

        let found = repo.find_certificate_by_code("abc123").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().learner_id, "learner-1");

        let missing = repo.find_certificate_by_code("nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_unhealthy_repository_rejects_writes() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);

        let result = repo.create_course(&course("RS-101")).await;
        assert!(matches!(
            result,
            Err(RepositoryError::ConnectionError { .. })
        ));
    }
}
