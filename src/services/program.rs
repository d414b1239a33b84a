//! Training program business logic: bundling, publish gating, and
//! application approval.
//!
//! A program bundles existing courses. It follows the shared content
//! lifecycle, with one extra gate: moving to `Published` requires every
//! member course to be published already. Applications are decided once,
//! from `Pending`, and only against published programs.

use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};

use super::error::{ServiceError, ServiceResult};
use crate::db::filter::ProgramFilter;
use crate::db::repository::FullRepository;
use crate::models::{
    ApplicationId, ApplicationStatus, AuditInfo, CourseId, LifecycleStatus, ProgramId,
    TrainingApplication, TrainingProgram,
};

/// Input for creating a training program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProgramInput {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub course_ids: Vec<CourseId>,
}

/// Partial update for a training program. A provided `course_ids` list
/// replaces the membership wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProgramInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub course_ids: Option<Vec<CourseId>>,
}

/// Input for submitting an application to a program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyInput {
    pub applicant_id: String,
}

/// Input for deciding an application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionInput {
    pub approve: bool,
    #[serde(default)]
    pub note: Option<String>,
}

async fn validate_members<R: FullRepository + ?Sized>(
    repo: &R,
    course_ids: &[CourseId],
) -> ServiceResult<()> {
    let mut seen = std::collections::HashSet::new();
    for course_id in course_ids {
        if !seen.insert(*course_id) {
            return Err(ServiceError::validation(format!(
                "Course {} appears more than once in the bundle",
                course_id
            )));
        }
        // Missing members fail here rather than at publish time.
        repo.get_course(*course_id).await?;
    }
    Ok(())
}

// ==================== Program Operations ====================

/// Create a program in `Draft` state.
pub async fn create_program<R: FullRepository + ?Sized>(
    repo: &R,
    input: CreateProgramInput,
    actor: &str,
) -> ServiceResult<TrainingProgram> {
    if input.code.trim().is_empty() {
        return Err(ServiceError::validation("code must not be empty"));
    }
    if input.title.trim().is_empty() {
        return Err(ServiceError::validation("title must not be empty"));
    }
    validate_members(repo, &input.course_ids).await?;

    let program = TrainingProgram {
        id: None,
        code: input.code.trim().to_string(),
        title: input.title.trim().to_string(),
        description: input.description.unwrap_or_default(),
        course_ids: input.course_ids,
        status: LifecycleStatus::Draft,
        audit: AuditInfo::new(actor),
    };

    let stored = repo.create_program(&program).await?;
    info!(
        "Created program '{}' with {} member courses",
        stored.code,
        stored.course_ids.len()
    );
    Ok(stored)
}

/// Retrieve a program by ID.
pub async fn get_program<R: FullRepository + ?Sized>(
    repo: &R,
    program_id: ProgramId,
) -> ServiceResult<TrainingProgram> {
    Ok(repo.get_program(program_id).await?)
}

/// List programs matching the filter.
pub async fn list_programs<R: FullRepository + ?Sized>(
    repo: &R,
    filter: &ProgramFilter,
) -> ServiceResult<Vec<TrainingProgram>> {
    Ok(repo.list_programs(filter).await?)
}

/// Apply a partial update to a program.
pub async fn update_program<R: FullRepository + ?Sized>(
    repo: &R,
    program_id: ProgramId,
    input: UpdateProgramInput,
    actor: &str,
) -> ServiceResult<TrainingProgram> {
    let mut program = repo.get_program(program_id).await?;

    if let Some(title) = input.title {
        if title.trim().is_empty() {
            return Err(ServiceError::validation("title must not be empty"));
        }
        program.title = title.trim().to_string();
    }
    if let Some(description) = input.description {
        program.description = description;
    }
    if let Some(course_ids) = input.course_ids {
        validate_members(repo, &course_ids).await?;
        program.course_ids = course_ids;
    }

    program.audit.touch(actor);
    Ok(repo.update_program(&program).await?)
}

/// Hard-delete a draft program.
pub async fn delete_program<R: FullRepository + ?Sized>(
    repo: &R,
    program_id: ProgramId,
) -> ServiceResult<()> {
    let program = repo.get_program(program_id).await?;
    if program.status != LifecycleStatus::Draft {
        return Err(ServiceError::illegal_state(format!(
            "Program {} is {}; only draft programs can be deleted",
            program_id, program.status
        )));
    }

    repo.delete_program(program_id).await?;
    Ok(())
}

/// Check whether a program is ready to publish: at least one member course
/// and every member published. Returns the ids of unpublished members.
pub async fn publish_blockers<R: FullRepository + ?Sized>(
    repo: &R,
    program: &TrainingProgram,
) -> ServiceResult<Vec<CourseId>> {
    let mut blockers = Vec::new();
    for course_id in &program.course_ids {
        let course = repo.get_course(*course_id).await?;
        if course.status != LifecycleStatus::Published {
            blockers.push(*course_id);
        }
    }
    Ok(blockers)
}

/// Move a program to `target` status. Publishing is gated on the
/// readiness of every member course.
pub async fn transition_program<R: FullRepository + ?Sized>(
    repo: &R,
    program_id: ProgramId,
    target: LifecycleStatus,
    actor: &str,
) -> ServiceResult<TrainingProgram> {
    let mut program = repo.get_program(program_id).await?;

    if !program.status.can_transition(target) {
        return Err(ServiceError::illegal_state(format!(
            "Program {} cannot move from {} to {}",
            program_id, program.status, target
        )));
    }

    if target == LifecycleStatus::Published {
        if program.course_ids.is_empty() {
            return Err(ServiceError::illegal_state(format!(
                "Program {} has no member courses and cannot be published",
                program_id
            )));
        }
        let blockers = publish_blockers(repo, &program).await?;
        if !blockers.is_empty() {
            let ids: Vec<String> = blockers.iter().map(|id| id.to_string()).collect();
            return Err(ServiceError::illegal_state(format!(
                "Program {} cannot be published; unpublished member courses: {}",
                program_id,
                ids.join(", ")
            )));
        }
    }

    program.status = target;
    program.audit.touch(actor);
    let stored = repo.update_program(&program).await?;
    info!("Program {} is now {}", program_id, target);
    Ok(stored)
}

// ==================== Application Operations ====================

/// Submit an application to a published program.
pub async fn submit_application<R: FullRepository + ?Sized>(
    repo: &R,
    program_id: ProgramId,
    input: ApplyInput,
) -> ServiceResult<TrainingApplication> {
    if input.applicant_id.trim().is_empty() {
        return Err(ServiceError::validation("applicant_id must not be empty"));
    }

    let program = repo.get_program(program_id).await?;
    if program.status != LifecycleStatus::Published {
        return Err(ServiceError::illegal_state(format!(
            "Program {} is {}; applications are only accepted for published programs",
            program_id, program.status
        )));
    }

    let application = TrainingApplication {
        id: None,
        program_id,
        applicant_id: input.applicant_id.trim().to_string(),
        status: ApplicationStatus::Pending,
        submitted_at: Utc::now(),
        decided_by: None,
        decision_note: None,
    };

    Ok(repo.create_application(&application).await?)
}

/// Retrieve an application by ID.
pub async fn get_application<R: FullRepository + ?Sized>(
    repo: &R,
    application_id: ApplicationId,
) -> ServiceResult<TrainingApplication> {
    Ok(repo.get_application(application_id).await?)
}

/// All applications submitted against a program.
pub async fn list_applications<R: FullRepository + ?Sized>(
    repo: &R,
    program_id: ProgramId,
) -> ServiceResult<Vec<TrainingApplication>> {
    Ok(repo.applications_for_program(program_id).await?)
}

/// Approve or reject a pending application.
pub async fn decide_application<R: FullRepository + ?Sized>(
    repo: &R,
    application_id: ApplicationId,
    input: DecisionInput,
    decider: &str,
) -> ServiceResult<TrainingApplication> {
    if decider.trim().is_empty() {
        return Err(ServiceError::validation("decider must not be empty"));
    }

    let mut application = repo.get_application(application_id).await?;
    if application.status != ApplicationStatus::Pending {
        return Err(ServiceError::illegal_state(format!(
            "Application {} is already {}",
            application_id,
            application.status.as_str()
        )));
    }

    application.status = if input.approve {
        ApplicationStatus::Approved
    } else {
        ApplicationStatus::Rejected
    };
    application.decided_by = Some(decider.trim().to_string());
    application.decision_note = input.note;

    let stored = repo.update_application(&application).await?;
    info!(
        "Application {} {} by {}",
        application_id,
        stored.status.as_str(),
        decider
    );
    Ok(stored)
}
