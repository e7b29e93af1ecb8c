use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{AssignmentService, load_assignment};
use crate::models::assignments::entities::{AssignmentStatus, SubmissionStatus};
use crate::models::assignments::requests::SubmitAssignmentRequest;
use crate::models::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{
    conflict, current_user, forbidden, not_found, require_permission, storage_error, try_respond,
};

pub async fn list_submissions(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    try_respond!(require_permission(&actor, Permission::ManageAssignments));

    let storage = service.get_storage(request);
    let assignment = try_respond!(load_assignment(&storage, &actor, assignment_id).await);

    match storage.list_submissions(assignment.id).await {
        Ok(submissions) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            submissions,
            "Submissions retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list submissions", e)),
    }
}

/// 学生提交作业
///
/// 作业必须处于 published；截止后提交标记为 late。已评分的提交不能再覆盖。
pub async fn submit_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    submission_data: SubmitAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    try_respond!(require_permission(&actor, Permission::SubmitAssignments));

    let storage = service.get_storage(request);
    let student = match storage.get_student_by_user_id(actor.id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(forbidden("No student record is linked to this account")),
        Err(e) => return Ok(storage_error("Failed to load student record", e)),
    };

    let assignment = try_respond!(load_assignment(&storage, &actor, assignment_id).await);
    if assignment.school_id != student.school_id {
        return Ok(not_found(ErrorCode::AssignmentNotFound, "Assignment not found"));
    }
    if assignment.status != AssignmentStatus::Published {
        return Ok(conflict(
            ErrorCode::AssignmentNotOpen,
            format!("Assignment is {} and no longer accepts submissions", assignment.status),
        ));
    }

    match storage
        .active_student_ids_in_class(assignment.class_id, assignment.section_id)
        .await
    {
        Ok(roster) if roster.contains(&student.id) => {}
        Ok(_) => {
            warn!(
                "Student {} tried to submit assignment {} outside their class",
                student.id, assignment.id
            );
            return Ok(forbidden("Student is not enrolled in the assignment's class"));
        }
        Err(e) => return Ok(storage_error("Failed to load class roster", e)),
    }

    let existing = match storage.find_submission(assignment.id, student.id).await {
        Ok(existing) => existing,
        Err(e) => return Ok(storage_error("Failed to load submission", e)),
    };
    if let Some(previous) = &existing
        && previous.status == SubmissionStatus::Graded
    {
        return Ok(conflict(
            ErrorCode::SubmissionAlreadyGraded,
            "Submission has already been graded",
        ));
    }

    let status = SubmissionStatus::for_submission_time(chrono::Utc::now(), assignment.due_at);
    match storage
        .upsert_submission(assignment.id, student.id, submission_data, status)
        .await
    {
        Ok(submission) => {
            info!(
                "Student {} submitted assignment {} ({})",
                student.id, assignment.id, submission.status
            );
            AuditEntry::new("submission.submit", "submission")
                .entity(submission.id)
                .school(Some(assignment.school_id))
                .details(serde_json::json!({
                    "assignment_id": assignment.id,
                    "status": submission.status,
                    "resubmitted": existing.is_some(),
                }))
                .record(&storage, &actor, request)
                .await;
            if existing.is_some() {
                Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "Submission updated")))
            } else {
                Ok(HttpResponse::Created()
                    .json(ApiResponse::success(submission, "Assignment submitted")))
            }
        }
        Err(e) => Ok(storage_error("Failed to submit assignment", e)),
    }
}
