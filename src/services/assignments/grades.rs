use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::AssignmentService;
use crate::models::assignments::entities::{Assignment, Submission, validate_score};
use crate::models::assignments::requests::GradeSubmissionRequest;
use crate::models::permissions::{Permission, has_permission};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{
    bad_request, current_user, forbidden, not_found, require_permission, scoped_entity,
    storage_error, try_respond,
};
use crate::storage::Storage;

// 提交记录及其所属作业，校区由作业决定
async fn load_submission(
    storage: &Arc<dyn Storage>,
    actor: &User,
    submission_id: i64,
) -> Result<(Submission, Assignment), HttpResponse> {
    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => return Err(not_found(ErrorCode::SubmissionNotFound, "Submission not found")),
        Err(e) => return Err(storage_error("Failed to load submission", e)),
    };
    let assignment = scoped_entity(
        actor,
        storage.get_assignment_by_id(submission.assignment_id).await,
        |a: &Assignment| a.school_id,
        ErrorCode::SubmissionNotFound,
        "Submission",
    )?;
    Ok((submission, assignment))
}

pub async fn grade_submission(
    service: &AssignmentService,
    request: &HttpRequest,
    submission_id: i64,
    grade_data: GradeSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    try_respond!(require_permission(&actor, Permission::GradeSubmissions));

    let storage = service.get_storage(request);
    let (submission, assignment) =
        try_respond!(load_submission(&storage, &actor, submission_id).await);

    if let Err(msg) = validate_score(grade_data.score, assignment.max_score) {
        return Ok(bad_request(ErrorCode::GradeScoreInvalid, msg));
    }

    match storage
        .grade_submission(submission.id, actor.id, grade_data)
        .await
    {
        Ok(grade) => {
            info!(
                "Submission {} graded {} / {} by {}",
                submission.id, grade.score, assignment.max_score, actor.id
            );
            AuditEntry::new("submission.grade", "submission")
                .entity(submission.id)
                .school(Some(assignment.school_id))
                .details(serde_json::json!({
                    "assignment_id": assignment.id,
                    "score": grade.score,
                }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "Submission graded")))
        }
        Err(e) => Ok(storage_error("Failed to grade submission", e)),
    }
}

/// 评分人、提交的学生本人及其监护人可以查看成绩
pub async fn get_grade(
    service: &AssignmentService,
    request: &HttpRequest,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let (submission, _) = try_respond!(load_submission(&storage, &actor, submission_id).await);

    if !has_permission(&actor, Permission::GradeSubmissions) {
        let student = match storage.get_student_by_id(submission.student_id).await {
            Ok(Some(student)) => student,
            Ok(None) => return Ok(forbidden("Access to this grade is not allowed")),
            Err(e) => return Ok(storage_error("Failed to load student", e)),
        };
        let is_owner = student.user_id == Some(actor.id);
        let is_guardian = student.guardian_id == Some(actor.id);
        if !is_owner && !is_guardian {
            return Ok(forbidden("Access to this grade is not allowed"));
        }
    }

    match storage.get_grade_by_submission(submission.id).await {
        Ok(Some(grade)) => Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "Grade retrieved"))),
        Ok(None) => Ok(not_found(ErrorCode::GradeNotFound, "Submission has not been graded yet")),
        Err(e) => Ok(storage_error("Failed to load grade", e)),
    }
}
