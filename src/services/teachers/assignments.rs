use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TeacherService, load_teacher};
use crate::models::teachers::requests::CreateTeacherAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::classes::check_class_targets;
use crate::services::{
    bad_request, conflict, current_user, not_found, storage_error, try_respond,
};

pub async fn list_assignments(
    service: &TeacherService,
    request: &HttpRequest,
    teacher_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let teacher = try_respond!(load_teacher(&storage, &actor, teacher_id).await);

    match storage.list_teacher_assignments(teacher.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            items,
            "Teaching assignments retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list teaching assignments", e)),
    }
}

pub async fn create_assignment(
    service: &TeacherService,
    request: &HttpRequest,
    teacher_id: i64,
    assignment_data: CreateTeacherAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let teacher = try_respond!(load_teacher(&storage, &actor, teacher_id).await);

    // 班级、小组、科目都必须属于教师所在学校
    let class = match storage.get_class_by_id(assignment_data.class_id).await {
        Ok(Some(class)) if class.school_id == teacher.school_id => class,
        Ok(_) => {
            return Ok(bad_request(
                ErrorCode::ClassNotFound,
                "class_id does not belong to the teacher's school",
            ));
        }
        Err(e) => return Ok(storage_error("Failed to check class", e)),
    };
    try_respond!(
        check_class_targets(
            &storage,
            &class,
            assignment_data.section_id,
            assignment_data.subject_id
        )
        .await
    );

    match storage
        .find_teacher_assignment(teacher.id, &assignment_data)
        .await
    {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::TeacherAssignmentExists,
                "Teacher is already assigned to this class",
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_error("Failed to check teaching assignment", e)),
    }

    match storage
        .create_teacher_assignment(teacher.school_id, teacher.id, assignment_data)
        .await
    {
        Ok(assignment) => {
            info!(
                "Teacher {} assigned to class {} by {}",
                teacher.id, assignment.class_id, actor.id
            );
            AuditEntry::new("teacher_assignment.create", "teacher_assignment")
                .entity(assignment.id)
                .school(Some(teacher.school_id))
                .details(serde_json::json!({
                    "teacher_id": teacher.id,
                    "class_id": assignment.class_id,
                    "section_id": assignment.section_id,
                    "subject_id": assignment.subject_id,
                    "is_class_teacher": assignment.is_class_teacher,
                }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Teaching assignment created",
            )))
        }
        Err(e) => Ok(storage_error("Failed to create teaching assignment", e)),
    }
}

pub async fn delete_assignment(
    service: &TeacherService,
    request: &HttpRequest,
    teacher_id: i64,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let teacher = try_respond!(load_teacher(&storage, &actor, teacher_id).await);

    match storage.get_teacher_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) if assignment.teacher_id == teacher.id => {}
        Ok(_) => {
            return Ok(not_found(
                ErrorCode::NotFound,
                "Teaching assignment not found",
            ));
        }
        Err(e) => return Ok(storage_error("Failed to get teaching assignment", e)),
    }

    match storage.delete_teacher_assignment(assignment_id).await {
        Ok(true) => {
            info!(
                "Teaching assignment {} of teacher {} removed by {}",
                assignment_id, teacher.id, actor.id
            );
            AuditEntry::new("teacher_assignment.delete", "teacher_assignment")
                .entity(assignment_id)
                .school(Some(teacher.school_id))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Teaching assignment deleted",
            )))
        }
        Ok(false) => Ok(not_found(
            ErrorCode::NotFound,
            "Teaching assignment not found",
        )),
        Err(e) => Ok(storage_error("Failed to delete teaching assignment", e)),
    }
}
