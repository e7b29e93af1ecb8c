use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use tracing::info;

use super::{AttendanceService, load_session};
use crate::models::attendance::requests::{MarkAttendanceRequest, RecordListParams, RecordListQuery};
use crate::models::attendance::responses::{MarkAttendanceResponse, RecordError};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::students::load_visible_student;
use crate::services::{
    bad_request, conflict, current_user, not_found, school_scope, storage_error, try_respond,
};

/// 考勤记录查询
///
/// 学生只能查看自己的记录，家长必须指定自己孩子的 `student_id`。
pub async fn list_records(
    service: &AttendanceService,
    request: &HttpRequest,
    mut query: RecordListParams,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);

    let school_id = match query.session_id {
        Some(session_id) => try_respond!(load_session(&storage, &actor, session_id).await).school_id,
        None => try_respond!(school_scope(&actor, None)),
    };

    if !actor.is_super_admin {
        match actor.role {
            UserRole::Student => match storage.get_student_by_user_id(actor.id).await {
                Ok(Some(student)) => query.student_id = Some(student.id),
                Ok(None) => {
                    return Ok(not_found(
                        ErrorCode::StudentNotFound,
                        "No student record is linked to your account",
                    ));
                }
                Err(e) => return Ok(storage_error("Failed to load student record", e)),
            },
            UserRole::Guardian => {
                let Some(student_id) = query.student_id else {
                    return Ok(bad_request(ErrorCode::BadRequest, "student_id is required"));
                };
                try_respond!(load_visible_student(&storage, &actor, student_id).await);
            }
            UserRole::Teacher | UserRole::SchoolAdmin => {}
        }
    }

    let (page, size) = query.pagination.normalized();
    match storage
        .list_attendance_records_with_pagination(RecordListQuery {
            page,
            size,
            school_id,
            session_id: query.session_id,
            student_id: query.student_id,
            from: query.from,
            to: query.to,
        })
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Attendance records retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list attendance records", e)),
    }
}

/// 按 (场次, 学生) 写入考勤
///
/// 未在该班级（及小组）在读的学生逐条报告，不影响其他记录。
pub async fn mark_records(
    service: &AttendanceService,
    request: &HttpRequest,
    mark_data: MarkAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    if mark_data.records.is_empty() {
        return Ok(bad_request(ErrorCode::BadRequest, "records must not be empty"));
    }

    let storage = service.get_storage(request);
    let session = try_respond!(load_session(&storage, &actor, mark_data.session_id).await);
    if session.is_locked {
        return Ok(conflict(
            ErrorCode::AttendanceSessionLocked,
            "Attendance session is locked",
        ));
    }

    let enrolled: HashSet<i64> = match storage
        .active_student_ids_in_class(session.class_id, session.section_id)
        .await
    {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => return Ok(storage_error("Failed to load class roster", e)),
    };

    let mut saved = Vec::with_capacity(mark_data.records.len());
    let mut errors = Vec::new();
    for entry in mark_data.records {
        let student_id = entry.student_id;
        if !enrolled.contains(&student_id) {
            errors.push(RecordError {
                student_id,
                error: "student is not actively enrolled in this class".to_string(),
            });
            continue;
        }
        match storage
            .upsert_attendance_record(session.id, entry, actor.id)
            .await
        {
            Ok(record) => saved.push(record),
            Err(e) => {
                tracing::error!(
                    "Failed to save attendance for student {} in session {}: {}",
                    student_id,
                    session.id,
                    e
                );
                errors.push(RecordError {
                    student_id,
                    error: e.message().to_string(),
                });
            }
        }
    }

    info!(
        "Attendance marked for session {}: {} saved, {} rejected",
        session.id,
        saved.len(),
        errors.len()
    );
    AuditEntry::new("attendance.mark", "attendance_session")
        .entity(session.id)
        .school(Some(session.school_id))
        .details(serde_json::json!({ "saved": saved.len(), "rejected": errors.len() }))
        .record(&storage, &actor, request)
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MarkAttendanceResponse { saved, errors },
        "Attendance saved",
    )))
}
