use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{AttendanceService, load_session, visible_student_ids};
use crate::errors::SchoolHubError;
use crate::models::attendance::entities::{
    AttendanceSession, AttendanceSummary, SessionAction, validate_session_date,
};
use crate::models::attendance::requests::{
    CreateSessionRequest, NewAttendanceSession, SessionListParams, SessionListQuery,
    UpdateSessionRequest,
};
use crate::models::attendance::responses::{SessionDetailResponse, SessionUpsertResponse};
use crate::models::permissions::Permission;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::classes::{check_class_targets, load_class};
use crate::services::{
    bad_request, conflict, current_user, forbidden, not_found, require_permission,
    school_scope, storage_error, try_respond,
};

pub async fn list_sessions(
    service: &AttendanceService,
    request: &HttpRequest,
    query: SessionListParams,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let school_id = try_respond!(school_scope(&actor, query.school_id));
    let (page, size) = query.pagination.normalized();

    let storage = service.get_storage(request);
    match storage
        .list_attendance_sessions_with_pagination(SessionListQuery {
            page,
            size,
            school_id,
            class_id: query.class_id,
            section_id: query.section_id,
            date: query.date,
            from: query.from,
            to: query.to,
            is_locked: query.is_locked,
        })
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Attendance sessions retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list attendance sessions", e)),
    }
}

/// 创建或返回已有场次
///
/// 同一 (学校, 班级, 小组, 科目, 日期) 只有一个场次，已存在时返回 200 且 `created=false`。
pub async fn create_session(
    service: &AttendanceService,
    request: &HttpRequest,
    session_data: CreateSessionRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));

    let today = chrono::Utc::now().date_naive();
    if let Err(msg) = validate_session_date(session_data.session_date, today) {
        return Ok(bad_request(ErrorCode::AttendanceInvalidDate, msg));
    }

    let storage = service.get_storage(request);
    let class = try_respond!(load_class(&storage, &actor, session_data.class_id).await);
    try_respond!(
        check_class_targets(
            &storage,
            &class,
            session_data.section_id,
            session_data.subject_id
        )
        .await
    );

    let new_session = NewAttendanceSession {
        school_id: class.school_id,
        class_id: class.id,
        section_id: session_data.section_id,
        subject_id: session_data.subject_id,
        session_date: session_data.session_date,
        taken_by: Some(actor.id),
        notes: session_data.notes,
    };

    let existing = |session: AttendanceSession| {
        HttpResponse::Ok().json(ApiResponse::success(
            SessionUpsertResponse {
                session,
                created: false,
            },
            "Attendance session already exists",
        ))
    };

    match storage.find_attendance_session(&new_session).await {
        Ok(Some(session)) => return Ok(existing(session)),
        Ok(None) => {}
        Err(e) => return Ok(storage_error("Failed to look up attendance session", e)),
    }

    match storage.create_attendance_session(new_session.clone()).await {
        Ok(session) => {
            info!(
                "Attendance session {} opened for class {} on {}",
                session.id, session.class_id, session.session_date
            );
            AuditEntry::new("attendance_session.create", "attendance_session")
                .entity(session.id)
                .school(Some(session.school_id))
                .details(serde_json::json!({
                    "class_id": session.class_id,
                    "section_id": session.section_id,
                    "subject_id": session.subject_id,
                    "session_date": session.session_date,
                }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                SessionUpsertResponse {
                    session,
                    created: true,
                },
                "Attendance session created",
            )))
        }
        // 并发创建时唯一约束冲突，返回另一请求创建的场次
        Err(SchoolHubError::Conflict(_)) => {
            match storage.find_attendance_session(&new_session).await {
                Ok(Some(session)) => Ok(existing(session)),
                Ok(None) => Ok(conflict(
                    ErrorCode::Conflict,
                    "Attendance session was created concurrently",
                )),
                Err(e) => Ok(storage_error("Failed to look up attendance session", e)),
            }
        }
        Err(e) => Ok(storage_error("Failed to create attendance session", e)),
    }
}

pub async fn get_session(
    service: &AttendanceService,
    request: &HttpRequest,
    session_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let session = try_respond!(load_session(&storage, &actor, session_id).await);
    let visible = try_respond!(visible_student_ids(&storage, &actor, session.school_id).await);

    match storage.list_session_records(session.id).await {
        Ok(mut records) => {
            if let Some(ids) = visible {
                records.retain(|r| ids.contains(&r.student_id));
            }
            let summary = AttendanceSummary::from_records(&records);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SessionDetailResponse {
                    session,
                    records,
                    summary,
                },
                "Attendance session retrieved",
            )))
        }
        Err(e) => Ok(storage_error("Failed to list attendance records", e)),
    }
}

/// 锁定 / 解锁场次；状态未变化时直接返回当前场次
pub async fn update_session(
    service: &AttendanceService,
    request: &HttpRequest,
    session_id: i64,
    update_data: UpdateSessionRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let required = match update_data.action {
        SessionAction::Lock => Permission::LockAttendance,
        SessionAction::Unlock => Permission::UnlockAttendance,
    };
    try_respond!(require_permission(&actor, required));

    let storage = service.get_storage(request);
    let session = try_respond!(load_session(&storage, &actor, session_id).await);

    let Some(locked) = session.target_lock_state(update_data.action) else {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            session,
            format!("Attendance session already {}ed", update_data.action),
        )));
    };

    match storage
        .set_attendance_session_lock(session.id, locked, actor.id)
        .await
    {
        Ok(Some(updated)) => {
            info!(
                "Attendance session {} {}ed by {}",
                updated.id, update_data.action, actor.id
            );
            AuditEntry::new(
                format!("attendance_session.{}", update_data.action),
                "attendance_session",
            )
            .entity(updated.id)
            .school(Some(updated.school_id))
            .record(&storage, &actor, request)
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                updated,
                format!("Attendance session {}ed", update_data.action),
            )))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::AttendanceSessionNotFound,
            "Attendance session not found",
        )),
        Err(e) => Ok(storage_error("Failed to update attendance session", e)),
    }
}

pub async fn delete_session(
    service: &AttendanceService,
    request: &HttpRequest,
    session_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    if !actor.is_super_admin && actor.role != UserRole::SchoolAdmin {
        warn!("User {} attempted to delete attendance session {}", actor.id, session_id);
        return Ok(forbidden("Only school admins can delete attendance sessions"));
    }

    let storage = service.get_storage(request);
    let session = try_respond!(load_session(&storage, &actor, session_id).await);
    if session.is_locked {
        return Ok(conflict(
            ErrorCode::AttendanceSessionLocked,
            "Attendance session is locked",
        ));
    }

    match storage.delete_attendance_session(session.id).await {
        Ok(true) => {
            info!("Attendance session {} deleted by {}", session.id, actor.id);
            AuditEntry::new("attendance_session.delete", "attendance_session")
                .entity(session.id)
                .school(Some(session.school_id))
                .details(serde_json::json!({
                    "class_id": session.class_id,
                    "session_date": session.session_date,
                }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Attendance session deleted",
            )))
        }
        Ok(false) => Ok(not_found(
            ErrorCode::AttendanceSessionNotFound,
            "Attendance session not found",
        )),
        Err(e) => Ok(storage_error("Failed to delete attendance session", e)),
    }
}
