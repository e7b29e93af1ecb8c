use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, check_linked_user};
use crate::models::students::entities::Student;
use crate::models::students::requests::UpdateStudentRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{
    bad_request, current_user, not_found, scoped_entity, storage_error, try_respond,
};
use crate::utils::validate::require_non_blank;

pub async fn update_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
    mut update_data: UpdateStudentRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let student = try_respond!(scoped_entity(
        &actor,
        storage.get_student_by_id(student_id).await,
        |s: &Student| s.school_id,
        ErrorCode::StudentNotFound,
        "Student",
    ));

    for (field, value) in [
        ("first_name", &mut update_data.first_name),
        ("last_name", &mut update_data.last_name),
    ] {
        if let Some(raw) = value.as_deref() {
            *value = Some(try_respond!(
                require_non_blank(field, raw).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
            ));
        }
    }
    if let Some(guardian_id) = update_data.guardian_id {
        try_respond!(
            check_linked_user(
                &storage,
                student.school_id,
                guardian_id,
                UserRole::Guardian,
                "guardian_id"
            )
            .await
        );
    }
    if let Some(user_id) = update_data.user_id {
        try_respond!(
            check_linked_user(&storage, student.school_id, user_id, UserRole::Student, "user_id")
                .await
        );
    }

    let status = update_data.status;
    match storage.update_student(student_id, update_data).await {
        Ok(Some(updated)) => {
            info!("Student {} updated by {}", updated.id, actor.id);
            AuditEntry::new("student.update", "student")
                .entity(updated.id)
                .school(Some(updated.school_id))
                .details(serde_json::json!({ "status": status }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Student updated")))
        }
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Ok(storage_error("Failed to update student", e)),
    }
}
