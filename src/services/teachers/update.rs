use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TeacherService, load_teacher};
use crate::models::teachers::requests::UpdateTeacherRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::students::check_linked_user;
use crate::services::{bad_request, current_user, not_found, storage_error, try_respond};
use crate::utils::validate::{require_non_blank, validate_email, validate_phone};

pub async fn update_teacher(
    service: &TeacherService,
    request: &HttpRequest,
    teacher_id: i64,
    mut update_data: UpdateTeacherRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let teacher = try_respond!(load_teacher(&storage, &actor, teacher_id).await);

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
    if let Some(email) = update_data.email.as_deref()
        && let Err(msg) = validate_email(email)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(phone) = update_data.phone.as_deref()
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(user_id) = update_data.user_id {
        try_respond!(
            check_linked_user(&storage, teacher.school_id, user_id, UserRole::Teacher, "user_id")
                .await
        );
    }

    let status = update_data.status;
    match storage.update_teacher(teacher_id, update_data).await {
        Ok(Some(updated)) => {
            info!("Teacher {} updated by {}", updated.id, actor.id);
            AuditEntry::new("teacher.update", "teacher")
                .entity(updated.id)
                .school(Some(updated.school_id))
                .details(serde_json::json!({ "status": status }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Teacher updated")))
        }
        Ok(None) => Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => Ok(storage_error("Failed to update teacher", e)),
    }
}
