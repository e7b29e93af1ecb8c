use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TeacherService, load_teacher};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{current_user, not_found, storage_error, try_respond};

pub async fn delete_teacher(
    service: &TeacherService,
    request: &HttpRequest,
    teacher_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let teacher = try_respond!(load_teacher(&storage, &actor, teacher_id).await);

    match storage.soft_delete_teacher(teacher_id).await {
        Ok(true) => {
            info!("Teacher {} deleted by {}", teacher.employee_no, actor.id);
            AuditEntry::new("teacher.delete", "teacher")
                .entity(teacher.id)
                .school(Some(teacher.school_id))
                .details(serde_json::json!({ "employee_no": teacher.employee_no }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Teacher deleted")))
        }
        Ok(false) => Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => Ok(storage_error("Failed to delete teacher", e)),
    }
}
