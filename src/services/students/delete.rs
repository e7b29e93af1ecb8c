use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::models::students::entities::Student;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{current_user, not_found, scoped_entity, storage_error, try_respond};

pub async fn delete_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
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

    match storage.soft_delete_student(student_id).await {
        Ok(true) => {
            info!("Student {} deleted by {}", student.admission_no, actor.id);
            AuditEntry::new("student.delete", "student")
                .entity(student.id)
                .school(Some(student.school_id))
                .details(serde_json::json!({ "admission_no": student.admission_no }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Student deleted")))
        }
        Ok(false) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Ok(storage_error("Failed to delete student", e)),
    }
}
