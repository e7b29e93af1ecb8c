use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EnrollmentService, load_enrollment};
use crate::models::enrollments::entities::EnrollmentStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{current_user, not_found, storage_error, try_respond};

pub async fn withdraw_enrollment(
    service: &EnrollmentService,
    request: &HttpRequest,
    enrollment_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let enrollment = try_respond!(load_enrollment(&storage, &actor, enrollment_id).await);
    if enrollment.status == EnrollmentStatus::Withdrawn {
        return Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Enrollment already withdrawn",
        )));
    }

    match storage.withdraw_enrollment(enrollment.id).await {
        Ok(true) => {
            info!(
                "Enrollment {} of student {} withdrawn by {}",
                enrollment.id, enrollment.student_id, actor.id
            );
            AuditEntry::new("enrollment.withdraw", "enrollment")
                .entity(enrollment.id)
                .school(Some(enrollment.school_id))
                .details(serde_json::json!({ "student_id": enrollment.student_id }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Enrollment withdrawn")))
        }
        Ok(false) => Ok(not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found")),
        Err(e) => Ok(storage_error("Failed to withdraw enrollment", e)),
    }
}
