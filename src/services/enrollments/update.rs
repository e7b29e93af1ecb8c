use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EnrollmentService, load_enrollment, validate_roll_no};
use crate::models::enrollments::entities::EnrollmentStatus;
use crate::models::enrollments::requests::UpdateEnrollmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::classes::{check_class_targets, load_class};
use crate::services::{
    bad_request, conflict, current_user, not_found, storage_error, try_respond,
};

pub async fn update_enrollment(
    service: &EnrollmentService,
    request: &HttpRequest,
    enrollment_id: i64,
    update_data: UpdateEnrollmentRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    if let Err(msg) = validate_roll_no(update_data.roll_no) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);
    let enrollment = try_respond!(load_enrollment(&storage, &actor, enrollment_id).await);

    if update_data.section_id.is_some() {
        let class = try_respond!(load_class(&storage, &actor, enrollment.class_id).await);
        try_respond!(check_class_targets(&storage, &class, update_data.section_id, None).await);
    }

    // 重新激活时不能与其他有效学籍冲突
    if update_data.status == Some(EnrollmentStatus::Active)
        && enrollment.status != EnrollmentStatus::Active
    {
        match storage
            .find_active_enrollment(enrollment.student_id, &enrollment.academic_year)
            .await
        {
            Ok(Some(other)) if other.id != enrollment.id => {
                return Ok(conflict(
                    ErrorCode::EnrollmentAlreadyActive,
                    "Student already has an active enrollment for this academic year",
                ));
            }
            Ok(_) => {}
            Err(e) => return Ok(storage_error("Failed to check enrollments", e)),
        }
    }

    let status = update_data.status;
    match storage.update_enrollment(enrollment_id, update_data).await {
        Ok(Some(updated)) => {
            info!("Enrollment {} updated by {}", updated.id, actor.id);
            AuditEntry::new("enrollment.update", "enrollment")
                .entity(updated.id)
                .school(Some(updated.school_id))
                .details(serde_json::json!({ "status": status }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Enrollment updated")))
        }
        Ok(None) => Ok(not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found")),
        Err(e) => Ok(storage_error("Failed to update enrollment", e)),
    }
}
