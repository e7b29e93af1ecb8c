use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EnrollmentService, validate_roll_no};
use crate::models::enrollments::requests::CreateEnrollmentRequest;
use crate::models::students::entities::Student;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::classes::{check_class_targets, load_class};
use crate::services::{
    bad_request, conflict, current_user, scoped_entity, storage_error, try_respond,
};
use crate::utils::validate::require_non_blank;

pub async fn create_enrollment(
    service: &EnrollmentService,
    request: &HttpRequest,
    mut enrollment_data: CreateEnrollmentRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));

    enrollment_data.academic_year = try_respond!(
        require_non_blank("academic_year", &enrollment_data.academic_year)
            .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
    );
    if let Err(msg) = validate_roll_no(enrollment_data.roll_no) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);
    let student = try_respond!(scoped_entity(
        &actor,
        storage.get_student_by_id(enrollment_data.student_id).await,
        |s: &Student| s.school_id,
        ErrorCode::StudentNotFound,
        "Student",
    ));
    let class = try_respond!(load_class(&storage, &actor, enrollment_data.class_id).await);
    if class.school_id != student.school_id {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "Student and class belong to different schools",
        ));
    }
    try_respond!(check_class_targets(&storage, &class, enrollment_data.section_id, None).await);

    // 同一学年只能有一个有效学籍
    match storage
        .find_active_enrollment(student.id, &enrollment_data.academic_year)
        .await
    {
        Ok(Some(existing)) => {
            return Ok(conflict(
                ErrorCode::EnrollmentAlreadyActive,
                format!(
                    "Student already has an active enrollment ({}) for {}",
                    existing.id, enrollment_data.academic_year
                ),
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_error("Failed to check enrollments", e)),
    }

    match storage
        .create_enrollment(student.school_id, enrollment_data)
        .await
    {
        Ok(enrollment) => {
            info!(
                "Student {} enrolled in class {} ({})",
                student.id, class.id, enrollment.academic_year
            );
            AuditEntry::new("enrollment.create", "enrollment")
                .entity(enrollment.id)
                .school(Some(enrollment.school_id))
                .details(serde_json::json!({
                    "student_id": enrollment.student_id,
                    "class_id": enrollment.class_id,
                    "section_id": enrollment.section_id,
                    "academic_year": enrollment.academic_year,
                }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                enrollment,
                "Enrollment created",
            )))
        }
        Err(e) => Ok(storage_error("Failed to create enrollment", e)),
    }
}
