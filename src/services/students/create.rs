use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, check_linked_user};
use crate::models::students::requests::CreateStudentRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{bad_request, conflict, current_user, school_scope, storage_error, try_respond};
use crate::utils::validate::{require_non_blank, validate_code};

pub async fn create_student(
    service: &StudentService,
    request: &HttpRequest,
    student_data: CreateStudentRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let school_id = try_respond!(school_scope(&actor, student_data.school_id));

    for (field, value) in [
        ("admission_no", &student_data.admission_no),
        ("first_name", &student_data.first_name),
        ("last_name", &student_data.last_name),
    ] {
        if let Err(msg) = require_non_blank(field, value) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
    }
    let new_student = student_data.into_new_student(school_id);
    if let Err(msg) = validate_code("admission_no", &new_student.admission_no) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);

    if let Some(guardian_id) = new_student.guardian_id {
        try_respond!(
            check_linked_user(&storage, school_id, guardian_id, UserRole::Guardian, "guardian_id")
                .await
        );
    }
    if let Some(user_id) = new_student.user_id {
        try_respond!(
            check_linked_user(&storage, school_id, user_id, UserRole::Student, "user_id").await
        );
    }

    match storage
        .get_student_by_admission_no(school_id, &new_student.admission_no)
        .await
    {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::StudentAdmissionNoExists,
                format!(
                    "Admission number '{}' already exists in this school",
                    new_student.admission_no
                ),
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_error("Failed to check admission number", e)),
    }

    match storage.create_student(new_student).await {
        Ok(student) => {
            info!(
                "Student {} ({}) created in school {}",
                student.full_name(),
                student.admission_no,
                school_id
            );
            AuditEntry::new("student.create", "student")
                .entity(student.id)
                .school(Some(school_id))
                .details(serde_json::json!({ "admission_no": student.admission_no }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(student, "Student created")))
        }
        Err(e) => Ok(storage_error("Failed to create student", e)),
    }
}
