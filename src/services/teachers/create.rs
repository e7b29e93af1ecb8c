use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::models::teachers::requests::CreateTeacherRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::students::check_linked_user;
use crate::services::{bad_request, conflict, current_user, school_scope, storage_error, try_respond};
use crate::utils::validate::{require_non_blank, validate_code, validate_email, validate_phone};

pub async fn create_teacher(
    service: &TeacherService,
    request: &HttpRequest,
    mut teacher_data: CreateTeacherRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let school_id = try_respond!(school_scope(&actor, teacher_data.school_id));

    for (field, value) in [
        ("employee_no", &mut teacher_data.employee_no),
        ("first_name", &mut teacher_data.first_name),
        ("last_name", &mut teacher_data.last_name),
    ] {
        *value = try_respond!(
            require_non_blank(field, value.as_str()).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
        );
    }
    if let Err(msg) = validate_code("employee_no", &teacher_data.employee_no) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(email) = teacher_data.email.as_deref()
        && let Err(msg) = validate_email(email)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(phone) = teacher_data.phone.as_deref()
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);

    if let Some(user_id) = teacher_data.user_id {
        try_respond!(
            check_linked_user(&storage, school_id, user_id, UserRole::Teacher, "user_id").await
        );
    }

    match storage
        .get_teacher_by_employee_no(school_id, &teacher_data.employee_no)
        .await
    {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::TeacherEmployeeNoExists,
                format!(
                    "Employee number '{}' already exists in this school",
                    teacher_data.employee_no
                ),
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_error("Failed to check employee number", e)),
    }

    match storage.create_teacher(school_id, teacher_data).await {
        Ok(teacher) => {
            info!(
                "Teacher {} created in school {} by {}",
                teacher.employee_no, school_id, actor.id
            );
            AuditEntry::new("teacher.create", "teacher")
                .entity(teacher.id)
                .school(Some(school_id))
                .details(serde_json::json!({ "employee_no": teacher.employee_no }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(teacher, "Teacher created")))
        }
        Err(e) => Ok(storage_error("Failed to create teacher", e)),
    }
}
