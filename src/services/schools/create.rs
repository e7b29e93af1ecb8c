use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SchoolService;
use crate::models::schools::requests::CreateSchoolRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{bad_request, conflict, current_user, storage_error, try_respond};
use crate::utils::validate::{require_non_blank, validate_code, validate_email, validate_phone};

pub async fn create_school(
    service: &SchoolService,
    request: &HttpRequest,
    mut school_data: CreateSchoolRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));

    school_data.name = try_respond!(
        require_non_blank("name", &school_data.name)
            .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
    );
    school_data.code = try_respond!(
        require_non_blank("code", &school_data.code)
            .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
    )
    .to_uppercase();
    if let Err(msg) = validate_code("code", &school_data.code) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(email) = school_data.contact_email.as_deref()
        && let Err(msg) = validate_email(email)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(phone) = school_data.phone.as_deref()
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);

    // 软删除的学校仍占用代码
    match storage.get_school_by_code(&school_data.code).await {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::SchoolCodeExists,
                format!("School code '{}' already exists", school_data.code),
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_error("Failed to check school code", e)),
    }

    match storage.create_school(school_data).await {
        Ok(school) => {
            info!("School {} ({}) created by {}", school.name, school.code, actor.id);
            AuditEntry::new("school.create", "school")
                .entity(school.id)
                .school(Some(school.id))
                .details(serde_json::json!({ "name": school.name, "code": school.code }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(school, "School created")))
        }
        Err(e) => Ok(storage_error("Failed to create school", e)),
    }
}
