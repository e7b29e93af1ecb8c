use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SchoolService;
use crate::models::schools::requests::UpdateSchoolRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{bad_request, current_user, not_found, storage_error, try_respond};
use crate::utils::validate::{require_non_blank, validate_email, validate_phone};

pub async fn update_school(
    service: &SchoolService,
    request: &HttpRequest,
    school_id: i64,
    mut update_data: UpdateSchoolRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));

    if let Some(name) = update_data.name.as_deref() {
        update_data.name = Some(try_respond!(
            require_non_blank("name", name).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
        ));
    }
    if let Some(email) = update_data.contact_email.as_deref()
        && let Err(msg) = validate_email(email)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(phone) = update_data.phone.as_deref()
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);
    let is_active = update_data.is_active;
    match storage.update_school(school_id, update_data).await {
        Ok(Some(school)) => {
            info!("School {} updated by {}", school.id, actor.id);
            AuditEntry::new("school.update", "school")
                .entity(school.id)
                .school(Some(school.id))
                .details(serde_json::json!({ "is_active": is_active }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(school, "School updated")))
        }
        Ok(None) => Ok(not_found(ErrorCode::SchoolNotFound, "School not found")),
        Err(e) => Ok(storage_error("Failed to update school", e)),
    }
}
