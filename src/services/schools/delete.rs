use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SchoolService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{current_user, not_found, storage_error, try_respond};

pub async fn delete_school(
    service: &SchoolService,
    request: &HttpRequest,
    school_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);

    match storage.soft_delete_school(school_id).await {
        Ok(true) => {
            info!("School {} deactivated by {}", school_id, actor.id);
            AuditEntry::new("school.delete", "school")
                .entity(school_id)
                .school(Some(school_id))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("School deleted")))
        }
        Ok(false) => Ok(not_found(ErrorCode::SchoolNotFound, "School not found")),
        Err(e) => Ok(storage_error("Failed to delete school", e)),
    }
}
