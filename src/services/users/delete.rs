use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, load_managed_user};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{bad_request, current_user, not_found, storage_error, try_respond};

pub async fn delete_user(
    service: &UserService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    if actor.id == user_id {
        return Ok(bad_request(
            ErrorCode::CanNotDeleteCurrentUser,
            "You cannot delete your own account",
        ));
    }

    let storage = service.get_storage(request);
    let user = try_respond!(load_managed_user(&storage, &actor, user_id).await);

    match storage.deactivate_user(user_id).await {
        Ok(true) => {
            info!("User {} deactivated account {}", actor.id, user.username);
            AuditEntry::new("user.delete", "user")
                .entity(user.id)
                .school(user.school_id)
                .details(serde_json::json!({ "username": user.username }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deactivated")))
        }
        Ok(false) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(storage_error("Failed to delete user", e)),
    }
}
