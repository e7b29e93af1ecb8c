use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, load_managed_user};
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{bad_request, conflict, current_user, not_found, storage_error, try_respond};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password, validate_phone};

pub async fn update_user(
    service: &UserService,
    request: &HttpRequest,
    user_id: i64,
    mut update_data: UpdateUserRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let existing = try_respond!(load_managed_user(&storage, &actor, user_id).await);

    if let Some(email) = update_data.email.as_mut() {
        *email = email.trim().to_lowercase();
        if let Err(msg) = validate_email(email) {
            return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
        }
        if *email != existing.email {
            match storage.get_user_by_email(email).await {
                Ok(Some(_)) => {
                    return Ok(conflict(
                        ErrorCode::UserAlreadyExists,
                        format!("Email '{email}' already exists"),
                    ));
                }
                Ok(None) => {}
                Err(e) => return Ok(storage_error("Failed to check email", e)),
            }
        }
    }
    if let Some(phone) = update_data.phone.as_deref()
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(password) = update_data.password.take() {
        if let Err(msg) = validate_password(&password) {
            return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
        }
        update_data.password = match hash_password(&password) {
            Ok(hash) => Some(hash),
            Err(e) => return Ok(storage_error("Failed to hash password", e)),
        };
    }

    let changed_status = update_data.status;
    let changed_role = update_data.role;

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            info!("User {} updated account {}", actor.id, user.id);
            AuditEntry::new("user.update", "user")
                .entity(user.id)
                .school(user.school_id)
                .details(serde_json::json!({
                    "role": changed_role,
                    "status": changed_status,
                }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(user, "User updated")))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(storage_error("Failed to update user", e)),
    }
}
