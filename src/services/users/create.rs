use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::UserService;
use crate::models::users::requests::CreateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{bad_request, conflict, current_user, forbidden, storage_error, try_respond};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password, validate_phone, validate_username};
use crate::utils::{ensure_school_access, resolve_school_id};

pub async fn create_user(
    service: &UserService,
    request: &HttpRequest,
    mut user_data: CreateUserRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));

    user_data.username = user_data.username.trim().to_string();
    user_data.email = user_data.email.trim().to_lowercase();

    if let Err(msg) = validate_username(&user_data.username) {
        return Ok(bad_request(ErrorCode::UserNameInvalid, msg));
    }
    if let Err(msg) = validate_email(&user_data.email) {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }
    if let Err(msg) = validate_password(&user_data.password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }
    if let Some(phone) = user_data.phone.as_deref()
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    if user_data.is_super_admin && !actor.is_super_admin {
        warn!(
            "User {} attempted to create a super admin account",
            actor.id
        );
        return Ok(forbidden("Only super admins can create super admin accounts"));
    }

    // 普通账号必须归属学校；超级管理员账号可以不归属
    user_data.school_id = if user_data.is_super_admin {
        user_data.school_id
    } else {
        Some(try_respond!(
            resolve_school_id(&actor, user_data.school_id).map_err(|e| e.into_response())
        ))
    };
    if let Some(school_id) = user_data.school_id {
        try_respond!(ensure_school_access(&actor, school_id).map_err(|e| e.into_response()));
    }

    let storage = service.get_storage(request);

    if let Some(school_id) = user_data.school_id {
        match storage.get_school_by_id(school_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(bad_request(
                    ErrorCode::SchoolNotFound,
                    format!("School {school_id} does not exist"),
                ));
            }
            Err(e) => return Ok(storage_error("Failed to check school", e)),
        }
    }

    match storage.get_user_by_username(&user_data.username).await {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::UserAlreadyExists,
                format!("Username '{}' already exists", user_data.username),
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_error("Failed to check username", e)),
    }
    match storage.get_user_by_email(&user_data.email).await {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::UserAlreadyExists,
                format!("Email '{}' already exists", user_data.email),
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_error("Failed to check email", e)),
    }

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(storage_error("Failed to hash password", e)),
    };

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!(
                "User {} created account {} ({})",
                actor.id, user.username, user.role
            );
            AuditEntry::new("user.create", "user")
                .entity(user.id)
                .school(user.school_id)
                .details(serde_json::json!({
                    "username": user.username,
                    "role": user.role,
                    "is_super_admin": user.is_super_admin,
                }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(user, "User created")))
        }
        Err(e) => Ok(storage_error("Failed to create user", e)),
    }
}
