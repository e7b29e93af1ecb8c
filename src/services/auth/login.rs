use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;
use crate::utils::validate::require_non_blank;

use super::AuthService;

fn auth_failed() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Username or password is incorrect",
    ))
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identifier = match require_non_blank("username", &login_request.username) {
        Ok(v) => v,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
    };
    if login_request.password.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "password is required",
        )));
    }

    let storage = service.get_storage(request);
    let config = service.get_config();

    let user = match storage.get_user_by_username_or_email(&identifier).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!("Login failed for unknown account {}", identifier);
            return Ok(auth_failed());
        }
        Err(e) => {
            error!("Failed to look up user {}: {}", identifier, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed",
                )),
            );
        }
    };

    if !verify_password(&login_request.password, &user.password_hash) {
        info!("Login failed for {}: wrong password", user.username);
        return Ok(auth_failed());
    }

    if !user.is_active() {
        warn!("Login rejected for {} account {}", user.status, user.username);
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AccountDisabled,
            "Account is disabled",
        )));
    }

    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for {}: {}", user.id, e);
    }

    let refresh_ttl = if login_request.remember_me {
        chrono::Duration::days(config.jwt.refresh_token_remember_me_expiry)
    } else {
        chrono::Duration::days(config.jwt.refresh_token_expiry)
    };

    let token_pair = match user.generate_token_pair(Some(refresh_ttl)) {
        Ok(pair) => pair,
        Err(e) => {
            error!("Failed to generate JWT token: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            );
        }
    };

    info!("User {} logged in", user.username);

    let refresh_cookie = JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, refresh_ttl);
    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: JwtUtils::access_token_ttl_seconds(),
        user,
        created_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
