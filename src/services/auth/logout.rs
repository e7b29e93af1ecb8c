use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use tracing::info;

use crate::cache::{ObjectCache, keys};
use crate::middlewares::require_jwt::bearer_token;
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

pub async fn handle_logout(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let (Some(token), Some(cache)) = (
        bearer_token(request),
        request.app_data::<web::Data<Arc<dyn ObjectCache>>>(),
    ) {
        cache.remove(&keys::user_by_token(&token)).await;
    }

    if let Some(user_id) = crate::middlewares::RequireJWT::extract_user_id(request) {
        info!("User {} logged out", user_id);
    }

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logged out")))
}
