use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, load_managed_user};
use crate::models::ApiResponse;
use crate::services::{current_user, try_respond};

pub async fn get_user(
    service: &UserService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let user = try_respond!(load_managed_user(&storage, &actor, user_id).await);
    Ok(HttpResponse::Ok().json(ApiResponse::success(user, "User retrieved")))
}
