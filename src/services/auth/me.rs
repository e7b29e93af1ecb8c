use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Serialize;
use ts_rs::TS;

use crate::models::ApiResponse;
use crate::models::permissions::{Permission, effective_permissions};
use crate::models::users::entities::User;
use crate::services::{current_user, try_respond};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct MeResponse {
    pub user: User,
    pub permissions: Vec<Permission>,
}

pub async fn handle_me(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let permissions = effective_permissions(&user);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MeResponse { user, permissions },
        "Profile retrieved",
    )))
}
