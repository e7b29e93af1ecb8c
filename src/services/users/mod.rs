pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::users::entities::User;
use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListParams};
use crate::storage::Storage;
use crate::utils::ensure_school_access;

use super::{not_found, storage_error};

super::define_service!(
    /// 用户档案管理
    UserService
);

impl UserService {
    pub async fn list_users(
        &self,
        request: &HttpRequest,
        query: UserListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, request, query).await
    }

    pub async fn create_user(
        &self,
        request: &HttpRequest,
        user_data: CreateUserRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, request, user_data).await
    }

    pub async fn get_user(&self, request: &HttpRequest, user_id: i64) -> ActixResult<HttpResponse> {
        get::get_user(self, request, user_id).await
    }

    pub async fn update_user(
        &self,
        request: &HttpRequest,
        user_id: i64,
        update_data: UpdateUserRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, request, user_id, update_data).await
    }

    pub async fn delete_user(
        &self,
        request: &HttpRequest,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, request, user_id).await
    }
}

/// 读取用户并检查当前用户能否管理它
///
/// 未归属学校的账号（超级管理员）只对超级管理员可见。
pub(crate) async fn load_managed_user(
    storage: &Arc<dyn Storage>,
    actor: &User,
    user_id: i64,
) -> Result<User, HttpResponse> {
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Err(storage_error("Failed to get user", e)),
    };

    if actor.is_super_admin {
        return Ok(user);
    }
    match user.school_id {
        Some(school_id) if !user.is_super_admin => ensure_school_access(actor, school_id)
            .map(|_| user)
            .map_err(|e| e.into_response()),
        _ => Err(not_found(ErrorCode::UserNotFound, "User not found")),
    }
}
