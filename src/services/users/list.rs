use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::ApiResponse;
use crate::models::users::requests::{UserListParams, UserListQuery};
use crate::services::{current_user, storage_error, try_respond};
use crate::utils::resolve_school_id;

pub async fn list_users(
    service: &UserService,
    request: &HttpRequest,
    query: UserListParams,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));

    // 超级管理员不指定学校时可以查看全部账号
    let school_id = if actor.is_super_admin {
        query.school_id
    } else {
        Some(try_respond!(
            resolve_school_id(&actor, query.school_id).map_err(|e| e.into_response())
        ))
    };

    let (page, size) = query.pagination.normalized();
    let list_query = UserListQuery {
        page,
        size,
        school_id,
        role: query.role,
        status: query.status,
        search: query.search,
    };

    let storage = service.get_storage(request);
    match storage.list_users_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Users retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list users", e)),
    }
}
