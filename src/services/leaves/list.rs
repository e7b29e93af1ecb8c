use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LeaveService;
use crate::models::ApiResponse;
use crate::models::leaves::requests::{LeaveListParams, LeaveListQuery};
use crate::models::permissions::{Permission, has_permission};
use crate::services::{current_user, school_scope, storage_error, try_respond};

pub async fn list_leaves(
    service: &LeaveService,
    request: &HttpRequest,
    query: LeaveListParams,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let school_id = try_respond!(school_scope(&actor, query.school_id));

    // 没有审批权限时只返回自己提交的请假
    let requester_id = (!has_permission(&actor, Permission::ReviewLeaves)).then_some(actor.id);

    let (page, size) = query.pagination.normalized();
    let storage = service.get_storage(request);
    match storage
        .list_leaves_with_pagination(LeaveListQuery {
            page,
            size,
            school_id,
            status: query.status,
            teacher_id: query.teacher_id,
            student_id: query.student_id,
            requester_id,
        })
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Leaves retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list leaves", e)),
    }
}
