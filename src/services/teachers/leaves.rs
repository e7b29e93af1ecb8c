use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TeacherService, load_teacher};
use crate::models::ApiResponse;
use crate::models::leaves::requests::{LeaveListParams, LeaveListQuery};
use crate::models::permissions::{Permission, has_permission};
use crate::services::{current_user, forbidden, storage_error, try_respond};

pub async fn list_teacher_leaves(
    service: &TeacherService,
    request: &HttpRequest,
    teacher_id: i64,
    query: LeaveListParams,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let teacher = try_respond!(load_teacher(&storage, &actor, teacher_id).await);

    // 审批人可以查看所有教师，教师本人只能查看自己的
    if !has_permission(&actor, Permission::ReviewLeaves) && teacher.user_id != Some(actor.id) {
        return Ok(forbidden("You can only view your own leaves"));
    }

    let (page, size) = query.pagination.normalized();
    match storage
        .list_leaves_with_pagination(LeaveListQuery {
            page,
            size,
            school_id: teacher.school_id,
            status: query.status,
            teacher_id: Some(teacher.id),
            student_id: None,
            requester_id: None,
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
