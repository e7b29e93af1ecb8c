use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::ApiResponse;
use crate::models::assignments::entities::AssignmentStatus;
use crate::models::assignments::requests::{AssignmentListParams, AssignmentListQuery};
use crate::models::permissions::{Permission, has_permission};
use crate::services::{current_user, school_scope, storage_error, try_respond};

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    query: AssignmentListParams,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let school_id = try_respond!(school_scope(&actor, query.school_id));

    // 学生与家长只能看到已发布和已截止的作业
    let visible_statuses = (!has_permission(&actor, Permission::ManageAssignments))
        .then(|| AssignmentStatus::visible_to_students().to_vec());

    let (page, size) = query.pagination.normalized();
    let storage = service.get_storage(request);
    match storage
        .list_assignments_with_pagination(AssignmentListQuery {
            page,
            size,
            school_id,
            class_id: query.class_id,
            section_id: query.section_id,
            subject_id: query.subject_id,
            status: query.status,
            visible_statuses,
        })
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Assignments retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list assignments", e)),
    }
}
