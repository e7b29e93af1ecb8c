use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::ApiResponse;
use crate::models::students::requests::{StudentListParams, StudentListQuery};
use crate::models::users::entities::UserRole;
use crate::services::{current_user, school_scope, storage_error, try_respond};

pub async fn list_students(
    service: &StudentService,
    request: &HttpRequest,
    query: StudentListParams,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let school_id = try_respond!(school_scope(&actor, query.school_id));

    // 家长只看到自己的孩子
    let guardian_id = (!actor.is_super_admin && actor.role == UserRole::Guardian).then_some(actor.id);

    let (page, size) = query.pagination.normalized();
    let list_query = StudentListQuery {
        page,
        size,
        school_id,
        class_id: query.class_id,
        section_id: query.section_id,
        guardian_id,
        status: query.status,
        search: query.search,
    };

    let storage = service.get_storage(request);
    match storage.list_students_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Students retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list students", e)),
    }
}
