use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::models::ApiResponse;
use crate::models::teachers::requests::{TeacherListParams, TeacherListQuery};
use crate::services::{current_user, school_scope, storage_error, try_respond};

pub async fn list_teachers(
    service: &TeacherService,
    request: &HttpRequest,
    query: TeacherListParams,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let school_id = try_respond!(school_scope(&actor, query.school_id));
    let (page, size) = query.pagination.normalized();

    let storage = service.get_storage(request);
    match storage
        .list_teachers_with_pagination(TeacherListQuery {
            page,
            size,
            school_id,
            status: query.status,
            search: query.search,
        })
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Teachers retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list teachers", e)),
    }
}
