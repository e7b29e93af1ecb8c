use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::ApiResponse;
use crate::models::enrollments::requests::{EnrollmentListParams, EnrollmentListQuery};
use crate::services::{current_user, school_scope, storage_error, try_respond};

pub async fn list_enrollments(
    service: &EnrollmentService,
    request: &HttpRequest,
    query: EnrollmentListParams,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let school_id = try_respond!(school_scope(&actor, query.school_id));
    let (page, size) = query.pagination.normalized();

    let storage = service.get_storage(request);
    match storage
        .list_enrollments_with_pagination(EnrollmentListQuery {
            page,
            size,
            school_id,
            student_id: query.student_id,
            class_id: query.class_id,
            section_id: query.section_id,
            academic_year: query.academic_year,
            status: query.status,
        })
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Enrollments retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list enrollments", e)),
    }
}
