use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::ApiResponse;
use crate::models::schools::requests::{SchoolListParams, SchoolListQuery};
use crate::services::storage_error;

pub async fn list_schools(
    service: &SchoolService,
    request: &HttpRequest,
    query: SchoolListParams,
) -> ActixResult<HttpResponse> {
    let (page, size) = query.pagination.normalized();
    let list_query = SchoolListQuery {
        page,
        size,
        search: query.search,
        include_inactive: query.include_inactive.unwrap_or(false),
    };

    let storage = service.get_storage(request);
    match storage.list_schools_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Schools retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list schools", e)),
    }
}
