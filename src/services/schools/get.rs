use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{not_found, storage_error};

pub async fn get_school(
    service: &SchoolService,
    request: &HttpRequest,
    school_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.get_school_by_id(school_id).await {
        Ok(Some(school)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            school,
            "School retrieved",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::SchoolNotFound, "School not found")),
        Err(e) => Ok(storage_error("Failed to get school", e)),
    }
}
