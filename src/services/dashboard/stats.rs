use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DashboardService;
use crate::models::ApiResponse;
use crate::models::dashboard::DashboardQuery;
use crate::services::{current_user, school_scope, storage_error, try_respond};

pub async fn get_stats(
    service: &DashboardService,
    request: &HttpRequest,
    query: DashboardQuery,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let school_id = try_respond!(school_scope(&actor, query.school_id));
    let today = chrono::Utc::now().date_naive();

    let storage = service.get_storage(request);
    match storage.dashboard_stats(school_id, today).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Dashboard statistics retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to compute dashboard statistics", e)),
    }
}
