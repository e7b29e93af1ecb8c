use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::error;

use super::SystemService;
use crate::models::system::HealthResponse;
use crate::models::{ApiResponse, AppStartTime};

/// 健康检查，数据库不可用时返回 503
pub async fn health(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let database = match storage.ping().await {
        Ok(()) => true,
        Err(e) => {
            error!("Health check failed to reach the database: {}", e);
            false
        }
    };

    let uptime_seconds = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| {
            chrono::Utc::now()
                .signed_duration_since(start.start_datetime)
                .num_seconds()
        })
        .unwrap_or_default();

    let health = HealthResponse {
        status: if database { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        database,
    };

    if database {
        Ok(HttpResponse::Ok().json(ApiResponse::success(health, "Service is healthy")))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::success(
            health,
            "Service is degraded",
        )))
    }
}
