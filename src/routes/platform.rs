use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::common::PaginationQuery;
use crate::models::platform::audit_logs::AuditLogListParams;
use crate::models::platform::feature_flags::{CreateFeatureFlagRequest, UpdateFeatureFlagRequest};
use crate::models::platform::integrations::{
    CreateIntegrationRequest, IntegrationListParams, UpdateIntegrationRequest,
};
use crate::services::PlatformService;
use crate::utils::SafeIDI64;

static PLATFORM_SERVICE: Lazy<PlatformService> = Lazy::new(PlatformService::new_lazy);

pub async fn list_feature_flags(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    PLATFORM_SERVICE
        .list_feature_flags(&req, query.into_inner())
        .await
}

pub async fn create_feature_flag(
    req: HttpRequest,
    flag_data: web::Json<CreateFeatureFlagRequest>,
) -> ActixResult<HttpResponse> {
    PLATFORM_SERVICE
        .create_feature_flag(&req, flag_data.into_inner())
        .await
}

pub async fn update_feature_flag(
    req: HttpRequest,
    flag_id: SafeIDI64,
    update_data: web::Json<UpdateFeatureFlagRequest>,
) -> ActixResult<HttpResponse> {
    PLATFORM_SERVICE
        .update_feature_flag(&req, flag_id.0, update_data.into_inner())
        .await
}

pub async fn delete_feature_flag(req: HttpRequest, flag_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PLATFORM_SERVICE.delete_feature_flag(&req, flag_id.0).await
}

pub async fn evaluate_feature_flag(
    req: HttpRequest,
    key: web::Path<String>,
) -> ActixResult<HttpResponse> {
    PLATFORM_SERVICE
        .evaluate_feature_flag(&req, &key.into_inner())
        .await
}

pub async fn list_audit_logs(
    req: HttpRequest,
    query: web::Query<AuditLogListParams>,
) -> ActixResult<HttpResponse> {
    PLATFORM_SERVICE
        .list_audit_logs(&req, query.into_inner())
        .await
}

pub async fn list_integrations(
    req: HttpRequest,
    query: web::Query<IntegrationListParams>,
) -> ActixResult<HttpResponse> {
    PLATFORM_SERVICE
        .list_integrations(&req, query.into_inner())
        .await
}

pub async fn create_integration(
    req: HttpRequest,
    integration_data: web::Json<CreateIntegrationRequest>,
) -> ActixResult<HttpResponse> {
    PLATFORM_SERVICE
        .create_integration(&req, integration_data.into_inner())
        .await
}

pub async fn update_integration(
    req: HttpRequest,
    integration_id: SafeIDI64,
    update_data: web::Json<UpdateIntegrationRequest>,
) -> ActixResult<HttpResponse> {
    PLATFORM_SERVICE
        .update_integration(&req, integration_id.0, update_data.into_inner())
        .await
}

pub async fn delete_integration(
    req: HttpRequest,
    integration_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    PLATFORM_SERVICE
        .delete_integration(&req, integration_id.0)
        .await
}

// 平台管理接口（超级管理员）与开关求值
pub fn configure_platform_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin/feature-flags")
            .wrap(middlewares::RequirePermission::super_admin())
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_feature_flags))
                    .route(web::post().to(create_feature_flag)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_feature_flag))
                    .route(web::delete().to(delete_feature_flag)),
            ),
    )
    .service(
        web::scope("/api/admin/audit-logs")
            .wrap(middlewares::RequirePermission::super_admin())
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_audit_logs)),
    )
    .service(
        web::scope("/api/admin/integrations")
            .wrap(middlewares::RequirePermission::super_admin())
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_integrations))
                    .route(web::post().to(create_integration)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_integration))
                    .route(web::delete().to(delete_integration)),
            ),
    )
    .service(
        web::scope("/api/feature-flags")
            .wrap(middlewares::RequireJWT)
            .route("/{key}", web::get().to(evaluate_feature_flag)),
    );
}
