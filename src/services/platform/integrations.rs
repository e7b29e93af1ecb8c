use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PlatformService;
use crate::models::permissions::Permission;
use crate::models::platform::integrations::{
    CreateIntegrationRequest, IntegrationListParams, IntegrationListQuery,
    UpdateIntegrationRequest, validate_config,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{
    bad_request, current_user, not_found, require_permission, storage_error, try_respond,
};
use crate::utils::validate::require_non_blank;

pub async fn list_integrations(
    service: &PlatformService,
    request: &HttpRequest,
    query: IntegrationListParams,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    try_respond!(require_permission(&actor, Permission::ManageIntegrations));

    let (page, size) = query.pagination.normalized();
    let storage = service.get_storage(request);
    match storage
        .list_integrations_with_pagination(IntegrationListQuery {
            page,
            size,
            school_id: query.school_id,
        })
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Integrations retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list integrations", e)),
    }
}

pub async fn create_integration(
    service: &PlatformService,
    request: &HttpRequest,
    mut integration_data: CreateIntegrationRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    try_respond!(require_permission(&actor, Permission::ManageIntegrations));

    integration_data.provider = try_respond!(
        require_non_blank("provider", &integration_data.provider)
            .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
    )
    .to_lowercase();
    integration_data.name = try_respond!(
        require_non_blank("name", &integration_data.name)
            .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
    );
    if let Err(msg) = validate_config(&integration_data.config) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);
    match storage.get_school_by_id(integration_data.school_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(bad_request(ErrorCode::SchoolNotFound, "School not found")),
        Err(e) => return Ok(storage_error("Failed to load school", e)),
    }

    match storage.create_integration(integration_data).await {
        Ok(integration) => {
            info!(
                "Integration '{}' ({}) created for school {}",
                integration.name, integration.provider, integration.school_id
            );
            // 配置内容可能含密钥，审计中不记录
            AuditEntry::new("integration.create", "integration")
                .entity(integration.id)
                .school(Some(integration.school_id))
                .details(serde_json::json!({ "provider": integration.provider }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                integration,
                "Integration created",
            )))
        }
        Err(e) => Ok(storage_error("Failed to create integration", e)),
    }
}

pub async fn update_integration(
    service: &PlatformService,
    request: &HttpRequest,
    integration_id: i64,
    mut update_data: UpdateIntegrationRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    try_respond!(require_permission(&actor, Permission::ManageIntegrations));

    if let Some(provider) = update_data.provider.as_deref() {
        update_data.provider = Some(
            try_respond!(
                require_non_blank("provider", provider)
                    .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
            )
            .to_lowercase(),
        );
    }
    if let Some(name) = update_data.name.as_deref() {
        update_data.name = Some(try_respond!(
            require_non_blank("name", name).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
        ));
    }
    if let Some(config) = &update_data.config
        && let Err(msg) = validate_config(config)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);
    match storage.update_integration(integration_id, update_data).await {
        Ok(Some(integration)) => {
            info!("Integration {} updated by {}", integration.id, actor.id);
            AuditEntry::new("integration.update", "integration")
                .entity(integration.id)
                .school(Some(integration.school_id))
                .details(serde_json::json!({
                    "provider": integration.provider,
                    "is_enabled": integration.is_enabled,
                }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                integration,
                "Integration updated",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::IntegrationNotFound, "Integration not found")),
        Err(e) => Ok(storage_error("Failed to update integration", e)),
    }
}

pub async fn delete_integration(
    service: &PlatformService,
    request: &HttpRequest,
    integration_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    try_respond!(require_permission(&actor, Permission::ManageIntegrations));

    let storage = service.get_storage(request);
    let integration = match storage.get_integration_by_id(integration_id).await {
        Ok(Some(integration)) => integration,
        Ok(None) => return Ok(not_found(ErrorCode::IntegrationNotFound, "Integration not found")),
        Err(e) => return Ok(storage_error("Failed to load integration", e)),
    };

    match storage.delete_integration(integration.id).await {
        Ok(true) => {
            info!("Integration {} deleted by {}", integration.id, actor.id);
            AuditEntry::new("integration.delete", "integration")
                .entity(integration.id)
                .school(Some(integration.school_id))
                .details(serde_json::json!({ "provider": integration.provider }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Integration deleted")))
        }
        Ok(false) => Ok(not_found(ErrorCode::IntegrationNotFound, "Integration not found")),
        Err(e) => Ok(storage_error("Failed to delete integration", e)),
    }
}
