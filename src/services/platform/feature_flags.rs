use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{debug, info};

use super::PlatformService;
use crate::cache::{ObjectCache, keys};
use crate::config::AppConfig;
use crate::models::common::PaginationQuery;
use crate::models::permissions::Permission;
use crate::models::platform::feature_flags::{
    CreateFeatureFlagRequest, FeatureFlag, FeatureFlagEvaluation, UpdateFeatureFlagRequest,
    validate_rollout_percentage,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{
    bad_request, conflict, current_user, not_found, require_permission, storage_error,
    try_respond,
};
use crate::storage::Storage;
use crate::utils::validate::{require_non_blank, validate_flag_key};

fn flag_cache(request: &HttpRequest) -> Option<&web::Data<Arc<dyn ObjectCache>>> {
    request.app_data::<web::Data<Arc<dyn ObjectCache>>>()
}

// 开关变更后清掉求值用的缓存
async fn invalidate_flag_cache(request: &HttpRequest) {
    if let Some(cache) = flag_cache(request) {
        cache.remove(keys::FEATURE_FLAGS).await;
    }
}

// 求值使用全部开关的缓存副本
async fn cached_flags(
    request: &HttpRequest,
    storage: &Arc<dyn Storage>,
) -> Result<Vec<FeatureFlag>, HttpResponse> {
    let cache = flag_cache(request);
    if let Some(cache) = cache
        && let Some(flags) = cache.get_json::<Vec<FeatureFlag>>(keys::FEATURE_FLAGS).await
    {
        debug!("Feature flags served from cache");
        return Ok(flags);
    }

    let flags = storage
        .list_all_feature_flags()
        .await
        .map_err(|e| storage_error("Failed to load feature flags", e))?;
    if let Some(cache) = cache {
        cache
            .insert_json(
                keys::FEATURE_FLAGS.to_string(),
                &flags,
                AppConfig::get().cache.default_ttl,
            )
            .await;
    }
    Ok(flags)
}

pub async fn list_feature_flags(
    service: &PlatformService,
    request: &HttpRequest,
    query: PaginationQuery,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    try_respond!(require_permission(&actor, Permission::ManageFeatureFlags));

    let (page, size) = query.normalized();
    let storage = service.get_storage(request);
    match storage.list_feature_flags_with_pagination(page, size).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Feature flags retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list feature flags", e)),
    }
}

pub async fn create_feature_flag(
    service: &PlatformService,
    request: &HttpRequest,
    mut flag_data: CreateFeatureFlagRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    try_respond!(require_permission(&actor, Permission::ManageFeatureFlags));

    flag_data.key = flag_data.key.trim().to_string();
    if let Err(msg) = validate_flag_key(&flag_data.key) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    flag_data.name = try_respond!(
        require_non_blank("name", &flag_data.name)
            .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
    );
    if let Err(msg) = validate_rollout_percentage(flag_data.rollout_percentage) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);
    match storage.get_feature_flag_by_key(&flag_data.key).await {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::FeatureFlagKeyExists,
                format!("Feature flag '{}' already exists", flag_data.key),
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_error("Failed to check feature flag key", e)),
    }

    match storage.create_feature_flag(flag_data).await {
        Ok(flag) => {
            info!("Feature flag '{}' created by {}", flag.key, actor.id);
            invalidate_flag_cache(request).await;
            AuditEntry::new("feature_flag.create", "feature_flag")
                .entity(flag.id)
                .details(serde_json::json!({
                    "key": flag.key,
                    "is_enabled": flag.is_enabled,
                    "rollout_percentage": flag.rollout_percentage,
                }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(flag, "Feature flag created")))
        }
        Err(e) => Ok(storage_error("Failed to create feature flag", e)),
    }
}

pub async fn update_feature_flag(
    service: &PlatformService,
    request: &HttpRequest,
    flag_id: i64,
    mut update_data: UpdateFeatureFlagRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    try_respond!(require_permission(&actor, Permission::ManageFeatureFlags));

    if let Some(name) = update_data.name.as_deref() {
        update_data.name = Some(try_respond!(
            require_non_blank("name", name).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
        ));
    }
    if let Some(percentage) = update_data.rollout_percentage
        && let Err(msg) = validate_rollout_percentage(percentage)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);
    match storage.update_feature_flag(flag_id, update_data).await {
        Ok(Some(flag)) => {
            info!("Feature flag '{}' updated by {}", flag.key, actor.id);
            invalidate_flag_cache(request).await;
            AuditEntry::new("feature_flag.update", "feature_flag")
                .entity(flag.id)
                .details(serde_json::json!({
                    "key": flag.key,
                    "is_enabled": flag.is_enabled,
                    "rollout_percentage": flag.rollout_percentage,
                }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(flag, "Feature flag updated")))
        }
        Ok(None) => Ok(not_found(ErrorCode::FeatureFlagNotFound, "Feature flag not found")),
        Err(e) => Ok(storage_error("Failed to update feature flag", e)),
    }
}

pub async fn delete_feature_flag(
    service: &PlatformService,
    request: &HttpRequest,
    flag_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    try_respond!(require_permission(&actor, Permission::ManageFeatureFlags));

    let storage = service.get_storage(request);
    match storage.delete_feature_flag(flag_id).await {
        Ok(true) => {
            info!("Feature flag {} deleted by {}", flag_id, actor.id);
            invalidate_flag_cache(request).await;
            AuditEntry::new("feature_flag.delete", "feature_flag")
                .entity(flag_id)
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Feature flag deleted")))
        }
        Ok(false) => Ok(not_found(ErrorCode::FeatureFlagNotFound, "Feature flag not found")),
        Err(e) => Ok(storage_error("Failed to delete feature flag", e)),
    }
}

/// 按调用者所在学校求值，未知的开关视为关闭
pub async fn evaluate_feature_flag(
    service: &PlatformService,
    request: &HttpRequest,
    key: &str,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let flags = try_respond!(cached_flags(request, &storage).await);

    let enabled = flags
        .iter()
        .find(|flag| flag.key == key)
        .is_some_and(|flag| flag.is_enabled_for(actor.school_id));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        FeatureFlagEvaluation {
            key: key.to_string(),
            enabled,
        },
        "Feature flag evaluated",
    )))
}
