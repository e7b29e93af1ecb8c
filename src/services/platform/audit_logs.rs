use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PlatformService;
use crate::models::ApiResponse;
use crate::models::permissions::Permission;
use crate::models::platform::audit_logs::{AuditLogListParams, AuditLogListQuery};
use crate::services::{current_user, require_permission, storage_error, try_respond};

pub async fn list_audit_logs(
    service: &PlatformService,
    request: &HttpRequest,
    query: AuditLogListParams,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    try_respond!(require_permission(&actor, Permission::ViewAuditLogs));

    let (page, size) = query.pagination.normalized();
    let storage = service.get_storage(request);
    match storage
        .list_audit_logs_with_pagination(AuditLogListQuery {
            page,
            size,
            school_id: query.school_id,
            actor_id: query.actor_id,
            action: query.action.filter(|a| !a.trim().is_empty()),
            entity_type: query.entity_type.filter(|t| !t.trim().is_empty()),
        })
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Audit logs retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list audit logs", e)),
    }
}
