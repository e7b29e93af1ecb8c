use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::LeaveService;
use crate::models::leaves::entities::{Leave, LeaveAction};
use crate::models::leaves::requests::UpdateLeaveRequest;
use crate::models::permissions::Permission;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{
    conflict, current_user, forbidden, require_permission, scoped_entity, storage_error,
    try_respond,
};

/// 审批或撤回请假，只允许从 pending 出发
pub async fn update_leave(
    service: &LeaveService,
    request: &HttpRequest,
    leave_id: i64,
    update_data: UpdateLeaveRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let leave = try_respond!(scoped_entity(
        &actor,
        storage.get_leave_by_id(leave_id).await,
        |l: &Leave| l.school_id,
        ErrorCode::LeaveNotFound,
        "Leave",
    ));

    match update_data.action {
        LeaveAction::Approve | LeaveAction::Reject => {
            try_respond!(require_permission(&actor, Permission::ReviewLeaves));
        }
        LeaveAction::Cancel => {
            if leave.requester_id != actor.id {
                return Ok(forbidden("Only the requester can cancel a leave"));
            }
        }
    }

    let Some(next) = leave.status.apply(update_data.action) else {
        return Ok(conflict(
            ErrorCode::LeaveInvalidTransition,
            format!("Cannot {} a leave that is {}", update_data.action, leave.status),
        ));
    };

    match storage
        .review_leave(leave.id, next, actor.id, update_data.note)
        .await
    {
        Ok(Some(updated)) => {
            info!("Leave {} is now {} (by {})", updated.id, updated.status, actor.id);
            AuditEntry::new(format!("leave.{}", update_data.action), "leave")
                .entity(updated.id)
                .school(Some(updated.school_id))
                .details(serde_json::json!({
                    "from_status": leave.status,
                    "to_status": updated.status,
                }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Leave updated")))
        }
        // 并发处理后已不再是 pending
        Ok(None) => Ok(conflict(
            ErrorCode::LeaveInvalidTransition,
            "Leave is no longer pending",
        )),
        Err(e) => Ok(storage_error("Failed to update leave", e)),
    }
}
