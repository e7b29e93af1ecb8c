use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, load_assignment};
use crate::models::assignments::entities::AssignmentStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{conflict, current_user, not_found, storage_error, try_respond};

/// 只有草稿可以删除，其他状态通过归档结束
pub async fn delete_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let assignment = try_respond!(load_assignment(&storage, &actor, assignment_id).await);

    if assignment.status != AssignmentStatus::Draft {
        return Ok(conflict(
            ErrorCode::AssignmentInvalidTransition,
            format!(
                "Only draft assignments can be deleted (current status: {}); archive it instead",
                assignment.status
            ),
        ));
    }

    match storage.delete_assignment(assignment.id).await {
        Ok(true) => {
            info!("Assignment {} deleted by {}", assignment.id, actor.id);
            AuditEntry::new("assignment.delete", "assignment")
                .entity(assignment.id)
                .school(Some(assignment.school_id))
                .details(serde_json::json!({ "title": assignment.title }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Assignment deleted")))
        }
        Ok(false) => Ok(not_found(ErrorCode::AssignmentNotFound, "Assignment not found")),
        Err(e) => Ok(storage_error("Failed to delete assignment", e)),
    }
}
