use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{AssignmentService, load_assignment, validate_max_score};
use crate::models::assignments::entities::AssignmentStatus;
use crate::models::assignments::requests::{AssignmentChanges, UpdateAssignmentRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{bad_request, current_user, not_found, storage_error, try_respond};
use crate::utils::validate::require_non_blank;

/// 更新作业，`status` 变化按状态机校验
///
/// 进入 published 记录 `published_at`，进入 closed 记录 `closed_at`。
pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    update_data: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let assignment = try_respond!(load_assignment(&storage, &actor, assignment_id).await);

    let mut changes = AssignmentChanges {
        description: update_data.description,
        due_at: update_data.due_at,
        ..Default::default()
    };
    if let Some(title) = update_data.title.as_deref() {
        changes.title = Some(try_respond!(
            require_non_blank("title", title).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
        ));
    }
    if let Some(max_score) = update_data.max_score {
        if let Err(msg) = validate_max_score(max_score) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        changes.max_score = Some(max_score);
    }

    if let Some(next) = update_data.status
        && next != assignment.status
    {
        // 只有退回草稿时需要知道是否已有提交
        let has_submissions = if next == AssignmentStatus::Draft {
            match storage.count_submissions(assignment.id).await {
                Ok(count) => count > 0,
                Err(e) => return Ok(storage_error("Failed to count submissions", e)),
            }
        } else {
            false
        };

        if !assignment.status.can_transition_to(next, has_submissions) {
            warn!(
                "Rejected assignment {} transition {} -> {}",
                assignment.id, assignment.status, next
            );
            return Ok(bad_request(
                ErrorCode::AssignmentInvalidTransition,
                format!(
                    "Cannot change assignment status from {} to {}",
                    assignment.status, next
                ),
            ));
        }

        let now = chrono::Utc::now();
        match next {
            AssignmentStatus::Published => changes.published_at = Some(now),
            AssignmentStatus::Closed => changes.closed_at = Some(now),
            AssignmentStatus::Draft | AssignmentStatus::Archived => {}
        }
        changes.status = Some(next);
    }

    let previous_status = assignment.status;
    match storage.update_assignment(assignment.id, changes).await {
        Ok(Some(updated)) => {
            info!("Assignment {} updated by {}", updated.id, actor.id);
            AuditEntry::new("assignment.update", "assignment")
                .entity(updated.id)
                .school(Some(updated.school_id))
                .details(serde_json::json!({
                    "from_status": previous_status,
                    "to_status": updated.status,
                }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Assignment updated")))
        }
        Ok(None) => Ok(not_found(ErrorCode::AssignmentNotFound, "Assignment not found")),
        Err(e) => Ok(storage_error("Failed to update assignment", e)),
    }
}
