use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, validate_max_score};
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::classes::{check_class_targets, load_class};
use crate::services::{bad_request, current_user, storage_error, try_respond};
use crate::utils::validate::require_non_blank;

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    mut assignment_data: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));

    assignment_data.title = try_respond!(
        require_non_blank("title", &assignment_data.title)
            .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
    );
    if let Err(msg) = validate_max_score(assignment_data.max_score) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);
    let class = try_respond!(load_class(&storage, &actor, assignment_data.class_id).await);
    try_respond!(
        check_class_targets(
            &storage,
            &class,
            assignment_data.section_id,
            assignment_data.subject_id
        )
        .await
    );

    match storage
        .create_assignment(class.school_id, actor.id, assignment_data)
        .await
    {
        Ok(assignment) => {
            info!(
                "Assignment '{}' drafted for class {} by {}",
                assignment.title, assignment.class_id, actor.id
            );
            AuditEntry::new("assignment.create", "assignment")
                .entity(assignment.id)
                .school(Some(assignment.school_id))
                .details(serde_json::json!({
                    "title": assignment.title,
                    "class_id": assignment.class_id,
                }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Assignment created",
            )))
        }
        Err(e) => Ok(storage_error("Failed to create assignment", e)),
    }
}
