use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_assignment};
use crate::models::ApiResponse;
use crate::services::{current_user, try_respond};

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let assignment = try_respond!(load_assignment(&storage, &actor, assignment_id).await);
    Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "Assignment retrieved")))
}
