use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, load_visible_student};
use crate::models::ApiResponse;
use crate::services::{current_user, try_respond};

pub async fn get_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let student = try_respond!(load_visible_student(&storage, &actor, student_id).await);
    Ok(HttpResponse::Ok().json(ApiResponse::success(student, "Student retrieved")))
}
