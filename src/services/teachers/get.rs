use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TeacherService, load_teacher};
use crate::models::ApiResponse;
use crate::services::{current_user, try_respond};

pub async fn get_teacher(
    service: &TeacherService,
    request: &HttpRequest,
    teacher_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let teacher = try_respond!(load_teacher(&storage, &actor, teacher_id).await);
    Ok(HttpResponse::Ok().json(ApiResponse::success(teacher, "Teacher retrieved")))
}
