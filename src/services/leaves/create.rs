use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::LeaveService;
use crate::models::leaves::requests::{CreateLeaveRequest, NewLeave};
use crate::models::permissions::{Permission, has_permission};
use crate::models::students::entities::Student;
use crate::models::teachers::entities::Teacher;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{
    bad_request, current_user, forbidden, scoped_entity, storage_error, try_respond,
};
use crate::storage::Storage;

/// 确定请假所属学校，并检查调用者能否替该对象请假
///
/// 审批人可以替本校任何人提交；教师只能为自己提交；
/// 学生为自己、家长为自己的孩子提交。
async fn leave_school(
    storage: &Arc<dyn Storage>,
    actor: &User,
    leave_data: &CreateLeaveRequest,
) -> Result<i64, HttpResponse> {
    let reviewer = has_permission(actor, Permission::ReviewLeaves);

    if let Some(teacher_id) = leave_data.teacher_id {
        let teacher = scoped_entity(
            actor,
            storage.get_teacher_by_id(teacher_id).await,
            |t: &Teacher| t.school_id,
            ErrorCode::TeacherNotFound,
            "Teacher",
        )?;
        if !reviewer && teacher.user_id != Some(actor.id) {
            return Err(forbidden("You can only request leave for yourself"));
        }
        return Ok(teacher.school_id);
    }

    let student_id = leave_data.student_id.unwrap_or_default();
    let student = scoped_entity(
        actor,
        storage.get_student_by_id(student_id).await,
        |s: &Student| s.school_id,
        ErrorCode::StudentNotFound,
        "Student",
    )?;
    let own = student.user_id == Some(actor.id) || student.guardian_id == Some(actor.id);
    if !reviewer && !own {
        return Err(forbidden(
            "You can only request leave for yourself or your children",
        ));
    }
    Ok(student.school_id)
}

pub async fn create_leave(
    service: &LeaveService,
    request: &HttpRequest,
    leave_data: CreateLeaveRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));

    if let Err(msg) = leave_data.validate() {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);
    let school_id = try_respond!(leave_school(&storage, &actor, &leave_data).await);

    match storage
        .create_leave(NewLeave {
            school_id,
            requester_id: actor.id,
            request: leave_data,
        })
        .await
    {
        Ok(leave) => {
            info!(
                "Leave {} ({} to {}) requested by {}",
                leave.id, leave.start_date, leave.end_date, actor.id
            );
            AuditEntry::new("leave.create", "leave")
                .entity(leave.id)
                .school(Some(leave.school_id))
                .details(serde_json::json!({
                    "teacher_id": leave.teacher_id,
                    "student_id": leave.student_id,
                    "leave_type": leave.leave_type,
                }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(leave, "Leave requested")))
        }
        Err(e) => Ok(storage_error("Failed to create leave", e)),
    }
}
