pub mod records;
pub mod sessions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::attendance::entities::AttendanceSession;
use crate::models::attendance::requests::{
    CreateSessionRequest, MarkAttendanceRequest, RecordListParams, SessionListParams,
    UpdateSessionRequest,
};
use crate::models::students::requests::StudentListQuery;
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;

use super::{scoped_entity, storage_error};

super::define_service!(
    /// 考勤场次与考勤记录
    AttendanceService
);

impl AttendanceService {
    pub async fn list_sessions(
        &self,
        request: &HttpRequest,
        query: SessionListParams,
    ) -> ActixResult<HttpResponse> {
        sessions::list_sessions(self, request, query).await
    }

    pub async fn create_session(
        &self,
        request: &HttpRequest,
        session_data: CreateSessionRequest,
    ) -> ActixResult<HttpResponse> {
        sessions::create_session(self, request, session_data).await
    }

    pub async fn get_session(
        &self,
        request: &HttpRequest,
        session_id: i64,
    ) -> ActixResult<HttpResponse> {
        sessions::get_session(self, request, session_id).await
    }

    pub async fn update_session(
        &self,
        request: &HttpRequest,
        session_id: i64,
        update_data: UpdateSessionRequest,
    ) -> ActixResult<HttpResponse> {
        sessions::update_session(self, request, session_id, update_data).await
    }

    pub async fn delete_session(
        &self,
        request: &HttpRequest,
        session_id: i64,
    ) -> ActixResult<HttpResponse> {
        sessions::delete_session(self, request, session_id).await
    }

    pub async fn list_records(
        &self,
        request: &HttpRequest,
        query: RecordListParams,
    ) -> ActixResult<HttpResponse> {
        records::list_records(self, request, query).await
    }

    pub async fn mark_records(
        &self,
        request: &HttpRequest,
        mark_data: MarkAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        records::mark_records(self, request, mark_data).await
    }
}

pub(crate) async fn load_session(
    storage: &Arc<dyn Storage>,
    actor: &User,
    session_id: i64,
) -> Result<AttendanceSession, HttpResponse> {
    scoped_entity(
        actor,
        storage.get_attendance_session_by_id(session_id).await,
        |s: &AttendanceSession| s.school_id,
        ErrorCode::AttendanceSessionNotFound,
        "Attendance session",
    )
}

/// 学生与家长只能看到的学生 ID；`None` 表示不受限制
pub(crate) async fn visible_student_ids(
    storage: &Arc<dyn Storage>,
    actor: &User,
    school_id: i64,
) -> Result<Option<HashSet<i64>>, HttpResponse> {
    if actor.is_super_admin {
        return Ok(None);
    }
    match actor.role {
        UserRole::Student => match storage.get_student_by_user_id(actor.id).await {
            Ok(student) => Ok(Some(student.map(|s| s.id).into_iter().collect())),
            Err(e) => Err(storage_error("Failed to load student record", e)),
        },
        UserRole::Guardian => {
            let children = storage
                .list_students_with_pagination(StudentListQuery {
                    page: 1,
                    size: 100,
                    school_id,
                    guardian_id: Some(actor.id),
                    ..Default::default()
                })
                .await
                .map_err(|e| storage_error("Failed to load children", e))?;
            Ok(Some(children.items.into_iter().map(|s| s.id).collect()))
        }
        UserRole::Teacher | UserRole::SchoolAdmin => Ok(None),
    }
}
