use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{
    CreateSessionRequest, MarkAttendanceRequest, RecordListParams, SessionListParams,
    UpdateSessionRequest,
};
use crate::models::permissions::Permission;
use crate::services::AttendanceService;
use crate::utils::SafeIDI64;

static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn list_sessions(
    req: HttpRequest,
    query: web::Query<SessionListParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_sessions(&req, query.into_inner())
        .await
}

pub async fn create_session(
    req: HttpRequest,
    session_data: web::Json<CreateSessionRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .create_session(&req, session_data.into_inner())
        .await
}

pub async fn get_session(req: HttpRequest, session_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.get_session(&req, session_id.0).await
}

pub async fn update_session(
    req: HttpRequest,
    session_id: SafeIDI64,
    update_data: web::Json<UpdateSessionRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .update_session(&req, session_id.0, update_data.into_inner())
        .await
}

pub async fn delete_session(req: HttpRequest, session_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.delete_session(&req, session_id.0).await
}

pub async fn list_records(
    req: HttpRequest,
    query: web::Query<RecordListParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_records(&req, query.into_inner())
        .await
}

pub async fn mark_records(
    req: HttpRequest,
    mark_data: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .mark_records(&req, mark_data.into_inner())
        .await
}

fn require(permission: Permission) -> middlewares::RequirePermission {
    middlewares::RequirePermission::new(permission)
}

// 考勤场次与记录
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/attendance")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/sessions")
                    .route(
                        web::get()
                            .to(list_sessions)
                            .wrap(require(Permission::ViewAttendance)),
                    )
                    .route(
                        web::post()
                            .to(create_session)
                            .wrap(require(Permission::TakeAttendance)),
                    ),
            )
            .service(
                web::resource("/sessions/{id}")
                    .route(
                        web::get()
                            .to(get_session)
                            .wrap(require(Permission::ViewAttendance)),
                    )
                    // 加锁与解锁所需权限在服务层区分
                    .route(web::patch().to(update_session).wrap(
                        middlewares::RequirePermission::any(&[
                            Permission::LockAttendance,
                            Permission::UnlockAttendance,
                        ]),
                    ))
                    .route(
                        web::delete()
                            .to(delete_session)
                            .wrap(require(Permission::UnlockAttendance)),
                    ),
            )
            .service(
                web::resource("/records")
                    .route(
                        web::get()
                            .to(list_records)
                            .wrap(require(Permission::ViewAttendance)),
                    )
                    .route(
                        web::post()
                            .to(mark_records)
                            .wrap(require(Permission::TakeAttendance)),
                    ),
            ),
    );
}
