use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::leaves::requests::{CreateLeaveRequest, LeaveListParams, UpdateLeaveRequest};
use crate::models::permissions::Permission;
use crate::services::LeaveService;
use crate::utils::SafeIDI64;

static LEAVE_SERVICE: Lazy<LeaveService> = Lazy::new(LeaveService::new_lazy);

const LEAVE_PERMISSIONS: &[Permission] = &[Permission::RequestLeave, Permission::ReviewLeaves];

pub async fn list_leaves(
    req: HttpRequest,
    query: web::Query<LeaveListParams>,
) -> ActixResult<HttpResponse> {
    LEAVE_SERVICE.list_leaves(&req, query.into_inner()).await
}

pub async fn create_leave(
    req: HttpRequest,
    leave_data: web::Json<CreateLeaveRequest>,
) -> ActixResult<HttpResponse> {
    LEAVE_SERVICE
        .create_leave(&req, leave_data.into_inner())
        .await
}

pub async fn update_leave(
    req: HttpRequest,
    leave_id: SafeIDI64,
    update_data: web::Json<UpdateLeaveRequest>,
) -> ActixResult<HttpResponse> {
    LEAVE_SERVICE
        .update_leave(&req, leave_id.0, update_data.into_inner())
        .await
}

// 配置路由
pub fn configure_leave_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/leaves")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_leaves)
                            .wrap(middlewares::RequirePermission::any(LEAVE_PERMISSIONS)),
                    )
                    .route(
                        web::post()
                            .to(create_leave)
                            .wrap(middlewares::RequirePermission::new(Permission::RequestLeave)),
                    ),
            )
            .service(
                web::resource("/{id}").route(
                    web::put()
                        .to(update_leave)
                        .wrap(middlewares::RequirePermission::any(LEAVE_PERMISSIONS)),
                ),
            ),
    );
}
